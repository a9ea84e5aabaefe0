//! Local input validation for write operations.
//!
//! Validation failures are rejected here, before any network call is made;
//! a bad amount or quantity never produces a request.

use crate::api::ApiError;

/// Parse a transfer amount. Must be a finite number greater than zero.
pub fn parse_amount(input: &str) -> Result<f64, ApiError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ApiError::ValidationFailure(format!("'{}' is not a valid amount", trimmed)))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::ValidationFailure(format!(
            "Amount must be greater than zero, got '{}'",
            trimmed
        )));
    }
    Ok(amount)
}

/// Parse a trade quantity. Must be a positive whole number of shares.
pub fn parse_quantity(input: &str) -> Result<u32, ApiError> {
    let trimmed = input.trim();
    let quantity: u32 = trimmed.parse().map_err(|_| {
        ApiError::ValidationFailure(format!("'{}' is not a valid quantity", trimmed))
    })?;
    if quantity == 0 {
        return Err(ApiError::ValidationFailure(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(quantity)
}

/// Validate a new password: non-empty after trimming.
pub fn validate_password(input: &str) -> Result<&str, ApiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ApiError::ValidationFailure(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
