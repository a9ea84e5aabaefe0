//! Utility functions for input validation.

pub mod validate;

pub use validate::{parse_amount, parse_quantity, validate_password};
