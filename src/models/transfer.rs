use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    Deposit,
    Withdrawal,
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferKind::Deposit => write!(f, "Deposit"),
            TransferKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// One entry in the cash-flow log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(rename = "transferId")]
    pub transfer_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransferKind,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_log() {
        let json = r#"[
            {
                "transferId": "tr-1",
                "userId": "u1",
                "type": "Deposit",
                "amount": 1000.0,
                "timestamp": "2025-05-01T10:00:00Z"
            },
            {
                "transferId": "tr-2",
                "userId": "u1",
                "type": "Withdrawal",
                "amount": 250.5,
                "timestamp": "2025-05-03T16:45:00Z"
            }
        ]"#;

        let transfers: Vec<Transfer> = serde_json::from_str(json).expect("parse transfers");
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].kind, TransferKind::Deposit);
        assert_eq!(transfers[1].kind, TransferKind::Withdrawal);
        assert_eq!(transfers[1].amount, 250.5);
    }
}
