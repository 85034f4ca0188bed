use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction relative to the account whose ledger holds it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sent,
    Received,
    Other,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Sent => write!(f, "sent"),
            TransactionType::Received => write!(f, "received"),
            TransactionType::Other => write!(f, "other"),
        }
    }
}

/// Status of the transaction on chain
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    /// Only `pending -> confirmed` and `pending -> failed` are allowed
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Confirmed)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Confirmed => write!(f, "confirmed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A ledger entry. `amount` is in APT and travels as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
    pub status: TransactionStatus,
}

impl TransactionRecord {
    pub fn new(
        from: &str,
        to: &str,
        amount: Decimal,
        tx_type: TransactionType,
        hash: &str,
        status: TransactionStatus,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            tx_type,
            timestamp: Utc::now(),
            hash: hash.to_string(),
            status,
        }
    }

    /// The same transfer as seen from the receiving account's ledger
    pub fn mirrored_for_recipient(&self) -> Self {
        Self {
            tx_type: TransactionType::Received,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_transitions_only_leave_pending() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Confirmed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn record_serializes_amount_as_string_and_type_field() {
        let record = TransactionRecord::new(
            "0x1",
            "0x2",
            Decimal::from_str("1.25").unwrap(),
            TransactionType::Sent,
            "0xhash",
            TransactionStatus::Pending,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["amount"], "1.25");
        assert_eq!(json["type"], "sent");
        assert_eq!(json["status"], "pending");

        let parsed: TransactionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
