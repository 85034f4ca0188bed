use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /` ledger information
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub ledger_version: String,
    /// Microseconds since the epoch, as a string
    pub ledger_timestamp: String,
}

/// `GET /accounts/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub sequence_number: String,
    pub authentication_key: String,
}

/// `POST /view` request body
#[derive(Debug, Clone, Serialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

/// Entry function payload in the JSON submission format
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: String, type_arguments: Vec<String>, arguments: Vec<Value>) -> Self {
        Self {
            payload_type: "entry_function_payload".to_string(),
            function,
            type_arguments,
            arguments,
        }
    }
}

/// Body of `POST /transactions/encode_submission`, and of `POST /transactions`
/// once `signature` is set
#[derive(Debug, Clone, Serialize)]
pub struct SubmitTransactionRequest {
    pub sender: String,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub payload: EntryFunctionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<TransactionSignature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSignature {
    #[serde(rename = "type")]
    pub signature_type: String,
    pub public_key: String,
    pub signature: String,
}

impl TransactionSignature {
    pub fn ed25519(public_key: String, signature: String) -> Self {
        Self {
            signature_type: "ed25519_signature".to_string(),
            public_key,
            signature,
        }
    }
}

/// Response of `POST /transactions`
#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// Event emitted by a committed transaction
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
}

/// Response of `GET /transactions/by_hash/{hash}`. Pending transactions carry
/// no `success`/`vm_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub hash: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TransactionInfo {
    pub fn is_pending(&self) -> bool {
        self.tx_type == "pending_transaction"
    }

    /// First event whose type ends with `suffix`, e.g. `::emi::EmiAgreementCreated`
    pub fn find_event(&self, suffix: &str) -> Option<&Event> {
        self.events
            .iter()
            .find(|event| event.event_type.ends_with(suffix))
    }
}

/// Error body returned by the node
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_transaction_has_no_outcome() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "type": "pending_transaction",
            "hash": "0xabc",
            "sender": "0x1"
        }))
        .unwrap();
        assert!(info.is_pending());
        assert_eq!(info.success, None);
    }

    #[test]
    fn committed_transaction_exposes_events() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "success": true,
            "vm_status": "Executed successfully",
            "events": [
                {"type": "0x1::coin::WithdrawEvent", "data": {"amount": "5"}},
                {"type": "0xcafe::emi::EmiAgreementCreated", "data": {"agreement_id": "4"}}
            ]
        }))
        .unwrap();
        assert!(!info.is_pending());
        let event = info.find_event("::emi::EmiAgreementCreated").unwrap();
        assert_eq!(event.data["agreement_id"], "4");
    }

    #[test]
    fn unsigned_request_omits_signature() {
        let request = SubmitTransactionRequest {
            sender: "0x1".to_string(),
            sequence_number: "0".to_string(),
            max_gas_amount: "200000".to_string(),
            gas_unit_price: "100".to_string(),
            expiration_timestamp_secs: "1700000000".to_string(),
            payload: EntryFunctionPayload::new(
                "0x1::aptos_account::transfer".to_string(),
                vec![],
                vec![json!("0x2"), json!("100")],
            ),
            signature: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("signature").is_none());
        assert_eq!(value["payload"]["type"], "entry_function_payload");
    }
}
