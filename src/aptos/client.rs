use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::aptos::models::{
    AccountData, ApiError, EntryFunctionPayload, LedgerInfo, PendingTransaction,
    SubmitTransactionRequest, TransactionInfo, TransactionSignature, ViewRequest,
};
use crate::aptos::wallet;
use crate::config::AppConfig;
use crate::entity::{BotError, WalletAccount};

pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";

/// Source of account balances, in octas
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn get_apt_balance(&self, address: &str) -> Result<u64>;
}

/// Gas and expiry settings applied to every submitted transaction
#[derive(Debug, Clone)]
pub struct GasSettings {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_secs: u64,
}

impl From<&AppConfig> for GasSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_gas_amount: config.max_gas_amount,
            gas_unit_price: config.gas_unit_price,
            expiration_secs: config.tx_expiration_secs,
        }
    }
}

/// Thin client over the Aptos fullnode REST API
pub struct AptosClient {
    http_client: Client,
    node_url: String,
    gas: GasSettings,
}

/// Create an Aptos client for the configured node
pub fn create_aptos_client(config: &AppConfig) -> Result<Arc<AptosClient>> {
    let http_client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

    Ok(Arc::new(AptosClient {
        http_client,
        node_url: config.aptos_node_url.trim_end_matches('/').to_string(),
        gas: GasSettings::from(config),
    }))
}

impl AptosClient {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.node_url, path)
    }

    /// Decodes a node response, turning error bodies into readable errors
    async fn decode<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            error!("Aptos API error [{}]: {} {}", what, status, message);
            return Err(BotError::AptosClient(format!("{}: {}", what, message)).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to parse {} response: {}", what, e))
    }

    pub async fn get_ledger_info(&self) -> Result<LedgerInfo> {
        let response = self
            .http_client
            .get(self.url("/"))
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;
        Self::decode(response, "ledger info").await
    }

    pub async fn get_account(&self, address: &str) -> Result<AccountData> {
        let response = self
            .http_client
            .get(self.url(&format!("/accounts/{}", address)))
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;
        Self::decode(response, "account").await
    }

    /// Sequence number of `address`; accounts not yet created on chain start at 0
    pub async fn get_sequence_number(&self, address: &str) -> Result<u64> {
        let response = self
            .http_client
            .get(self.url(&format!("/accounts/{}", address)))
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }

        let account: AccountData = Self::decode(response, "account").await?;
        account
            .sequence_number
            .parse::<u64>()
            .map_err(|e| anyhow!("Invalid sequence number: {}", e))
    }

    /// Calls a view function and returns its raw JSON results
    pub async fn view(
        &self,
        function: &str,
        type_arguments: Vec<String>,
        arguments: Vec<Value>,
    ) -> Result<Vec<Value>> {
        debug!("View call {}", function);
        let request = ViewRequest {
            function: function.to_string(),
            type_arguments,
            arguments,
        };

        let response = self
            .http_client
            .post(self.url("/view"))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        Self::decode(response, function).await
    }

    /// Build, sign and submit an entry function call from `account`.
    /// Returns the transaction hash.
    pub async fn submit_entry_function(
        &self,
        account: &WalletAccount,
        payload: EntryFunctionPayload,
    ) -> Result<String> {
        let signing_key = wallet::signing_key_from_hex(&account.private_key)?;
        let sequence_number = self.get_sequence_number(&account.address).await?;
        let expiration = Utc::now().timestamp() as u64 + self.gas.expiration_secs;

        let mut request = SubmitTransactionRequest {
            sender: account.address.clone(),
            sequence_number: sequence_number.to_string(),
            max_gas_amount: self.gas.max_gas_amount.to_string(),
            gas_unit_price: self.gas.gas_unit_price.to_string(),
            expiration_timestamp_secs: expiration.to_string(),
            payload,
            signature: None,
        };

        // The node returns the BCS signing message for the JSON transaction
        let response = self
            .http_client
            .post(self.url("/transactions/encode_submission"))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;
        let signing_message: String = Self::decode(response, "encode submission").await?;
        let message_bytes = hex::decode(signing_message.trim_start_matches("0x"))
            .map_err(|e| anyhow!("Invalid signing message: {}", e))?;

        request.signature = Some(TransactionSignature::ed25519(
            account.public_key.clone(),
            wallet::sign_message(&signing_key, &message_bytes),
        ));

        let response = self
            .http_client
            .post(self.url("/transactions"))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;
        let pending: PendingTransaction = Self::decode(response, "submit transaction").await?;

        info!(
            "Submitted {} from {} as {}",
            request.payload.function, account.address, pending.hash
        );
        Ok(pending.hash)
    }

    /// Looks a transaction up by hash. `None` when the node does not know it.
    pub async fn get_transaction_by_hash(&self, hash: &str) -> Result<Option<TransactionInfo>> {
        let response = self
            .http_client
            .get(self.url(&format!("/transactions/by_hash/{}", hash)))
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::decode(response, "transaction by hash").await.map(Some)
    }

    /// Polls until the transaction leaves the mempool or `timeout` elapses.
    /// Returns the last observed state.
    pub async fn wait_for_transaction(
        &self,
        hash: &str,
        timeout: Duration,
    ) -> Result<Option<TransactionInfo>> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut last = None;

        loop {
            match self.get_transaction_by_hash(hash).await {
                Ok(Some(info)) if !info.is_pending() => return Ok(Some(info)),
                Ok(seen) => last = seen,
                Err(e) => debug!("Polling {} failed: {}", hash, e),
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(last);
            }
            tokio::time::sleep(Duration::from_millis(1_000)).await;
        }
    }

    /// Transfer `amount_octas` APT to `recipient`
    pub async fn transfer_apt(
        &self,
        account: &WalletAccount,
        recipient: &str,
        amount_octas: u64,
    ) -> Result<String> {
        let payload = EntryFunctionPayload::new(
            "0x1::aptos_account::transfer".to_string(),
            vec![],
            vec![json!(recipient), json!(amount_octas.to_string())],
        );
        self.submit_entry_function(account, payload).await
    }
}

#[async_trait]
impl BalanceSource for AptosClient {
    async fn get_apt_balance(&self, address: &str) -> Result<u64> {
        let values = self
            .view(
                "0x1::coin::balance",
                vec![APTOS_COIN.to_string()],
                vec![json!(address)],
            )
            .await?;

        let value = values
            .first()
            .ok_or_else(|| anyhow!("Empty balance response"))?;
        parse_u64(value)
    }
}

/// Move `u64` values come back as JSON strings
pub fn parse_u64(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| anyhow!("Invalid u64 '{}': {}", s, e)),
        Value::Number(n) => n.as_u64().ok_or_else(|| anyhow!("Invalid u64: {}", n)),
        other => Err(anyhow!("Expected u64, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_values_parse_from_strings_and_numbers() {
        assert_eq!(parse_u64(&json!("123")).unwrap(), 123);
        assert_eq!(parse_u64(&json!(7)).unwrap(), 7);
        assert!(parse_u64(&json!("-1")).is_err());
        assert!(parse_u64(&json!(null)).is_err());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = AppConfig {
            aptos_node_url: "http://localhost:8080/v1/".to_string(),
            ..AppConfig::default()
        };
        let client = create_aptos_client(&config).unwrap();
        assert_eq!(client.url("/view"), "http://localhost:8080/v1/view");
    }
}
