use crate::aptos::{self, AptosClient};
use crate::config::AppConfig;
use crate::entity::{
    BotError, Resolution, TransactionRecord, TransactionStatus, TransactionType,
};
use crate::interactor::resolver::RecipientResolver;
use crate::interactor::session::SessionManager;
use crate::storage::TransactionStore;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TransactionResult {
    pub recipient: String,
    pub amount: Decimal,
    pub hash: Option<String>,
    pub status: Option<TransactionStatus>,
    pub explorer_url: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl TransactionResult {
    fn failed(recipient: &str, amount: Decimal, error_message: String) -> Self {
        Self {
            recipient: recipient.to_string(),
            amount,
            hash: None,
            status: None,
            explorer_url: None,
            success: false,
            error_message: Some(error_message),
        }
    }
}

#[async_trait]
pub trait SendInteractor: Send + Sync {
    async fn resolve_recipient(&self, input: &str) -> Result<Resolution, BotError>;
    async fn parse_amount(&self, amount_text: &str) -> Result<Decimal, BotError>;
    async fn send_transaction(
        &self,
        owner: i64,
        recipient: &str,
        amount: Decimal,
    ) -> Result<TransactionResult>;
}

pub struct SendInteractorImpl {
    transactions: Arc<TransactionStore>,
    sessions: Arc<SessionManager>,
    resolver: Arc<RecipientResolver>,
    aptos_client: Arc<AptosClient>,
    config: AppConfig,
}

impl SendInteractorImpl {
    pub fn new(
        transactions: Arc<TransactionStore>,
        sessions: Arc<SessionManager>,
        resolver: Arc<RecipientResolver>,
        aptos_client: Arc<AptosClient>,
        config: AppConfig,
    ) -> Self {
        Self {
            transactions,
            sessions,
            resolver,
            aptos_client,
            config,
        }
    }
}

#[async_trait]
impl SendInteractor for SendInteractorImpl {
    async fn resolve_recipient(&self, input: &str) -> Result<Resolution, BotError> {
        self.resolver.resolve(input).await
    }

    async fn parse_amount(&self, amount_text: &str) -> Result<Decimal, BotError> {
        aptos::utils::parse_apt_amount(amount_text)
    }

    async fn send_transaction(
        &self,
        owner: i64,
        recipient: &str,
        amount: Decimal,
    ) -> Result<TransactionResult> {
        let account = match self.sessions.active_account(owner).await {
            Ok(account) => account,
            Err(e) => return Ok(TransactionResult::failed(recipient, amount, e.to_string())),
        };

        let octas = aptos::apt_to_octas(amount)?;

        match self.sessions.refresh_balance(owner).await {
            Ok(session) => {
                if session.balance.map_or(false, |balance| balance < amount) {
                    return Ok(TransactionResult::failed(
                        recipient,
                        amount,
                        BotError::InsufficientFunds.to_string(),
                    ));
                }
            }
            Err(e) => warn!("Could not check balance before sending: {}", e),
        }

        let hash = match self.aptos_client.transfer_apt(&account, recipient, octas).await {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to submit transfer: {}", e);
                return Ok(TransactionResult::failed(recipient, amount, e.to_string()));
            }
        };

        let mut record = TransactionRecord::new(
            &account.address,
            recipient,
            amount,
            TransactionType::Sent,
            &hash,
            TransactionStatus::Pending,
        );
        self.transactions
            .record_transfer(&account.public_key, &record)
            .await?;

        let status = match self
            .aptos_client
            .wait_for_transaction(&hash, CONFIRMATION_TIMEOUT)
            .await
        {
            Ok(Some(info)) if !info.is_pending() => {
                if info.success == Some(true) {
                    TransactionStatus::Confirmed
                } else {
                    TransactionStatus::Failed
                }
            }
            Ok(_) => TransactionStatus::Pending,
            Err(e) => {
                warn!("Could not confirm {}: {}", hash, e);
                TransactionStatus::Pending
            }
        };

        if status != TransactionStatus::Pending {
            record.status = status;
            self.transactions
                .record_transfer(&account.public_key, &record)
                .await?;
        }
        info!("Transfer {} from owner {} is {}", hash, owner, status);

        Ok(TransactionResult {
            recipient: recipient.to_string(),
            amount,
            hash: Some(hash.clone()),
            status: Some(status),
            explorer_url: Some(self.config.explorer_tx_url(&hash)),
            success: status != TransactionStatus::Failed,
            error_message: None,
        })
    }
}
