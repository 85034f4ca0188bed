use crate::entity::{BotError, TransactionRecord};
use crate::export::transactions_to_csv;
use crate::interactor::session::SessionManager;
use crate::invoice::{render_invoice_png, InvoiceData};
use crate::storage::{TransactionFilter, TransactionStore};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait HistoryInteractor: Send + Sync {
    /// Ledger of the current account, newest first
    async fn get_history(
        &self,
        owner: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>>;
    async fn export_csv(&self, owner: i64) -> Result<Vec<u8>>;
    async fn find_transaction(&self, owner: i64, hash: &str) -> Result<TransactionRecord>;
    async fn render_invoice(&self, owner: i64, hash: &str) -> Result<(TransactionRecord, Vec<u8>)>;
}

pub struct HistoryInteractorImpl {
    transactions: Arc<TransactionStore>,
    sessions: Arc<SessionManager>,
}

impl HistoryInteractorImpl {
    pub fn new(transactions: Arc<TransactionStore>, sessions: Arc<SessionManager>) -> Self {
        Self {
            transactions,
            sessions,
        }
    }

    async fn ledger_key(&self, owner: i64) -> Result<String> {
        let session = self.sessions.session(owner).await?;
        let account = session.account.ok_or(BotError::WalletNotFound)?;
        Ok(account.public_key)
    }
}

#[async_trait]
impl HistoryInteractor for HistoryInteractorImpl {
    async fn get_history(
        &self,
        owner: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>> {
        let public_key = self.ledger_key(owner).await?;
        let records = self.transactions.get_stored_transactions(&public_key).await?;
        Ok(filter.apply(&records))
    }

    async fn export_csv(&self, owner: i64) -> Result<Vec<u8>> {
        let public_key = self.ledger_key(owner).await?;
        let records = self.transactions.get_stored_transactions(&public_key).await?;
        info!("Exporting {} transactions for owner {}", records.len(), owner);
        transactions_to_csv(&records)
    }

    async fn find_transaction(&self, owner: i64, hash: &str) -> Result<TransactionRecord> {
        let public_key = self.ledger_key(owner).await?;
        self.transactions
            .find(&public_key, hash.trim())
            .await?
            .ok_or_else(|| BotError::TransactionNotFound(hash.trim().to_string()).into())
    }

    async fn render_invoice(&self, owner: i64, hash: &str) -> Result<(TransactionRecord, Vec<u8>)> {
        let record = self.find_transaction(owner, hash).await?;
        let png = render_invoice_png(&InvoiceData::from(&record))?;
        Ok((record, png))
    }
}
