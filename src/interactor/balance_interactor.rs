use crate::entity::{AccountSummary, BotError};
use crate::interactor::session::SessionManager;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

#[async_trait]
pub trait BalanceInteractor: Send + Sync {
    async fn get_wallet_balance(&self, owner: i64) -> Result<(AccountSummary, Decimal)>;
}

pub struct BalanceInteractorImpl {
    sessions: Arc<SessionManager>,
}

impl BalanceInteractorImpl {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl BalanceInteractor for BalanceInteractorImpl {
    async fn get_wallet_balance(&self, owner: i64) -> Result<(AccountSummary, Decimal)> {
        let session = self.sessions.session(owner).await?;
        if session.account.is_none() {
            return Err(BotError::WalletNotFound.into());
        }

        let session = self.sessions.refresh_balance(owner).await?;
        let account = session.account.ok_or(BotError::WalletNotFound)?;
        let balance = session.balance.unwrap_or(Decimal::ZERO);

        Ok((account, balance))
    }
}
