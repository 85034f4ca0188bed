use crate::entity::BotError;
use crate::interactor::balance_interactor::BalanceInteractor;
use crate::presenter::user_error_message;
use crate::view::balance_view::BalanceView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::types::Message;

#[async_trait]
pub trait BalancePresenter: Send + Sync {
    async fn show_balance(&self, owner: i64) -> Result<()>;
    /// Updates `message` in place when given
    async fn refresh_balance(&self, owner: i64, message: Option<Message>) -> Result<()>;
}

pub struct BalancePresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> BalancePresenterImpl<I, V>
where
    I: BalanceInteractor,
    V: BalanceView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> BalancePresenter for BalancePresenterImpl<I, V>
where
    I: BalanceInteractor + Send + Sync,
    V: BalanceView + Send + Sync,
{
    async fn show_balance(&self, owner: i64) -> Result<()> {
        let message = self.view.display_loading().await?;
        self.refresh_balance(owner, message).await
    }

    async fn refresh_balance(&self, owner: i64, message: Option<Message>) -> Result<()> {
        match self.interactor.get_wallet_balance(owner).await {
            Ok((account, balance)) => {
                self.view.display_balance(&account, balance, message).await?;
            }
            Err(e) => match e.downcast_ref::<BotError>() {
                Some(BotError::WalletNotFound) => {
                    self.view.display_no_wallet(message).await?;
                }
                Some(BotError::SessionNotConnected) => {
                    self.view.display_not_connected(message).await?;
                }
                _ => {
                    self.view
                        .display_error(user_error_message(&e), message)
                        .await?;
                }
            },
        }

        Ok(())
    }
}
