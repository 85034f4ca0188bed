use crate::entity::BotError;
use crate::interactor::rewards_interactor::RewardsInteractor;
use crate::presenter::user_error_message;
use crate::view::rewards_view::RewardsView;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

#[async_trait]
pub trait RewardsPresenter: Send + Sync {
    async fn show_emi_agreements(&self, owner: i64) -> Result<()>;
    async fn show_offer_nfts(&self, owner: i64) -> Result<()>;
    async fn show_loyalty_status(&self, owner: i64) -> Result<()>;
}

pub struct RewardsPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> RewardsPresenterImpl<I, V>
where
    I: RewardsInteractor,
    V: RewardsView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }

    async fn display_failure(&self, e: anyhow::Error) -> Result<()> {
        match e.downcast_ref::<BotError>() {
            Some(BotError::WalletNotFound) => self.view.display_no_wallet().await,
            _ => self.view.display_error(user_error_message(&e)).await,
        }
    }
}

#[async_trait]
impl<I, V> RewardsPresenter for RewardsPresenterImpl<I, V>
where
    I: RewardsInteractor + Send + Sync,
    V: RewardsView + Send + Sync,
{
    async fn show_emi_agreements(&self, owner: i64) -> Result<()> {
        match self.interactor.get_emi_agreements(owner).await {
            Ok(agreements) => self.view.display_emi_agreements(&agreements).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn show_offer_nfts(&self, owner: i64) -> Result<()> {
        match self.interactor.get_offer_nfts(owner).await {
            Ok(offers) => self.view.display_offer_nfts(&offers, Utc::now()).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn show_loyalty_status(&self, owner: i64) -> Result<()> {
        match self.interactor.get_loyalty_status(owner).await {
            Ok(status) => self.view.display_loyalty_status(&status).await,
            Err(e) => self.display_failure(e).await,
        }
    }
}
