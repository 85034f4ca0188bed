use crate::aptos::{apt_to_octas, SuperWalletContract};
use crate::entity::{
    AccountSummary, BotError, EmiAgreement, LoyaltyStatus, OfferNft, TransactionStatus,
    TransactionType,
};
use crate::interactor::session::SessionManager;
use crate::storage::keys::{emi_agreements_key, offer_nfts_key};
use crate::storage::{load_ids, load_json, KeyValueStore, TransactionStore};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use log::warn;
use std::sync::Arc;

#[async_trait]
pub trait RewardsInteractor: Send + Sync {
    async fn get_emi_agreements(&self, owner: i64) -> Result<Vec<EmiAgreement>>;
    async fn get_offer_nfts(&self, owner: i64) -> Result<Vec<OfferNft>>;
    async fn get_loyalty_status(&self, owner: i64) -> Result<LoyaltyStatus>;
}

pub struct RewardsInteractorImpl {
    store: Arc<dyn KeyValueStore>,
    transactions: Arc<TransactionStore>,
    sessions: Arc<SessionManager>,
    contract: Arc<SuperWalletContract>,
}

impl RewardsInteractorImpl {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        transactions: Arc<TransactionStore>,
        sessions: Arc<SessionManager>,
        contract: Arc<SuperWalletContract>,
    ) -> Self {
        Self {
            store,
            transactions,
            sessions,
            contract,
        }
    }

    async fn account(&self, owner: i64) -> Result<AccountSummary> {
        let session = self.sessions.session(owner).await?;
        Ok(session.account.ok_or(BotError::WalletNotFound)?)
    }

    /// Tier inputs derived from the local ledger: confirmed transactions and
    /// the octas sent by them
    async fn local_stats(&self, public_key: &str) -> Result<(u64, u64)> {
        let records = self.transactions.get_stored_transactions(public_key).await?;
        let confirmed: Vec<_> = records
            .iter()
            .filter(|record| record.status == TransactionStatus::Confirmed)
            .collect();

        let volume = confirmed
            .iter()
            .filter(|record| record.tx_type == TransactionType::Sent)
            .filter_map(|record| apt_to_octas(record.amount).ok())
            .sum();

        Ok((confirmed.len() as u64, volume))
    }
}

#[async_trait]
impl RewardsInteractor for RewardsInteractorImpl {
    async fn get_emi_agreements(&self, owner: i64) -> Result<Vec<EmiAgreement>> {
        let account = self.account(owner).await?;
        let ids = load_ids(self.store.as_ref(), &emi_agreements_key(&account.address)).await?;

        let fetched = join_all(ids.iter().map(|id| self.contract.get_emi_agreement(*id))).await;

        Ok(ids
            .into_iter()
            .zip(fetched)
            .filter_map(|(id, result)| match result {
                Ok(agreement) => Some(agreement),
                Err(e) => {
                    warn!("Skipping EMI agreement {}: {}", id, e);
                    None
                }
            })
            .collect())
    }

    async fn get_offer_nfts(&self, owner: i64) -> Result<Vec<OfferNft>> {
        let account = self.account(owner).await?;
        let mut offers: Vec<OfferNft> =
            load_json(self.store.as_ref(), &offer_nfts_key(&account.address))
                .await?
                .unwrap_or_default();
        offers.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        Ok(offers)
    }

    async fn get_loyalty_status(&self, owner: i64) -> Result<LoyaltyStatus> {
        let account = self.account(owner).await?;

        let (count, volume) = match self.contract.get_user_stats(&account.address).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(
                    "Loyalty stats unavailable for {}, using local ledger: {}",
                    account.address, e
                );
                self.local_stats(&account.public_key).await?
            }
        };

        Ok(LoyaltyStatus::new(count, volume))
    }
}
