use crate::entity::BotError;
use crate::interactor::history_interactor::HistoryInteractor;
use crate::presenter::user_error_message;
use crate::storage::TransactionFilter;
use crate::view::history_view::HistoryView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait HistoryPresenter: Send + Sync {
    async fn show_history(&self, owner: i64, query: &str) -> Result<()>;
    async fn export_history(&self, owner: i64) -> Result<()>;
    async fn send_invoice(&self, owner: i64, hash: &str) -> Result<()>;
}

pub struct HistoryPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> HistoryPresenterImpl<I, V>
where
    I: HistoryInteractor,
    V: HistoryView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }

    async fn display_failure(&self, e: anyhow::Error) -> Result<()> {
        match e.downcast_ref::<BotError>() {
            Some(BotError::WalletNotFound) => self.view.display_no_wallet().await,
            Some(BotError::TransactionNotFound(hash)) => {
                self.view.display_transaction_not_found(hash).await
            }
            _ => self.view.display_error(user_error_message(&e)).await,
        }
    }
}

fn filter_label(query: &str) -> String {
    match query.trim() {
        "" => "all".to_string(),
        other => other.to_lowercase(),
    }
}

#[async_trait]
impl<I, V> HistoryPresenter for HistoryPresenterImpl<I, V>
where
    I: HistoryInteractor + Send + Sync,
    V: HistoryView + Send + Sync,
{
    async fn show_history(&self, owner: i64, query: &str) -> Result<()> {
        let filter = TransactionFilter::from_query(query);
        let label = filter_label(query);

        match self.interactor.get_history(owner, &filter).await {
            Ok(records) if records.is_empty() => self.view.display_empty_history(&label).await,
            Ok(records) => {
                self.view
                    .display_history(&records, records.len(), &label)
                    .await
            }
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn export_history(&self, owner: i64) -> Result<()> {
        let count = match self
            .interactor
            .get_history(owner, &TransactionFilter::default())
            .await
        {
            Ok(records) => records.len(),
            Err(e) => return self.display_failure(e).await,
        };

        match self.interactor.export_csv(owner).await {
            Ok(csv) => self.view.send_csv(csv, count).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn send_invoice(&self, owner: i64, hash: &str) -> Result<()> {
        if hash.trim().is_empty() {
            return self.view.prompt_for_invoice_hash().await;
        }

        match self.interactor.render_invoice(owner, hash).await {
            Ok((record, png)) => self.view.send_invoice(&record, png).await,
            Err(e) => self.display_failure(e).await,
        }
    }
}
