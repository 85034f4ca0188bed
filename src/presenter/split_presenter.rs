use crate::aptos::utils::parse_apt_amount;
use crate::interactor::split_interactor::SplitInteractor;
use crate::view::split_view::SplitView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SplitPresenter: Send + Sync {
    async fn start_split_flow(&self) -> Result<()>;
    /// `None` keeps the dialogue waiting for a valid list
    async fn handle_participants(&self, text: &str) -> Result<Option<Vec<String>>>;
    /// Returns whether the dialogue is finished
    async fn handle_total(&self, participants: &[String], amount_text: &str) -> Result<bool>;
}

pub struct SplitPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> SplitPresenterImpl<I, V>
where
    I: SplitInteractor,
    V: SplitView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> SplitPresenter for SplitPresenterImpl<I, V>
where
    I: SplitInteractor + Send + Sync,
    V: SplitView + Send + Sync,
{
    async fn start_split_flow(&self) -> Result<()> {
        self.view.prompt_for_participants().await
    }

    async fn handle_participants(&self, text: &str) -> Result<Option<Vec<String>>> {
        match self.interactor.parse_participants(text).await {
            Ok(participants) => {
                self.view.prompt_for_total(&participants).await?;
                Ok(Some(participants))
            }
            Err(e) => {
                self.view.display_invalid_participants(e.to_string()).await?;
                Ok(None)
            }
        }
    }

    async fn handle_total(&self, participants: &[String], amount_text: &str) -> Result<bool> {
        let total = match parse_apt_amount(amount_text) {
            Ok(total) => total,
            Err(e) => {
                self.view.display_invalid_amount(e.to_string()).await?;
                return Ok(false);
            }
        };

        let message = self.view.display_resolving().await?;
        match self.interactor.plan_split(participants, total).await {
            Ok(plan) => {
                self.view.display_plan(&plan, message).await?;
                Ok(true)
            }
            Err(e) => {
                self.view.display_invalid_amount(e.to_string()).await?;
                Ok(false)
            }
        }
    }
}
