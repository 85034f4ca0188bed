use crate::entity::Resolution;
use crate::interactor::send_interactor::SendInteractor;
use crate::presenter::user_error_message;
use crate::view::send_view::SendView;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A recipient the user picked: the resolved address and what they typed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecipient {
    pub address: String,
    pub display: String,
}

#[async_trait]
pub trait SendPresenter: Send + Sync {
    async fn start_send_flow(&self) -> Result<()>;
    /// `None` keeps the dialogue waiting for another recipient
    async fn handle_recipient(&self, input: &str) -> Result<Option<ResolvedRecipient>>;
    async fn handle_amount(&self, amount_text: &str, recipient: &ResolvedRecipient) -> Result<Option<Decimal>>;
    async fn handle_confirmation(
        &self,
        confirmation_text: &str,
        recipient: &ResolvedRecipient,
        amount: Decimal,
        owner: i64,
    ) -> Result<()>;
}

pub struct SendPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> SendPresenterImpl<I, V>
where
    I: SendInteractor,
    V: SendView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

pub fn is_confirmation(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "yes" | "y" | "confirm")
}

#[async_trait]
impl<I, V> SendPresenter for SendPresenterImpl<I, V>
where
    I: SendInteractor + Send + Sync,
    V: SendView + Send + Sync,
{
    async fn start_send_flow(&self) -> Result<()> {
        self.view.prompt_for_recipient().await
    }

    async fn handle_recipient(&self, input: &str) -> Result<Option<ResolvedRecipient>> {
        let input = input.trim();
        match self.interactor.resolve_recipient(input).await {
            Ok(Resolution::Found { address, .. }) => {
                self.view.prompt_for_amount(input, &address).await?;
                Ok(Some(ResolvedRecipient {
                    address,
                    display: input.to_string(),
                }))
            }
            Ok(Resolution::NotFound { kind }) => {
                self.view.display_recipient_not_found(kind, input).await?;
                Ok(None)
            }
            Ok(Resolution::LookupError { kind, .. }) => {
                self.view.display_lookup_error(kind, input).await?;
                Ok(None)
            }
            Err(e) => {
                self.view.display_invalid_recipient(e.to_string()).await?;
                Ok(None)
            }
        }
    }

    async fn handle_amount(&self, amount_text: &str, recipient: &ResolvedRecipient) -> Result<Option<Decimal>> {
        match self.interactor.parse_amount(amount_text).await {
            Ok(amount) => {
                self.view
                    .prompt_for_confirmation(&recipient.display, &recipient.address, amount)
                    .await?;
                Ok(Some(amount))
            }
            Err(e) => {
                self.view.display_invalid_amount(e.to_string()).await?;
                Ok(None)
            }
        }
    }

    async fn handle_confirmation(
        &self,
        confirmation_text: &str,
        recipient: &ResolvedRecipient,
        amount: Decimal,
        owner: i64,
    ) -> Result<()> {
        if !is_confirmation(confirmation_text) {
            return self.view.display_transaction_cancelled().await;
        }

        let message = self.view.display_processing().await?;

        let result = match self
            .interactor
            .send_transaction(owner, &recipient.address, amount)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                return self
                    .view
                    .display_transaction_error(&recipient.display, amount, user_error_message(&e), message)
                    .await;
            }
        };

        match (result.hash.as_deref(), result.status) {
            (Some(hash), Some(status)) => {
                self.view
                    .display_transaction_submitted(
                        &recipient.display,
                        result.amount,
                        hash,
                        status,
                        result.explorer_url.as_deref(),
                        message,
                    )
                    .await
            }
            _ => {
                self.view
                    .display_transaction_error(
                        &recipient.display,
                        result.amount,
                        result
                            .error_message
                            .unwrap_or_else(|| "Unknown error".to_string()),
                        message,
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_answers_confirm() {
        assert!(is_confirmation("YES"));
        assert!(is_confirmation(" y "));
        assert!(!is_confirmation("no"));
        assert!(!is_confirmation("yes please"));
    }
}
