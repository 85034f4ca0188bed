use crate::entity::BotError;
use log::error;

pub mod balance_presenter;
pub mod company_presenter;
pub mod history_presenter;
pub mod rewards_presenter;
pub mod send_presenter;
pub mod split_presenter;
pub mod wallet_presenter;

/// Text shown for a failed operation. Validation failures are shown as they
/// are; network and storage failures are logged and reported generically.
pub fn user_error_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<BotError>() {
        Some(
            BotError::Storage(_)
            | BotError::AptosClient(_)
            | BotError::TelegramApi(_)
            | BotError::WalletCreationError(_),
        )
        | None => {
            error!("Operation failed: {:#}", e);
            "Something went wrong while talking to the Aptos network. Please try again later."
                .to_string()
        }
        Some(bot_error) => bot_error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_shown_verbatim() {
        let e = anyhow::Error::from(BotError::InvalidAmount);
        assert_eq!(user_error_message(&e), "Invalid amount");
    }

    #[test]
    fn unknown_errors_are_generic() {
        let e = anyhow::anyhow!("connection reset by peer");
        assert!(!user_error_message(&e).contains("connection reset"));
    }
}
