use crate::commands::ui;
use crate::entity::{RecipientKind, TransactionStatus};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait SendView: Send + Sync {
    async fn prompt_for_recipient(&self) -> Result<()>;
    async fn display_invalid_recipient(&self, error_message: String) -> Result<()>;
    async fn display_recipient_not_found(&self, kind: RecipientKind, input: &str) -> Result<()>;
    async fn display_lookup_error(&self, kind: RecipientKind, input: &str) -> Result<()>;
    async fn prompt_for_amount(&self, display: &str, address: &str) -> Result<()>;
    async fn display_invalid_amount(&self, error_message: String) -> Result<()>;
    async fn prompt_for_confirmation(&self, display: &str, address: &str, amount: Decimal) -> Result<()>;
    async fn display_processing(&self) -> Result<Option<Message>>;
    async fn display_transaction_submitted(
        &self,
        display: &str,
        amount: Decimal,
        hash: &str,
        status: TransactionStatus,
        explorer_url: Option<&str>,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_transaction_error(
        &self,
        display: &str,
        amount: Decimal,
        error_message: String,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_transaction_cancelled(&self) -> Result<()>;
}

pub struct TelegramSendView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSendView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_or_edit(&self, text: String, message: Option<Message>) -> Result<()> {
        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(())
    }
}

fn kind_label(kind: RecipientKind) -> &'static str {
    match kind {
        RecipientKind::Address => "Address",
        RecipientKind::WalletId => "Wallet ID",
        RecipientKind::UpiId => "UPI ID",
    }
}

#[async_trait]
impl SendView for TelegramSendView {
    async fn prompt_for_recipient(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Who do you want to pay? Send an Aptos address (0x...), a wallet ID or a UPI ID (name@bank):",
            )
            .await?;
        Ok(())
    }

    async fn display_invalid_recipient(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("{}. Please check it and try again:", error_message),
            )
            .await?;
        Ok(())
    }

    async fn display_recipient_not_found(&self, kind: RecipientKind, input: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "{} <b>{}</b> is not registered. Try another recipient:",
                    kind_label(kind),
                    html::escape(input)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_lookup_error(&self, kind: RecipientKind, input: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Could not look up {} <b>{}</b> right now. Try again in a moment, or send the address directly:",
                    kind_label(kind),
                    html::escape(input)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn prompt_for_amount(&self, display: &str, address: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Recipient: <b>{}</b>\n<code>{}</code>\n\nEnter the amount to send (example: 0.5 APT):",
                    html::escape(display),
                    address
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_invalid_amount(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "{}. Enter a positive amount with at most 8 decimals, e.g. 1.25 APT:",
                    error_message
                ),
            )
            .await?;
        Ok(())
    }

    async fn prompt_for_confirmation(&self, display: &str, address: &str, amount: Decimal) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Confirm sending <b>{} APT</b> to <b>{}</b>\n<code>{}</code>\n\n(yes/no)",
                    amount.normalize(),
                    html::escape(display),
                    address
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::confirmation_keyboard())
            .await?;
        Ok(())
    }

    async fn display_processing(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Sending funds... Please wait.")
            .await?;

        Ok(Some(message))
    }

    async fn display_transaction_submitted(
        &self,
        display: &str,
        amount: Decimal,
        hash: &str,
        status: TransactionStatus,
        explorer_url: Option<&str>,
        message: Option<Message>,
    ) -> Result<()> {
        let headline = match status {
            TransactionStatus::Confirmed => "✅ Payment confirmed.",
            TransactionStatus::Pending => "⏳ Payment submitted. It is still pending; /history will show the final status.",
            TransactionStatus::Failed => "❌ Payment failed on chain.",
        };
        let link = explorer_url
            .map(|url| format!("\n<a href=\"{}\">View on explorer</a>", html::escape(url)))
            .unwrap_or_default();

        let text = format!(
            "{}\nAmount: {} APT\nTo: {}\nTx: <code>{}</code>{}\n\nReceipt: /invoice {}",
            headline,
            amount.normalize(),
            html::escape(display),
            hash,
            link,
            hash
        );

        self.send_or_edit(text, message).await
    }

    async fn display_transaction_error(
        &self,
        display: &str,
        amount: Decimal,
        error_message: String,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "❌ Error sending {} APT to {}:\n{}",
            amount.normalize(),
            html::escape(display),
            html::escape(&error_message)
        );

        self.send_or_edit(text, message).await
    }

    async fn display_transaction_cancelled(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Transaction cancelled.")
            .await?;

        Ok(())
    }
}
