use crate::commands::ui;
use crate::entity::AccountSummary;
use anyhow::Result;
use async_trait::async_trait;
use chrono;
use rust_decimal::Decimal;
use teloxide::{
    prelude::*,
    types::{Message, ParseMode},
    Bot,
};

#[async_trait]
pub trait BalanceView: Send + Sync {
    async fn display_loading(&self) -> Result<Option<Message>>;
    async fn display_balance(
        &self,
        account: &AccountSummary,
        balance: Decimal,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_no_wallet(&self, message: Option<Message>) -> Result<()>;
    async fn display_not_connected(&self, message: Option<Message>) -> Result<()>;
    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()>;
}

pub struct TelegramBalanceView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramBalanceView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_or_edit(
        &self,
        text: String,
        message: Option<Message>,
        keyboard: teloxide::types::InlineKeyboardMarkup,
    ) -> Result<()> {
        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BalanceView for TelegramBalanceView {
    async fn display_loading(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Fetching balance...")
            .await?;

        Ok(Some(message))
    }

    async fn display_balance(
        &self,
        account: &AccountSummary,
        balance: Decimal,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "<b>Aptos</b> · account #{}\n\
            <code>{}</code>\n\n\
            Balance: <b>{}</b> APT\n\n\
            —\n\
            Updated: {} UTC",
            account.derivation_index,
            account.address,
            balance.normalize(),
            chrono::Utc::now().format("%H:%M:%S")
        );

        self.send_or_edit(text, message, ui::main_menu_keyboard())
            .await
    }

    async fn display_no_wallet(&self, message: Option<Message>) -> Result<()> {
        let text = "You don't have a wallet yet. Use /create_wallet to create a new wallet.".to_string();
        self.send_or_edit(text, message, ui::no_wallet_keyboard())
            .await
    }

    async fn display_not_connected(&self, message: Option<Message>) -> Result<()> {
        let text = "Your wallet is disconnected. Use /connect to see your balance.".to_string();
        self.send_or_edit(text, message, ui::connect_keyboard())
            .await
    }

    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()> {
        let text = format!("❌ Error fetching balance: {}", error_message);
        self.send_or_edit(text, message, ui::main_menu_keyboard())
            .await
    }
}
