use crate::aptos::shorten_address;
use crate::entity::Resolution;
use crate::interactor::split_interactor::SplitPlan;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait SplitView: Send + Sync {
    async fn prompt_for_participants(&self) -> Result<()>;
    async fn display_invalid_participants(&self, error_message: String) -> Result<()>;
    async fn prompt_for_total(&self, participants: &[String]) -> Result<()>;
    async fn display_invalid_amount(&self, error_message: String) -> Result<()>;
    async fn display_resolving(&self) -> Result<Option<Message>>;
    async fn display_plan(&self, plan: &SplitPlan, message: Option<Message>) -> Result<()>;
}

pub struct TelegramSplitView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSplitView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

pub fn format_plan(plan: &SplitPlan) -> String {
    let mut text = format!(
        "<b>Split of {} APT between {}</b>\n\n",
        plan.total.normalize(),
        plan.shares.len()
    );

    for share in &plan.shares {
        let target = match &share.resolution {
            Ok(Resolution::Found { address, .. }) => {
                format!("<code>{}</code>", shorten_address(address))
            }
            Ok(Resolution::NotFound { kind }) => format!("⚠️ {} not registered", kind),
            Ok(Resolution::LookupError { .. }) => "⚠️ lookup failed".to_string(),
            Err(e) => format!("⚠️ {}", html::escape(&e.to_string())),
        };
        text.push_str(&format!(
            "• {} → {} APT ({})\n",
            html::escape(&share.input),
            share.amount.normalize(),
            target
        ));
    }

    if plan.is_complete() {
        text.push_str("\nEveryone resolved. Each participant can pay their share with /send.");
    } else {
        text.push_str("\nSome participants could not be resolved. Fix them and run /split again.");
    }
    text
}

#[async_trait]
impl SplitView for TelegramSplitView {
    async fn prompt_for_participants(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Who is splitting the bill? Send addresses, wallet IDs or UPI IDs separated by commas:",
            )
            .await?;
        Ok(())
    }

    async fn display_invalid_participants(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("{}. Try again:", error_message))
            .await?;
        Ok(())
    }

    async fn prompt_for_total(&self, participants: &[String]) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "{} participants. Enter the total bill amount in APT:",
                    participants.len()
                ),
            )
            .await?;
        Ok(())
    }

    async fn display_invalid_amount(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("{}. Enter the total in APT, e.g. 3.5:", error_message),
            )
            .await?;
        Ok(())
    }

    async fn display_resolving(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Resolving participants...")
            .await?;
        Ok(Some(message))
    }

    async fn display_plan(&self, plan: &SplitPlan, message: Option<Message>) -> Result<()> {
        let text = format_plan(plan);
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
