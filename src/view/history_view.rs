use crate::aptos::shorten_address;
use crate::commands::ui;
use crate::entity::{TransactionRecord, TransactionStatus, TransactionType};
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
    utils::html,
    Bot,
};

/// Records shown in one history message
pub const HISTORY_PAGE_SIZE: usize = 10;

#[async_trait]
pub trait HistoryView: Send + Sync {
    async fn display_history(&self, records: &[TransactionRecord], total: usize, filter_label: &str) -> Result<()>;
    async fn display_empty_history(&self, filter_label: &str) -> Result<()>;
    async fn send_csv(&self, csv: Vec<u8>, count: usize) -> Result<()>;
    async fn send_invoice(&self, record: &TransactionRecord, png: Vec<u8>) -> Result<()>;
    async fn prompt_for_invoice_hash(&self) -> Result<()>;
    async fn display_transaction_not_found(&self, hash: &str) -> Result<()>;
    async fn display_no_wallet(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramHistoryView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramHistoryView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

fn status_icon(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Confirmed => "✅",
        TransactionStatus::Pending => "⏳",
        TransactionStatus::Failed => "❌",
    }
}

pub fn format_record_line(record: &TransactionRecord) -> String {
    let (arrow, counterparty) = match record.tx_type {
        TransactionType::Received => ("⬇️ from", &record.from),
        _ => ("⬆️ to", &record.to),
    };

    format!(
        "{} <b>{} APT</b> {} <code>{}</code>\n{} · <code>{}</code>",
        status_icon(record.status),
        record.amount.normalize(),
        arrow,
        shorten_address(counterparty),
        record.timestamp.format("%Y-%m-%d %H:%M"),
        shorten_address(&record.hash)
    )
}

#[async_trait]
impl HistoryView for TelegramHistoryView {
    async fn display_history(&self, records: &[TransactionRecord], total: usize, filter_label: &str) -> Result<()> {
        let mut text = format!("<b>Transaction history</b> ({})\n\n", html::escape(filter_label));
        for record in records.iter().take(HISTORY_PAGE_SIZE) {
            text.push_str(&format_record_line(record));
            text.push_str("\n\n");
        }
        if total > HISTORY_PAGE_SIZE {
            text.push_str(&format!(
                "Showing the latest {} of {}. Use /export for the full list.\n",
                HISTORY_PAGE_SIZE, total
            ));
        }
        text.push_str("Receipt for a transaction: /invoice <i>hash</i>");

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::history_filter_keyboard())
            .await?;
        Ok(())
    }

    async fn display_empty_history(&self, filter_label: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("No transactions found ({}).", filter_label),
            )
            .reply_markup(ui::history_filter_keyboard())
            .await?;
        Ok(())
    }

    async fn send_csv(&self, csv: Vec<u8>, count: usize) -> Result<()> {
        self.bot
            .send_document(self.chat_id, InputFile::memory(csv).file_name("history.csv"))
            .caption(format!("{} transactions", count))
            .await?;
        Ok(())
    }

    async fn send_invoice(&self, record: &TransactionRecord, png: Vec<u8>) -> Result<()> {
        let file_name = format!("invoice-{}.png", record.hash.trim_start_matches("0x").chars().take(12).collect::<String>());
        self.bot
            .send_photo(self.chat_id, InputFile::memory(png).file_name(file_name))
            .caption(format!(
                "Receipt for {} APT ({})",
                record.amount.normalize(),
                record.status
            ))
            .await?;
        Ok(())
    }

    async fn prompt_for_invoice_hash(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Usage: /invoice <transaction hash>. Hashes are listed in /history.",
            )
            .await?;
        Ok(())
    }

    async fn display_transaction_not_found(&self, hash: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "No transaction with hash <code>{}</code> in your history.",
                    html::escape(hash)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_no_wallet(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "You don't have a wallet yet. Use /create_wallet to create a new wallet.",
            )
            .await?;
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("Error: {}", error_message))
            .await?;
        Ok(())
    }
}
