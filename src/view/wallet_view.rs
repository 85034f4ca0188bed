use crate::commands::ui;
use crate::entity::AccountSummary;
use crate::interactor::session::WalletSession;
use crate::qrcodeutils;
use crate::aptos::shorten_address;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait WalletView: Send + Sync {
    async fn display_wallet_created(&self, account: &AccountSummary, mnemonic: &str) -> Result<()>;
    async fn display_wallet_imported(&self, account: &AccountSummary) -> Result<()>;
    async fn prompt_for_mnemonic(&self) -> Result<()>;
    async fn display_invalid_mnemonic(&self) -> Result<()>;
    async fn display_wallet_address(
        &self,
        account: &AccountSummary,
        wallet_id: Option<String>,
    ) -> Result<()>;
    async fn display_accounts(&self, accounts: &[AccountSummary], current: usize) -> Result<()>;
    async fn display_account_added(&self, account: &AccountSummary) -> Result<()>;
    async fn display_session(&self, session: &WalletSession) -> Result<()>;
    async fn display_wallet_id_registered(&self, wallet_id: &str, hash: &str) -> Result<()>;
    async fn display_no_wallet(&self) -> Result<()>;
    async fn display_not_connected(&self) -> Result<()>;
    async fn display_wallet_already_exists(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramWalletView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramWalletView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl WalletView for TelegramWalletView {
    async fn display_wallet_created(&self, account: &AccountSummary, mnemonic: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Your Aptos wallet has been created!\n\n\
                    Address: <code>{}</code>\n\n\
                    Recovery phrase: <tg-spoiler>{}</tg-spoiler>\n\n\
                    <b>Important:</b> write the recovery phrase down. It is the only way to restore this wallet.",
                    account.address, mnemonic
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::main_menu_keyboard())
            .await?;

        Ok(())
    }

    async fn display_wallet_imported(&self, account: &AccountSummary) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "✅ Wallet imported.\n\nAddress: <code>{}</code>",
                    account.address
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::main_menu_keyboard())
            .await?;

        Ok(())
    }

    async fn prompt_for_mnemonic(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Send your 12 or 24 word recovery phrase. The message will be deleted right after import.",
            )
            .await?;
        Ok(())
    }

    async fn display_invalid_mnemonic(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "That is not a valid recovery phrase. Check the words and try again, or /cancel.",
            )
            .await?;
        Ok(())
    }

    async fn display_wallet_address(
        &self,
        account: &AccountSummary,
        wallet_id: Option<String>,
    ) -> Result<()> {
        let qr_svg_data = qrcodeutils::generate_qr_code(&account.address)?;

        let wallet_id_line = match wallet_id {
            Some(id) => format!("\nWallet ID: <b>{}</b>", html::escape(&id)),
            None => "\nNo wallet ID yet. Register one with /register_id <i>name</i>".to_string(),
        };

        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Your Aptos address (account #{}):\n\n<code>{}</code>\n{}",
                    account.derivation_index, account.address, wallet_id_line
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;

        let png_data: Vec<u8> = qrcodeutils::convert_svg_to_png(&qr_svg_data)?;

        self.bot
            .send_photo(
                self.chat_id,
                InputFile::memory(png_data).file_name("address.png"),
            )
            .caption("QR code for your address")
            .await?;

        Ok(())
    }

    async fn display_accounts(&self, accounts: &[AccountSummary], current: usize) -> Result<()> {
        let mut text = "<b>Your accounts</b>\n\n".to_string();
        for (i, account) in accounts.iter().enumerate() {
            let marker = if i == current { "👉" } else { "▫️" };
            text.push_str(&format!(
                "{} #{} <code>{}</code>\n",
                marker,
                account.derivation_index,
                shorten_address(&account.address)
            ));
        }
        text.push_str("\nTap an account to switch to it.");

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::accounts_keyboard(accounts, current))
            .await?;

        Ok(())
    }

    async fn display_account_added(&self, account: &AccountSummary) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Account #{} added:\n<code>{}</code>\n\nUse /accounts to switch to it.",
                    account.derivation_index, account.address
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_session(&self, session: &WalletSession) -> Result<()> {
        let text = match (&session.account, session.is_connected()) {
            (Some(account), true) => {
                let balance = session
                    .balance
                    .map(|balance| format!("\nBalance: <b>{} APT</b>", balance.normalize()))
                    .unwrap_or_default();
                format!(
                    "🟢 Connected to account #{}\n<code>{}</code>{}",
                    account.derivation_index, account.address, balance
                )
            }
            (Some(account), false) => format!(
                "🔴 Disconnected from <code>{}</code>\nUse /connect to reconnect.",
                shorten_address(&account.address)
            ),
            (None, _) => "🔴 No wallet connected.".to_string(),
        };

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_wallet_id_registered(&self, wallet_id: &str, hash: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "✅ Wallet ID <b>{}</b> registered.\nTransaction: <code>{}</code>\nOthers can now pay you by this ID.",
                    html::escape(wallet_id),
                    hash
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
                "You don't have a wallet yet. Use /create_wallet to create one or /import_wallet to restore one.",
            )
            .reply_markup(ui::no_wallet_keyboard())
            .await?;

        Ok(())
    }

    async fn display_not_connected(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Your wallet is disconnected. Use /connect first.",
            )
            .await?;
        Ok(())
    }

    async fn display_wallet_already_exists(&self) -> Result<()> {
        self.bot.send_message(
            self.chat_id,
            "You already have a wallet. Use /address to see the address, or /add_account to derive another account."
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
