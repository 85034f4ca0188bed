use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::State;
use teloxide::dispatching::dialogue::Dialogue;

pub mod balance;
pub mod callback;
pub mod company;
pub mod help;
pub mod history;
pub mod menu;
pub mod rewards;
pub mod send;
pub mod split;
pub mod start;
pub mod ui;
pub mod wallet;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command
    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Wallets belong to the chat they were created in
pub fn owner_of(msg: &Message) -> i64 {
    msg.chat.id.0
}

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            start::StartCommand::command_name(),
            start::StartCommand::description(),
        ),
        (
            menu::MenuCommand::command_name(),
            menu::MenuCommand::description(),
        ),
        (
            wallet::CreateWalletCommand::command_name(),
            wallet::CreateWalletCommand::description(),
        ),
        (
            wallet::ImportWalletCommand::command_name(),
            wallet::ImportWalletCommand::description(),
        ),
        (
            wallet::AddressCommand::command_name(),
            wallet::AddressCommand::description(),
        ),
        (
            wallet::AccountsCommand::command_name(),
            wallet::AccountsCommand::description(),
        ),
        (
            wallet::AddAccountCommand::command_name(),
            wallet::AddAccountCommand::description(),
        ),
        (
            wallet::ConnectCommand::command_name(),
            wallet::ConnectCommand::description(),
        ),
        (
            wallet::DisconnectCommand::command_name(),
            wallet::DisconnectCommand::description(),
        ),
        ("register_id", "register a wallet ID others can pay"),
        (
            balance::BalanceCommand::command_name(),
            balance::BalanceCommand::description(),
        ),
        (
            send::SendCommand::command_name(),
            send::SendCommand::description(),
        ),
        (
            split::SplitCommand::command_name(),
            split::SplitCommand::description(),
        ),
        (
            history::HistoryCommand::command_name(),
            history::HistoryCommand::description(),
        ),
        (
            history::ExportCommand::command_name(),
            history::ExportCommand::description(),
        ),
        ("invoice", "receipt image for a transaction hash"),
        (
            rewards::EmiCommand::command_name(),
            rewards::EmiCommand::description(),
        ),
        (
            rewards::CouponsCommand::command_name(),
            rewards::CouponsCommand::description(),
        ),
        (
            rewards::TierCommand::command_name(),
            rewards::TierCommand::description(),
        ),
        (
            company::CompanyCommand::command_name(),
            company::CompanyCommand::description(),
        ),
        ("new_coupon", "create a coupon template"),
        ("mint_coupon", "send a coupon to a customer"),
        ("deactivate_coupon", "stop issuing a coupon template"),
        ("new_emi", "create an EMI agreement with a customer"),
        ("collect_emi", "collect a due EMI installment"),
        ("cancel", "cancel the current operation"),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
    ]
}

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "start the bot and show your wallet")]
    Start,
    #[command(description = "show the main menu")]
    Menu,
    #[command(description = "display this help message")]
    Help,
    #[command(description = "cancel the current operation")]
    Cancel,
    #[command(rename = "create_wallet", description = "create a new Aptos wallet")]
    CreateWallet,
    #[command(rename = "import_wallet", description = "restore a wallet from its recovery phrase")]
    ImportWallet(String),
    #[command(description = "show your address and QR code")]
    Address,
    #[command(description = "list and switch accounts")]
    Accounts,
    #[command(rename = "add_account", description = "derive another account")]
    AddAccount,
    #[command(description = "connect your wallet")]
    Connect,
    #[command(description = "disconnect your wallet")]
    Disconnect,
    #[command(rename = "register_id", description = "register a wallet ID others can pay")]
    RegisterId(String),
    #[command(description = "show your APT balance")]
    Balance,
    #[command(description = "send APT to an address, wallet ID or UPI ID")]
    Send,
    #[command(description = "split a bill between several people")]
    Split,
    #[command(description = "show your transactions (all, sent, received, pending, failed)")]
    History(String),
    #[command(description = "download your history as CSV")]
    Export,
    #[command(description = "receipt image for a transaction hash")]
    Invoice(String),
    #[command(description = "your EMI agreements")]
    Emi,
    #[command(description = "your coupons")]
    Coupons,
    #[command(description = "your loyalty tier")]
    Tier,
    #[command(description = "company dashboard")]
    Company,
    #[command(rename = "new_coupon", description = "create a coupon template")]
    NewCoupon(String),
    #[command(rename = "mint_coupon", description = "send a coupon to a customer")]
    MintCoupon(String),
    #[command(rename = "deactivate_coupon", description = "stop issuing a coupon template")]
    DeactivateCoupon(String),
    #[command(rename = "new_emi", description = "create an EMI agreement with a customer")]
    NewEmi(String),
    #[command(rename = "collect_emi", description = "collect a due EMI installment")]
    CollectEmi(String),
}

/// Entry point for every slash command. Any dialogue in progress is dropped
/// first; flows that need one start their own.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let owner = owner_of(&msg);
    info!("Command {:?} received in chat {}", cmd, owner);

    dialogue.update(State::Start).await?;
    let dialogue = Some(dialogue);

    match cmd {
        BotCommands::Start => start::StartCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Menu => menu::MenuCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Help => help::HelpCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Cancel => {
            bot.send_message(msg.chat.id, "Cancelled.")
                .reply_markup(ui::main_menu_keyboard())
                .await?;
            Ok(())
        }
        BotCommands::CreateWallet => {
            wallet::CreateWalletCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::ImportWallet(phrase) => {
            if phrase.trim().is_empty() {
                wallet::ImportWalletCommand::execute(bot, msg, owner, dialogue, services).await
            } else {
                wallet::import_inline(bot, msg, owner, &phrase, services).await
            }
        }
        BotCommands::Address => {
            wallet::AddressCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Accounts => {
            wallet::AccountsCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::AddAccount => {
            wallet::AddAccountCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Connect => {
            wallet::ConnectCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Disconnect => {
            wallet::DisconnectCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::RegisterId(wallet_id) => {
            wallet::register_wallet_id(bot, msg, owner, &wallet_id, services).await
        }
        BotCommands::Balance => {
            balance::BalanceCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Send => send::SendCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Split => split::SplitCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::History(filter) => history::show_history(bot, msg, owner, &filter, services).await,
        BotCommands::Export => {
            history::ExportCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Invoice(hash) => history::send_invoice(bot, msg, owner, &hash, services).await,
        BotCommands::Emi => rewards::EmiCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Coupons => {
            rewards::CouponsCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::Tier => rewards::TierCommand::execute(bot, msg, owner, dialogue, services).await,
        BotCommands::Company => {
            company::CompanyCommand::execute(bot, msg, owner, dialogue, services).await
        }
        BotCommands::NewCoupon(args) => company::new_coupon(bot, msg, owner, &args, services).await,
        BotCommands::MintCoupon(args) => company::mint_coupon(bot, msg, owner, &args, services).await,
        BotCommands::DeactivateCoupon(args) => {
            company::deactivate_coupon(bot, msg, owner, &args, services).await
        }
        BotCommands::NewEmi(args) => company::new_emi(bot, msg, owner, &args, services).await,
        BotCommands::CollectEmi(args) => company::collect_emi(bot, msg, owner, &args, services).await,
    }
}
