use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{owner_of, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::wallet_interactor::WalletInteractorImpl;
use crate::presenter::wallet_presenter::{WalletPresenter, WalletPresenterImpl};
use crate::view::wallet_view::TelegramWalletView;

pub fn wallet_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> WalletPresenterImpl<WalletInteractorImpl, TelegramWalletView> {
    let interactor = Arc::new(WalletInteractorImpl::new(
        services.store(),
        services.sessions(),
        services.contract(),
    ));
    let view = Arc::new(TelegramWalletView::new(bot, chat_id));
    WalletPresenterImpl::new(interactor, view)
}

pub struct CreateWalletCommand;

impl CommandHandler for CreateWalletCommand {
    fn command_name() -> &'static str {
        "create_wallet"
    }

    fn description() -> &'static str {
        "create a new Aptos wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Create wallet command received in chat {}", owner);

        wallet_presenter(bot, msg.chat.id, &services)
            .create_wallet(owner)
            .await
    }
}

pub struct ImportWalletCommand;

impl CommandHandler for ImportWalletCommand {
    fn command_name() -> &'static str {
        "import_wallet"
    }

    fn description() -> &'static str {
        "restore a wallet from its recovery phrase"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow::anyhow!("Dialogue context not provided"))?;
        info!("Import wallet command received in chat {}", owner);

        start_import(bot, msg.chat.id, dialogue, &services).await
    }
}

pub async fn start_import(
    bot: Bot,
    chat_id: ChatId,
    dialogue: MyDialogue,
    services: &ServiceContainer,
) -> Result<()> {
    dialogue.update(State::AwaitingMnemonic).await?;
    wallet_presenter(bot, chat_id, services).start_import().await
}

/// Recovery phrases must not linger in the chat history
async fn delete_phrase_message(bot: &Bot, msg: &Message) {
    if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
        warn!("Could not delete the recovery phrase message: {}", e);
    }
}

/// `/import_wallet <phrase>` in a single message
pub async fn import_inline(
    bot: Bot,
    msg: Message,
    owner: i64,
    phrase: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    delete_phrase_message(&bot, &msg).await;
    wallet_presenter(bot, msg.chat.id, &services)
        .import_wallet(owner, phrase)
        .await?;
    Ok(())
}

pub async fn receive_mnemonic(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(phrase) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send your recovery phrase as text:")
            .await?;
        return Ok(());
    };
    let phrase = phrase.to_string();

    delete_phrase_message(&bot, &msg).await;

    let finished = wallet_presenter(bot, msg.chat.id, &services)
        .import_wallet(owner_of(&msg), &phrase)
        .await?;
    if finished {
        dialogue.exit().await?;
    }

    Ok(())
}

pub struct AddressCommand;

impl CommandHandler for AddressCommand {
    fn command_name() -> &'static str {
        "address"
    }

    fn description() -> &'static str {
        "show your address and QR code"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Address command received in chat {}", owner);

        wallet_presenter(bot, msg.chat.id, &services)
            .show_wallet_address(owner)
            .await
    }
}

pub struct AccountsCommand;

impl CommandHandler for AccountsCommand {
    fn command_name() -> &'static str {
        "accounts"
    }

    fn description() -> &'static str {
        "list and switch accounts"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        wallet_presenter(bot, msg.chat.id, &services)
            .show_accounts(owner)
            .await
    }
}

pub struct AddAccountCommand;

impl CommandHandler for AddAccountCommand {
    fn command_name() -> &'static str {
        "add_account"
    }

    fn description() -> &'static str {
        "derive another account"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Add account command received in chat {}", owner);

        wallet_presenter(bot, msg.chat.id, &services)
            .add_account(owner)
            .await
    }
}

pub struct ConnectCommand;

impl CommandHandler for ConnectCommand {
    fn command_name() -> &'static str {
        "connect"
    }

    fn description() -> &'static str {
        "connect your wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        wallet_presenter(bot, msg.chat.id, &services)
            .connect(owner)
            .await
    }
}

pub struct DisconnectCommand;

impl CommandHandler for DisconnectCommand {
    fn command_name() -> &'static str {
        "disconnect"
    }

    fn description() -> &'static str {
        "disconnect your wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        wallet_presenter(bot, msg.chat.id, &services)
            .disconnect(owner)
            .await
    }
}

/// `/register_id <wallet id>`
pub async fn register_wallet_id(
    bot: Bot,
    msg: Message,
    owner: i64,
    wallet_id: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    if wallet_id.trim().is_empty() {
        bot.send_message(
            msg.chat.id,
            "Usage: /register_id <wallet id>\n\
            3 to 32 characters: letters, digits, '.', '_' or '-'.",
        )
        .await?;
        return Ok(());
    }

    info!("Wallet ID registration requested in chat {}", owner);
    wallet_presenter(bot, msg.chat.id, &services)
        .register_wallet_id(owner, wallet_id)
        .await
}
