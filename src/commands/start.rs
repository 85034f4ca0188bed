use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode};

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::presenter::balance_presenter::{BalancePresenter, BalancePresenterImpl};
use crate::view::balance_view::TelegramBalanceView;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    fn command_name() -> &'static str {
        "start"
    }

    fn description() -> &'static str {
        "start the bot and show your wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;

        info!("Start command received in chat {}", owner);

        // Every /start rebuilds the session from storage
        let session = services.sessions().init(owner).await?;

        let greeting = if session.account.is_some() {
            "<b>Welcome back to Cryptal Super Wallet!</b>"
        } else {
            "<b>Hello!</b> I'm Cryptal, an Aptos wallet that lives in this chat.\n\
            Create a wallet or import one you already have to get started."
        };
        bot.send_message(chat_id, greeting)
            .parse_mode(ParseMode::Html)
            .await?;

        let interactor = Arc::new(BalanceInteractorImpl::new(services.sessions()));
        let view = Arc::new(TelegramBalanceView::new(bot, chat_id));
        let presenter = BalancePresenterImpl::new(interactor, view);

        presenter.show_balance(owner).await?;

        Ok(())
    }
}
