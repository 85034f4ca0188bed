use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::presenter::balance_presenter::{BalancePresenter, BalancePresenterImpl};
use crate::view::balance_view::TelegramBalanceView;

pub struct MenuCommand;

impl CommandHandler for MenuCommand {
    fn command_name() -> &'static str {
        "menu"
    }

    fn description() -> &'static str {
        "show the main menu"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Menu command received in chat {}", owner);

        // The balance screen carries the main menu keyboard
        let interactor = Arc::new(BalanceInteractorImpl::new(services.sessions()));
        let view = Arc::new(TelegramBalanceView::new(bot, msg.chat.id));
        let presenter = BalancePresenterImpl::new(interactor, view);

        presenter.show_balance(owner).await
    }
}
