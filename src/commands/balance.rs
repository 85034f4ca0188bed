use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::presenter::balance_presenter::{BalancePresenter, BalancePresenterImpl};
use crate::view::balance_view::TelegramBalanceView;

pub struct BalanceCommand;

impl CommandHandler for BalanceCommand {
    fn command_name() -> &'static str {
        "balance"
    }

    fn description() -> &'static str {
        "show your APT balance"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Balance command received in chat {}", owner);

        let interactor = Arc::new(BalanceInteractorImpl::new(services.sessions()));
        let view = Arc::new(TelegramBalanceView::new(bot, msg.chat.id));
        let presenter = BalancePresenterImpl::new(interactor, view);

        presenter.show_balance(owner).await
    }
}
