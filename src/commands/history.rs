use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::history_interactor::HistoryInteractorImpl;
use crate::presenter::history_presenter::{HistoryPresenter, HistoryPresenterImpl};
use crate::view::history_view::TelegramHistoryView;

pub struct HistoryCommand;
pub struct ExportCommand;

fn history_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> HistoryPresenterImpl<HistoryInteractorImpl, TelegramHistoryView> {
    let interactor = Arc::new(HistoryInteractorImpl::new(
        services.transactions(),
        services.sessions(),
    ));
    let view = Arc::new(TelegramHistoryView::new(bot, chat_id));
    HistoryPresenterImpl::new(interactor, view)
}

impl CommandHandler for HistoryCommand {
    fn command_name() -> &'static str {
        "history"
    }

    fn description() -> &'static str {
        "show your transactions (all, sent, received, pending, failed)"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        show_history(bot, msg, owner, "", services).await
    }
}

impl CommandHandler for ExportCommand {
    fn command_name() -> &'static str {
        "export"
    }

    fn description() -> &'static str {
        "download your history as CSV"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Export command received in chat {}", owner);
        export_history(bot, msg.chat.id, owner, &services).await
    }
}

/// `/history [filter]`
pub async fn show_history(
    bot: Bot,
    msg: Message,
    owner: i64,
    filter: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("History requested in chat {} with filter {:?}", owner, filter);
    show_filtered(bot, msg.chat.id, owner, filter, &services).await
}

pub async fn show_filtered(
    bot: Bot,
    chat_id: ChatId,
    owner: i64,
    filter: &str,
    services: &ServiceContainer,
) -> Result<()> {
    history_presenter(bot, chat_id, services)
        .show_history(owner, filter)
        .await
}

pub async fn export_history(
    bot: Bot,
    chat_id: ChatId,
    owner: i64,
    services: &ServiceContainer,
) -> Result<()> {
    history_presenter(bot, chat_id, services)
        .export_history(owner)
        .await
}

/// `/invoice <hash>`
pub async fn send_invoice(
    bot: Bot,
    msg: Message,
    owner: i64,
    hash: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("Invoice requested in chat {}", owner);
    history_presenter(bot, msg.chat.id, &services)
        .send_invoice(owner, hash.trim())
        .await
}
