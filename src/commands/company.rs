use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::company_interactor::CompanyInteractorImpl;
use crate::presenter::company_presenter::{CompanyPresenter, CompanyPresenterImpl};
use crate::view::company_view::TelegramCompanyView;

pub fn company_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> CompanyPresenterImpl<CompanyInteractorImpl, TelegramCompanyView> {
    let interactor = Arc::new(CompanyInteractorImpl::new(
        services.store(),
        services.sessions(),
        services.resolver(),
        services.contract(),
    ));
    let view = Arc::new(TelegramCompanyView::new(bot, chat_id));
    CompanyPresenterImpl::new(interactor, view)
}

pub struct CompanyCommand;

impl CommandHandler for CompanyCommand {
    fn command_name() -> &'static str {
        "company"
    }

    fn description() -> &'static str {
        "company dashboard"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Company dashboard requested in chat {}", owner);

        company_presenter(bot, msg.chat.id, &services)
            .show_dashboard(owner)
            .await
    }
}

pub async fn new_coupon(
    bot: Bot,
    msg: Message,
    owner: i64,
    args: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("Coupon creation requested in chat {}", owner);
    company_presenter(bot, msg.chat.id, &services)
        .create_coupon(owner, args)
        .await
}

pub async fn mint_coupon(
    bot: Bot,
    msg: Message,
    owner: i64,
    args: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("Coupon mint requested in chat {}", owner);
    company_presenter(bot, msg.chat.id, &services)
        .mint_coupon(owner, args)
        .await
}

pub async fn deactivate_coupon(
    bot: Bot,
    msg: Message,
    owner: i64,
    args: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    company_presenter(bot, msg.chat.id, &services)
        .deactivate_coupon(owner, args)
        .await
}

pub async fn new_emi(
    bot: Bot,
    msg: Message,
    owner: i64,
    args: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    info!("EMI agreement creation requested in chat {}", owner);
    company_presenter(bot, msg.chat.id, &services)
        .create_emi(owner, args)
        .await
}

pub async fn collect_emi(
    bot: Bot,
    msg: Message,
    owner: i64,
    args: &str,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    company_presenter(bot, msg.chat.id, &services)
        .collect_emi(owner, args)
        .await
}
