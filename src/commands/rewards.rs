use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::rewards_interactor::RewardsInteractorImpl;
use crate::presenter::rewards_presenter::{RewardsPresenter, RewardsPresenterImpl};
use crate::view::rewards_view::TelegramRewardsView;

pub fn rewards_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> RewardsPresenterImpl<RewardsInteractorImpl, TelegramRewardsView> {
    let interactor = Arc::new(RewardsInteractorImpl::new(
        services.store(),
        services.transactions(),
        services.sessions(),
        services.contract(),
    ));
    let view = Arc::new(TelegramRewardsView::new(bot, chat_id));
    RewardsPresenterImpl::new(interactor, view)
}

pub struct EmiCommand;

impl CommandHandler for EmiCommand {
    fn command_name() -> &'static str {
        "emi"
    }

    fn description() -> &'static str {
        "your EMI agreements"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("EMI command received in chat {}", owner);

        rewards_presenter(bot, msg.chat.id, &services)
            .show_emi_agreements(owner)
            .await
    }
}

pub struct CouponsCommand;

impl CommandHandler for CouponsCommand {
    fn command_name() -> &'static str {
        "coupons"
    }

    fn description() -> &'static str {
        "your coupons"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        rewards_presenter(bot, msg.chat.id, &services)
            .show_offer_nfts(owner)
            .await
    }
}

pub struct TierCommand;

impl CommandHandler for TierCommand {
    fn command_name() -> &'static str {
        "tier"
    }

    fn description() -> &'static str {
        "your loyalty tier"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        rewards_presenter(bot, msg.chat.id, &services)
            .show_loyalty_status(owner)
            .await
    }
}
