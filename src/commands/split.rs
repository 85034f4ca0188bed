use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::split_interactor::SplitInteractorImpl;
use crate::presenter::split_presenter::{SplitPresenter, SplitPresenterImpl};
use crate::view::split_view::TelegramSplitView;

pub struct SplitCommand;

fn split_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> SplitPresenterImpl<SplitInteractorImpl, TelegramSplitView> {
    let interactor = Arc::new(SplitInteractorImpl::new(services.resolver()));
    let view = Arc::new(TelegramSplitView::new(bot, chat_id));
    SplitPresenterImpl::new(interactor, view)
}

impl CommandHandler for SplitCommand {
    fn command_name() -> &'static str {
        "split"
    }

    fn description() -> &'static str {
        "split a bill between several people"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow::anyhow!("Dialogue context not provided"))?;
        info!("Split command initiated in chat {}", owner);

        start_split(bot, msg.chat.id, dialogue, &services).await
    }
}

pub async fn start_split(
    bot: Bot,
    chat_id: ChatId,
    dialogue: MyDialogue,
    services: &ServiceContainer,
) -> Result<()> {
    dialogue.update(State::AwaitingSplitParticipants).await?;
    split_presenter(bot, chat_id, services).start_split_flow().await
}

pub async fn receive_participants(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the participants as text:")
            .await?;
        return Ok(());
    };

    let presenter = split_presenter(bot, msg.chat.id, &services);
    if let Some(participants) = presenter.handle_participants(text).await? {
        dialogue
            .update(State::AwaitingSplitAmount { participants })
            .await?;
    }

    Ok(())
}

pub async fn receive_split_amount(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingSplitAmount { participants } = state else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the total as text:")
            .await?;
        return Ok(());
    };

    let presenter = split_presenter(bot, msg.chat.id, &services);
    if presenter.handle_total(&participants, text).await? {
        dialogue.exit().await?;
    }

    Ok(())
}
