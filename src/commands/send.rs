use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{owner_of, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::send_interactor::SendInteractorImpl;
use crate::presenter::send_presenter::{ResolvedRecipient, SendPresenter, SendPresenterImpl};
use crate::view::send_view::TelegramSendView;

pub struct SendCommand;

fn send_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> SendPresenterImpl<SendInteractorImpl, TelegramSendView> {
    let interactor = Arc::new(SendInteractorImpl::new(
        services.transactions(),
        services.sessions(),
        services.resolver(),
        services.aptos_client(),
        services.config().clone(),
    ));
    let view = Arc::new(TelegramSendView::new(bot, chat_id));
    SendPresenterImpl::new(interactor, view)
}

impl CommandHandler for SendCommand {
    fn command_name() -> &'static str {
        "send"
    }

    fn description() -> &'static str {
        "send APT to an address, wallet ID or UPI ID"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        owner: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow::anyhow!("Dialogue context not provided"))?;
        info!("Send command initiated in chat {}", owner);

        start_send(bot, msg.chat.id, dialogue, &services).await
    }
}

/// Shared by `/send` and the menu button
pub async fn start_send(
    bot: Bot,
    chat_id: ChatId,
    dialogue: MyDialogue,
    services: &ServiceContainer,
) -> Result<()> {
    dialogue.update(State::AwaitingRecipient).await?;
    send_presenter(bot, chat_id, services).start_send_flow().await
}

pub async fn receive_recipient(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(input) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the recipient as text:")
            .await?;
        return Ok(());
    };

    let presenter = send_presenter(bot, msg.chat.id, &services);
    if let Some(recipient) = presenter.handle_recipient(input).await? {
        dialogue
            .update(State::AwaitingAmount {
                recipient: recipient.address,
                display: recipient.display,
            })
            .await?;
    }

    Ok(())
}

pub async fn receive_amount(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingAmount { recipient, display } = state else {
        return Ok(());
    };
    let Some(amount_text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the amount as text:")
            .await?;
        return Ok(());
    };

    let recipient = ResolvedRecipient {
        address: recipient,
        display,
    };
    let presenter = send_presenter(bot, msg.chat.id, &services);
    if let Some(amount) = presenter.handle_amount(amount_text, &recipient).await? {
        dialogue
            .update(State::AwaitingConfirmation {
                recipient: recipient.address,
                display: recipient.display,
                amount,
            })
            .await?;
    }

    Ok(())
}

pub async fn receive_confirmation(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let answer = msg.text().unwrap_or_default();
    confirm_send(bot, msg.chat.id, owner_of(&msg), answer, state, dialogue, &services).await
}

/// Finishes a pending send with the user's answer, typed or from the
/// confirmation keyboard. Anything but an explicit yes cancels.
pub async fn confirm_send(
    bot: Bot,
    chat_id: ChatId,
    owner: i64,
    answer: &str,
    state: State,
    dialogue: MyDialogue,
    services: &ServiceContainer,
) -> Result<()> {
    let State::AwaitingConfirmation {
        recipient,
        display,
        amount,
    } = state
    else {
        bot.send_message(chat_id, "There is no transfer waiting for confirmation.")
            .await?;
        return Ok(());
    };

    // Reset first so a double tap cannot submit twice
    dialogue.exit().await?;

    let recipient = ResolvedRecipient {
        address: recipient,
        display,
    };
    send_presenter(bot, chat_id, services)
        .handle_confirmation(answer, &recipient, amount, owner)
        .await
}
