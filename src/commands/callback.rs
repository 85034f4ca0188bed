use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::commands::{
    company, help, history, rewards, send, split, wallet, CommandHandler, MyDialogue,
};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::balance_interactor::BalanceInteractorImpl;
use crate::presenter::balance_presenter::{BalancePresenter, BalancePresenterImpl};
use crate::presenter::company_presenter::CompanyPresenter;
use crate::presenter::rewards_presenter::RewardsPresenter;
use crate::presenter::wallet_presenter::WalletPresenter;
use crate::view::balance_view::TelegramBalanceView;

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(callback_data) = q.data.clone() else {
        return Ok(());
    };

    // Acknowledge the callback query to stop loading animation
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        info!("Failed to answer callback query: {}", err);
    }

    // Buttons on messages too old to be accessible carry nothing to act on
    let Some(message) = q.regular_message().cloned() else {
        return Ok(());
    };
    let chat_id = message.chat.id;
    let owner = chat_id.0;

    info!("Received callback: {} in chat {}", callback_data, owner);

    if callback_data == "confirm_yes" || callback_data == "confirm_no" {
        return handle_confirmation(&bot, &message, &callback_data, dialogue, services).await;
    }

    // Any other button leaves a half-finished flow behind
    dialogue.update(State::Start).await?;
    let dialogue = Some(dialogue);

    match callback_data.as_str() {
        "menu" | "refresh" => handle_refresh(&bot, message, owner, &services).await?,
        "create_wallet" => {
            wallet::CreateWalletCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "import_wallet" => {
            wallet::ImportWalletCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "address" => {
            wallet::AddressCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "accounts" => {
            wallet::AccountsCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "add_account" => {
            wallet::AddAccountCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "connect" => {
            wallet::ConnectCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "disconnect" => {
            wallet::DisconnectCommand::execute(bot, message, owner, dialogue, services).await?
        }
        "send" => send::SendCommand::execute(bot, message, owner, dialogue, services).await?,
        "split" => split::SplitCommand::execute(bot, message, owner, dialogue, services).await?,
        "history" => history::show_filtered(bot, chat_id, owner, "", &services).await?,
        "export" => history::export_history(bot, chat_id, owner, &services).await?,
        "emi" => {
            rewards::rewards_presenter(bot, chat_id, &services)
                .show_emi_agreements(owner)
                .await?
        }
        "coupons" => {
            rewards::rewards_presenter(bot, chat_id, &services)
                .show_offer_nfts(owner)
                .await?
        }
        "tier" => {
            rewards::rewards_presenter(bot, chat_id, &services)
                .show_loyalty_status(owner)
                .await?
        }
        "company" => {
            company::company_presenter(bot, chat_id, &services)
                .show_dashboard(owner)
                .await?
        }
        "help" => help::HelpCommand::execute(bot, message, owner, dialogue, services).await?,
        data => {
            if let Some(filter) = data.strip_prefix("history_") {
                history::show_filtered(bot, chat_id, owner, filter, &services).await?;
            } else if let Some(index) = data.strip_prefix("switch_") {
                match index.parse::<usize>() {
                    Ok(index) => {
                        wallet::wallet_presenter(bot, chat_id, &services)
                            .switch_account(owner, index)
                            .await?
                    }
                    Err(_) => {
                        bot.send_message(chat_id, "Invalid account").await?;
                    }
                }
            } else {
                warn!("Unknown callback data: {}", data);
                bot.send_message(chat_id, "This button is no longer available.")
                    .await?;
            }
        }
    }

    Ok(())
}

// Re-renders the balance in the message that carried the button
async fn handle_refresh(
    bot: &Bot,
    message: Message,
    owner: i64,
    services: &ServiceContainer,
) -> Result<()> {
    let interactor = Arc::new(BalanceInteractorImpl::new(services.sessions()));
    let view = Arc::new(TelegramBalanceView::new(bot.clone(), message.chat.id));
    let presenter = BalancePresenterImpl::new(interactor, view);

    presenter.refresh_balance(owner, Some(message)).await
}

async fn handle_confirmation(
    bot: &Bot,
    message: &Message,
    callback_data: &str,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    // The keyboard is single use
    if let Err(e) = bot
        .edit_message_reply_markup(message.chat.id, message.id)
        .await
    {
        warn!("Failed to remove the confirmation keyboard: {}", e);
    }

    let state = dialogue.get().await?.unwrap_or_default();
    let answer = if callback_data == "confirm_yes" { "yes" } else { "no" };

    send::confirm_send(
        bot.clone(),
        message.chat.id,
        message.chat.id.0,
        answer,
        state,
        dialogue,
        &services,
    )
    .await
}
