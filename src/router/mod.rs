use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*};

use crate::commands::{self, callback::handle_callback, BotCommands, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;
        use teloxide::dispatching::UpdateFilterExt;

        let services_for_commands = self.services.clone();
        let services_for_callbacks = self.services.clone();

        // Commands win over any dialogue in progress
        let command_handler = teloxide::filter_command::<BotCommands, _>().endpoint(
            move |bot: Bot, msg: Message, cmd: BotCommands, dialogue: MyDialogue| {
                let services = services_for_commands.clone();
                async move { commands::handle_command(bot, msg, cmd, dialogue, services).await }
            },
        );

        let services_for_mnemonic = self.services.clone();
        let services_for_recipient = self.services.clone();
        let services_for_amount = self.services.clone();
        let services_for_confirmation = self.services.clone();
        let services_for_participants = self.services.clone();
        let services_for_split_amount = self.services.clone();

        let message_handler = Update::filter_message().branch(command_handler).branch(
            dptree::entry()
                .branch(case![State::AwaitingMnemonic].endpoint(
                    move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                        let services = services_for_mnemonic.clone();
                        async move {
                            commands::wallet::receive_mnemonic(bot, msg, dialogue, services).await
                        }
                    },
                ))
                .branch(case![State::AwaitingRecipient].endpoint(
                    move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                        let services = services_for_recipient.clone();
                        async move {
                            commands::send::receive_recipient(bot, msg, dialogue, services).await
                        }
                    },
                ))
                .branch(
                    case![State::AwaitingAmount { recipient, display }].endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_for_amount.clone();
                            async move {
                                commands::send::receive_amount(bot, msg, state, dialogue, services)
                                    .await
                            }
                        },
                    ),
                )
                .branch(
                    case![State::AwaitingConfirmation {
                        recipient,
                        display,
                        amount
                    }]
                    .endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_for_confirmation.clone();
                            async move {
                                commands::send::receive_confirmation(
                                    bot, msg, state, dialogue, services,
                                )
                                .await
                            }
                        },
                    ),
                )
                .branch(case![State::AwaitingSplitParticipants].endpoint(
                    move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                        let services = services_for_participants.clone();
                        async move {
                            commands::split::receive_participants(bot, msg, dialogue, services)
                                .await
                        }
                    },
                ))
                .branch(
                    case![State::AwaitingSplitAmount { participants }].endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_for_split_amount.clone();
                            async move {
                                commands::split::receive_split_amount(
                                    bot, msg, state, dialogue, services,
                                )
                                .await
                            }
                        },
                    ),
                ),
        );

        // Add callback query handler for our buttons
        let callback_handler = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: MyDialogue| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, dialogue, services).await }
            },
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
