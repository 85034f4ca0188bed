use super::{register_commands, ui, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;

pub struct HelpCommand;

/// One `/command - description` line per registered command
pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for (name, description) in register_commands() {
        text.push_str(&format!("/{} - {}\n", name, description));
    }
    text.push_str(
        "\nRecipients can be an Aptos address (0x...), a registered wallet ID \
        or a UPI ID (name@bank).",
    );
    text
}

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _owner: i64,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        bot.send_message(msg.chat.id, help_text())
            .reply_markup(ui::main_menu_keyboard())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_registered_command() {
        let text = help_text();
        for (name, _) in register_commands() {
            assert!(text.contains(&format!("/{} - ", name)), "missing /{}", name);
        }
    }
}
