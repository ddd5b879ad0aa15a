//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::trace;

use super::command_handlers::{handle_cure_command, handle_supported_units_command};

/// Route an incoming message to the matching command handler.
///
/// Commands arrive as `/command args...`; in group chats the command token
/// may carry an `@botname` suffix. The remaining tokens are joined with
/// single spaces and passed on as the conversion argument. Non-command text
/// and unknown commands are ignored.
pub async fn message_handler(bot: Bot, msg: Message, client: reqwest::Client) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(());
    };
    let Some(command) = first.strip_prefix('/') else {
        return Ok(());
    };
    let command = command.split('@').next().unwrap_or(command);
    let args = tokens.collect::<Vec<_>>().join(" ");

    match command {
        "cf" | "cl" | "cure_freedom" | "cure_liberty" => {
            handle_cure_command(&bot, &msg, &args, &client).await
        }
        "supported_units" => handle_supported_units_command(&bot, &msg).await,
        _ => {
            trace!(command, "Ignoring unknown command");
            Ok(())
        }
    }
}
