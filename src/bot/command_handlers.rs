//! Command Handlers module for processing bot commands

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, ParseMode};
use tracing::debug;

use crate::conversion;
use crate::errors::ConvertError;
use crate::units::{self, RenderMode};

/// Handle /cf, /cl, /cure_freedom and /cure_liberty.
///
/// Matching and number failures become reply strings; an exchange-rate
/// failure is returned instead so it surfaces at the dispatcher boundary
/// rather than degrading into a partial reply.
pub async fn handle_cure_command(
    bot: &Bot,
    msg: &Message,
    args: &str,
    client: &reqwest::Client,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, args = %args, "Handling cure command");

    let outcome = match units::find_matching_unit(args) {
        Some(matched) => conversion::convert(&matched, client)
            .await
            .map(|text| (text, matched.unit.render_mode)),
        None => Err(ConvertError::NoMatch),
    };

    match outcome {
        Ok((text, render_mode)) => send_reply(bot, msg, text, render_mode).await,
        Err(error) if error.is_user_visible() => {
            send_reply(bot, msg, error.to_string(), RenderMode::Plain).await
        }
        Err(error) => Err(error.into()),
    }
}

/// Handle the /supported_units command
pub async fn handle_supported_units_command(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(chat_id = %msg.chat.id, "Handling supported units command");

    let listing = units::catalog()
        .units()
        .iter()
        .map(|unit| unit.name)
        .collect::<Vec<_>>()
        .join("\n");
    bot.send_message(msg.chat.id, listing).await?;

    Ok(())
}

async fn send_reply(bot: &Bot, msg: &Message, text: String, render_mode: RenderMode) -> Result<()> {
    let request = bot
        .send_message(msg.chat.id, text)
        .link_preview_options(disabled_link_preview());

    match render_mode {
        RenderMode::MarkdownV2 => request.parse_mode(ParseMode::MarkdownV2).await?,
        RenderMode::Plain => request.await?,
    };

    Ok(())
}

// Link previews are suppressed on every reply so the beer hyperlink does not
// unfurl into the chat.
fn disabled_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
