use anyhow::Result;
use cure_freedom_bot::bot;
use std::env;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::prelude::*;

/// Validate environment variables at startup
fn validate_environment_variables() -> Result<()> {
    // Validate TELEGRAM_BOT_TOKEN
    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required but not set. Please set it to your Telegram bot token."))?;

    if bot_token.trim().is_empty() {
        return Err(anyhow::anyhow!("TELEGRAM_BOT_TOKEN cannot be empty"));
    }

    // Basic bot token format validation (Telegram bot tokens have a specific format: numbers:letters)
    if !bot_token.contains(':') {
        return Err(anyhow::anyhow!("TELEGRAM_BOT_TOKEN format is invalid. Telegram bot tokens should contain a colon (:) character."));
    }

    let parts: Vec<&str> = bot_token.split(':').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!(
            "TELEGRAM_BOT_TOKEN format is invalid. Expected format: 'bot_id:bot_token'"
        ));
    }

    // Validate bot ID is numeric
    if parts[0].parse::<u64>().is_err() {
        return Err(anyhow::anyhow!("TELEGRAM_BOT_TOKEN bot ID must be numeric"));
    }

    // Validate bot token length (should be reasonably long)
    if parts[1].len() < 20 {
        return Err(anyhow::anyhow!(
            "TELEGRAM_BOT_TOKEN appears to be too short. Please verify it's a valid bot token."
        ));
    }

    info!("Environment variables validated successfully");
    Ok(())
}

/// Validate HTTP client configuration and return the timeout to use
fn validate_http_client_config() -> Result<u64> {
    // Validate HTTP timeout from environment (default 30 seconds)
    let timeout_secs = env::var("HTTP_CLIENT_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("HTTP_CLIENT_TIMEOUT_SECS must be a valid number of seconds"))?;

    if timeout_secs == 0 {
        return Err(anyhow::anyhow!("HTTP_CLIENT_TIMEOUT_SECS cannot be 0"));
    }

    if timeout_secs > 300 {
        return Err(anyhow::anyhow!(
            "HTTP_CLIENT_TIMEOUT_SECS cannot be greater than 300 seconds (5 minutes)"
        ));
    }

    info!(timeout_secs, "HTTP client configuration validated successfully");
    Ok(timeout_secs)
}

/// Initialize structured logging (pretty for development, JSON otherwise)
fn init_tracing() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("cure_freedom_bot={}", log_level).parse()?)
        .add_directive("teloxide=warn".parse()?);

    if env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()) == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    init_tracing()?;

    // Validate environment variables early
    validate_environment_variables()?;
    let timeout_secs = validate_http_client_config()?;

    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");

    // One shared client backs the Telegram transport and both external data
    // fetches; its timeout is the only timeout applied to them.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client");

    let bot = Bot::with_client(bot_token, client.clone());

    info!(timeout_secs, "Bot initialized, starting dispatcher");

    // Only new messages are dispatched; edited messages never reach the
    // handler.
    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let client = client.clone();
        move |bot: Bot, msg: Message| {
            let client = client.clone();
            async move { bot::message_handler(bot, msg, client).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
