use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use konspekt::bot;
use konspekt::config::BotConfig;
use konspekt::localization::init_localization_from;
use konspekt::session::{InMemorySessionStore, SessionStore};

/// Install the tracing subscriber; `log` records from the core modules are bridged too
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.json_logs);

    info!("Starting Konspekt Telegram Bot");

    init_localization_from(&config.locales_dir)
        .with_context(|| format!("Failed to load locales from {}", config.locales_dir))?;

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let bot = Bot::new(&config.telegram_token);
    let webhook = config.webhook.clone();
    let config = Arc::new(config);

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![store, config])
        .enable_ctrlc_handler()
        .build();

    match webhook {
        Some(webhook) => {
            info!(url = %webhook.url, address = %webhook.address, "Bot initialized, listening for webhook updates");
            let listener = webhooks::axum(bot, webhooks::Options::new(webhook.address, webhook.url))
                .await
                .context("Failed to set up webhook listener")?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            info!("Bot initialized, starting long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}
