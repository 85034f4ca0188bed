//! Cryptal Super Wallet for Telegram - Main executable
//!
//! Entry point for the bot that lets a chat create or import an Aptos wallet,
//! send APT to addresses, wallet IDs and UPI IDs, split bills, browse and
//! export its history and follow EMI agreements, coupons and loyalty tiers.
use anyhow::Context;
use cryptal_wallet_bot::{
    create_aptos_client, AppConfig, KeyValueStore, MemoryStore, PgKeyValueStore, Router,
};
use dotenv::dotenv;
use log::{error, info, warn};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use teloxide::utils::command::BotCommands as _;
use teloxide::{dptree, prelude::*, Bot};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!(
        "Starting Cryptal Super Wallet bot v{}",
        cryptal_wallet_bot::VERSION
    );

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .context("TELEGRAM_BOT_TOKEN must be set in environment variables")?;
    let bot = Bot::new(bot_token);

    // Postgres when configured, otherwise everything lives in memory
    let store: Arc<dyn KeyValueStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to create database connection pool")?;

            info!("Running database migrations...");
            if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
                error!("Failed to run migrations: {}", e);
                return Err(anyhow::Error::from(e));
            }
            info!("Migrations completed successfully");

            Arc::new(PgKeyValueStore::new(Arc::new(db_pool)))
        }
        None => {
            warn!("DATABASE_URL is not set; wallets will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    info!(
        "Connecting to Aptos {} at {}...",
        config.aptos_network, config.aptos_node_url
    );
    let aptos_client = create_aptos_client(&config).context("Failed to create Aptos client")?;

    info!("Initializing bot application...");
    let (router, bot, service_container, storage, mut monitor) =
        cryptal_wallet_bot::create_application(bot, store, aptos_client, config);

    if let Err(e) = bot
        .set_my_commands(cryptal_wallet_bot::BotCommands::bot_commands())
        .await
    {
        warn!("Failed to register the command list: {}", e);
    }

    info!("Starting pending transaction monitor...");
    if let Err(e) = monitor.start().await {
        error!("Failed to start pending transaction monitor: {}", e);
    }

    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container.clone(), storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Shutting down...");
    monitor.stop().await;
    service_container.sessions().teardown().await;

    Ok(())
}
