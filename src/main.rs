//! # Lucky Pick Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database,
//! starts the giveaway scheduler and the health server, and runs the
//! Telegram bot until it is asked to stop.

use anyhow::Result;
use lucky_pick_bot::bot::handlers::{BotContext, BotHandler};
use lucky_pick_bot::config::Config;
use lucky_pick_bot::database::audit::SqliteActionLog;
use lucky_pick_bot::database::connection::DatabaseManager;
use lucky_pick_bot::database::store::SqliteGiveawayStore;
use lucky_pick_bot::giveaways::{ActionLog, GiveawayStore, MessagingGateway, ParticipationGate};
use lucky_pick_bot::services::health::HealthService;
use lucky_pick_bot::services::scheduler::{SchedulerService, TaskDeps};
use lucky_pick_bot::services::telegram::TelegramGateway;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lucky_pick_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Lucky Pick Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Tick: {}s",
        config.database_url,
        config.http_port,
        config.scheduler_tick.as_secs()
    );

    // Initialize database
    if let Some(db_path) = config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let bot = Bot::new(&config.telegram_bot_token);

    let store: Arc<dyn GiveawayStore> = Arc::new(SqliteGiveawayStore::new(db_arc.pool.clone()));
    let actions: Arc<dyn ActionLog> = Arc::new(SqliteActionLog::new(db_arc.pool.clone()));
    let gateway: Arc<dyn MessagingGateway> = Arc::new(TelegramGateway::new(bot.clone()));

    // Start the giveaway scheduler
    let scheduler = SchedulerService::with_default_tasks(
        TaskDeps::new(store.clone(), gateway, actions.clone()),
        config.scheduler_tick,
    );
    scheduler.start().await?;

    let handler = BotHandler::new(BotContext {
        db: db_arc.as_ref().clone(),
        store: store.clone(),
        gate: ParticipationGate::new(store, actions.clone()),
        actions,
    });

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), scheduler.status());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = scheduler.stop(config.shutdown_grace).await {
        tracing::warn!("Error stopping scheduler: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
