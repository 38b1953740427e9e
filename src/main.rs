//! intuit-battle server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use intuit_battle::api;
use intuit_battle::app_state::{AppState, ServiceSettings};
use intuit_battle::chain::{ChainClient, SimulatedChain};
use intuit_battle::config::{ArenaConfig, LogFormat};
use intuit_battle::domain::EventBus;
use intuit_battle::domain::countdown::spawn_expiry_watch;
use intuit_battle::service::BattleReader;
use intuit_battle::store::{ArenaStore, MemoryStore, PostgresStore};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn build_store(config: &ArenaConfig) -> Result<Arc<dyn ArenaStore>, Box<dyn std::error::Error>> {
    if config.persistence_enabled {
        let store = PostgresStore::connect(config).await?;
        tracing::info!("connected to PostgreSQL");
        return Ok(Arc::new(store));
    }

    let store = MemoryStore::new();
    for wallet in &config.admin_wallets {
        store.add_admin(wallet.clone()).await;
    }
    tracing::warn!(
        admins = config.admin_wallets.len(),
        "persistence disabled, using in-memory store"
    );
    Ok(Arc::new(store))
}

/// Re-arms expiry watchers for battles still open at startup.
async fn watch_open_battles(store: Arc<dyn ArenaStore>, event_bus: &EventBus) {
    let now = Utc::now();
    let mut armed = 0_usize;
    for battle in BattleReader::new(store).list().await {
        if let Some(end_time) = battle.end_time
            && battle.time_left(now).is_some_and(|left| !left.expired)
        {
            let _watch = spawn_expiry_watch(event_bus.clone(), battle.id, end_time);
            armed += 1;
        }
    }
    tracing::info!(armed, "expiry watchers started");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ArenaConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, chain = %config.chain_name, "starting intuit-battle");

    // Build store, chain, and event bus
    let store = build_store(&config).await?;
    let chain: Arc<dyn ChainClient> = Arc::new(SimulatedChain::new(config.chain_id));
    let event_bus = EventBus::new(config.event_bus_capacity);

    watch_open_battles(Arc::clone(&store), &event_bus).await;

    // Build application state
    let app_state = AppState::new(
        store,
        chain,
        event_bus,
        ServiceSettings {
            min_stake: config.min_stake,
            stake_token_symbol: config.stake_token_symbol.clone(),
            max_members_per_wallet: config.max_members_per_wallet,
        },
    );

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
