//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::chain::ChainClient;
use crate::domain::EventBus;
use crate::service::{ArenaService, BattleReader, MemberDirectory, StatsReader, VoteFlow};
use crate::store::ArenaStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Member directory reader.
    pub members: MemberDirectory,
    /// Battle reader.
    pub battles: BattleReader,
    /// Member statistics reader.
    pub stats: StatsReader,
    /// Vote/stake flow driver.
    pub vote_flow: Arc<VoteFlow>,
    /// Battle and member creation.
    pub arena_service: Arc<ArenaService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

/// Settings the services need from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Smallest accepted stake.
    pub min_stake: Decimal,
    /// Staking token symbol used in notifications.
    pub stake_token_symbol: String,
    /// Members a non-admin wallet may create.
    pub max_members_per_wallet: i64,
}

impl AppState {
    /// Wires every service over one store, one chain client, and one bus.
    #[must_use]
    pub fn new(
        store: Arc<dyn ArenaStore>,
        chain: Arc<dyn ChainClient>,
        event_bus: EventBus,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            members: MemberDirectory::new(Arc::clone(&store)),
            battles: BattleReader::new(Arc::clone(&store)),
            stats: StatsReader::new(Arc::clone(&store)),
            vote_flow: Arc::new(VoteFlow::new(
                Arc::clone(&store),
                Arc::clone(&chain),
                event_bus.clone(),
                settings.min_stake,
                settings.stake_token_symbol,
            )),
            arena_service: Arc::new(ArenaService::new(
                store,
                chain,
                event_bus.clone(),
                settings.max_members_per_wallet,
            )),
            event_bus,
        }
    }
}
