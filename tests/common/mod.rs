//! Shared harness: serves the app over an in-memory store on an
//! ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use intuit_battle::api::build_app;
use intuit_battle::app_state::{AppState, ServiceSettings};
use intuit_battle::chain::{ChainClient, SimulatedChain};
use intuit_battle::domain::{EventBus, WalletAddress};
use intuit_battle::store::{ArenaStore, BattleRow, MemberRow, MemoryStore};

/// Admin wallet seeded into every test server.
pub const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
/// A regular voter.
pub const VOTER: &str = "0x00000000000000000000000000000000000000aa";
/// Battle seeded with counters 3/5.
pub const BATTLE_ID: i64 = 1;

/// A running test server.
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// Backing store.
    pub store: Arc<MemoryStore>,
    /// Chain client.
    pub chain: Arc<SimulatedChain>,
    /// HTTP client.
    pub client: reqwest::Client,
}

impl TestServer {
    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

fn member_row(id: i64, name: &str, category: &str, votes: i64) -> MemberRow {
    MemberRow {
        id,
        atomid: Some(format!("0xatom-{name}")),
        name: Some(name.to_string()),
        description: Some(format!("{name} builds things")),
        image: Some(format!("https://img/{name}.png")),
        category: Some(category.to_string()),
        avatar_url: None,
        total_votes: Some(votes),
        is_active: Some(true),
        created_at: Some(Utc::now()),
    }
}

/// Starts a server seeded with two members, one open battle, and one
/// admin.
pub async fn spawn() -> TestServer {
    let store = Arc::new(MemoryStore::new());
    store.add_member_row(member_row(1, "alice", "Core", 10)).await;
    store.add_member_row(member_row(2, "bob", "Members", 25)).await;
    store
        .add_battle_row(BattleRow {
            id: BATTLE_ID,
            title: Some("Alice vs Bob".to_string()),
            description: Some("Opening round".to_string()),
            member1_id: 1,
            member2_id: 2,
            member1_votes: Some(3),
            member2_votes: Some(5),
            total_votes: Some(8),
            is_active: Some(true),
            start_date: Some(Utc::now() - Duration::hours(1)),
            end_date: Some(Utc::now() + Duration::days(1)),
            winner_id: None,
            created_at: Utc::now() - Duration::hours(1),
        })
        .await;
    let Ok(admin) = WalletAddress::parse(ADMIN) else {
        panic!("admin wallet must parse");
    };
    store.add_admin(admin).await;

    let chain = Arc::new(SimulatedChain::new(13579));
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn ArenaStore>,
        Arc::clone(&chain) as Arc<dyn ChainClient>,
        EventBus::new(256),
        ServiceSettings {
            min_stake: Decimal::ONE,
            stake_token_symbol: "tTRUST".to_string(),
            max_members_per_wallet: 1,
        },
    );

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_app(state)).await;
    });

    TestServer {
        addr,
        store,
        chain,
        client: reqwest::Client::new(),
    }
}
