//! # intuit-battle
//!
//! REST API and WebSocket service for community member battles, where
//! every vote is backed by a stake on the chosen member's on-chain atom.
//!
//! A vote runs through a small state machine ([`service::VoteFlow`]):
//! eligibility check, stake input, stake, vote insert, and counter
//! reconciliation. The store's (battle, wallet) uniqueness constraint is
//! the final guard against double voting; a lost race is reported as
//! "already voted", never as an error.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── VoteFlow, ArenaService, Readers, AdminGate (service/)
//!     ├── EventBus, Countdown (domain/)
//!     │
//!     ├── ChainClient (chain/)
//!     └── ArenaStore: PostgreSQL or in-memory (store/)
//! ```

pub mod api;
pub mod app_state;
pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
pub mod ws;
