//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams vote, expiry, and creation
//! events plus notifications to clients that subscribe by battle id.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
