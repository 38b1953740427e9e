//! WebSocket message types: envelope, commands, and selectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::BattleId;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message with a fresh id.
    #[must_use]
    pub fn server(msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds a reply that echoes the request id.
    #[must_use]
    pub fn reply(request_id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: request_id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// A battle id, or `"*"` for every battle. Ids may be sent as numbers or
/// numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BattleSelector {
    /// Numeric id.
    Id(BattleId),
    /// String form: `"*"` or a numeric id.
    Text(String),
}

/// Resolved form of a [`BattleSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every battle.
    All,
    /// One battle.
    Battle(BattleId),
}

impl BattleSelector {
    /// Resolves the selector; `None` for unparsable text.
    #[must_use]
    pub fn resolve(&self) -> Option<Selection> {
        match self {
            Self::Id(id) => Some(Selection::Battle(*id)),
            Self::Text(s) if s.trim() == "*" => Some(Selection::All),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .map(|id| Selection::Battle(BattleId::new(id))),
        }
    }
}

/// Commands that a client can send over WebSocket, carried in the
/// envelope payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific battles.
    Subscribe {
        /// Battles to follow. Use `["*"]` for all battles.
        #[serde(default)]
        battle_ids: Vec<BattleSelector>,
        /// Wallet whose personal notifications should be delivered.
        #[serde(default)]
        wallet: Option<String>,
    },
    /// Unsubscribe from specific battles.
    Unsubscribe {
        /// Battles to stop following.
        battle_ids: Vec<BattleSelector>,
    },
}
