//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! applying subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;

use super::messages::{BattleSelector, Selection, WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{ArenaEvent, WalletAddress};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and updates its subscriptions.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
///
/// Dropping the receiver when the loop ends is the unsubscribe.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<ArenaEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(arena_event) => {
                        if subs.matches(&arena_event) {
                            let msg = WsMessage::server(
                                WsMessageType::Event,
                                serde_json::to_value(&arena_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn resolve_all(selectors: &[BattleSelector]) -> Vec<Selection> {
    selectors.iter().filter_map(BattleSelector::resolve).collect()
}

fn error_reply(id: String, code: u16, message: &str) -> Option<String> {
    let err = WsMessage::reply(
        id,
        WsMessageType::Error,
        json!({ "code": code, "message": message }),
    );
    serde_json::to_string(&err).ok()
}

fn ids_of(selections: &[Selection]) -> Vec<i64> {
    selections
        .iter()
        .filter_map(|s| match s {
            Selection::Battle(id) => Some(id.get()),
            Selection::All => None,
        })
        .collect()
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return error_reply(String::new(), 400, "malformed JSON");
    };
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return error_reply(msg.id, 404, "unknown command");
    };

    let payload = match command {
        WsCommand::Subscribe { battle_ids, wallet } => {
            if let Some(raw) = wallet {
                match WalletAddress::parse(&raw) {
                    Ok(wallet) => subs.identify(wallet),
                    Err(_) => return error_reply(msg.id, 400, "invalid wallet address"),
                }
            }
            let selections = resolve_all(&battle_ids);
            subs.subscribe(&selections);
            json!({
                "subscribed": ids_of(&selections),
                "count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            })
        }
        WsCommand::Unsubscribe { battle_ids } => {
            let selections = resolve_all(&battle_ids);
            subs.unsubscribe(&selections);
            json!({
                "unsubscribed": ids_of(&selections),
                "remaining_count": subs.count(),
            })
        }
    };

    let response = WsMessage::reply(msg.id, WsMessageType::Response, payload);
    serde_json::to_string(&response).ok()
}
