//! WebSocket stream tests against a live server.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_test::assert_ok;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::{BATTLE_ID, VOTER, spawn};

type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(frame)) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no frame within timeout");
        };
        let msg = assert_ok!(frame);
        if let Message::Text(text) = msg {
            return assert_ok!(serde_json::from_str::<Value>(text.as_str()));
        }
    }
}

/// Reads frames until an event with `event_type` arrives.
async fn wait_for_event(socket: &mut Socket, event_type: &str) -> Value {
    loop {
        let msg = next_json(socket).await;
        if msg["type"] == "event" && msg["payload"]["event_type"] == event_type {
            return msg["payload"].clone();
        }
    }
}

async fn subscribe(socket: &mut Socket, payload: Value) -> Value {
    let envelope = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": chrono::Utc::now(),
        "payload": payload,
    });
    assert_ok!(socket.send(Message::text(envelope.to_string())).await);
    next_json(socket).await
}

#[tokio::test]
async fn vote_events_reach_battle_subscribers() {
    let server = spawn().await;
    let (mut socket, _) = assert_ok!(connect_async(format!("ws://{}/ws", server.addr)).await);

    let reply = subscribe(
        &mut socket,
        json!({ "command": "subscribe", "battle_ids": [BATTLE_ID], "wallet": VOTER }),
    )
    .await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["id"], "sub-1");
    assert_eq!(reply["payload"]["count"], 1);

    let resp = assert_ok!(
        server
            .client
            .post(server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes")))
            .json(&json!({ "wallet": VOTER, "member_id": 2, "stake": "25" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let event = wait_for_event(&mut socket, "vote_recorded").await;
    assert_eq!(event["battle_id"], BATTLE_ID);
    assert_eq!(
        event["counters"],
        json!({ "votes_a": 3, "votes_b": 6, "total_votes": 9 })
    );

    let toast = wait_for_event(&mut socket, "notification").await;
    assert_eq!(toast["title"], "Vote Recorded!");
    assert_eq!(toast["variant"], "success");
}

#[tokio::test]
async fn other_wallets_do_not_see_personal_toasts() {
    let server = spawn().await;
    let (mut socket, _) = assert_ok!(connect_async(format!("ws://{}/ws", server.addr)).await);
    let _ = subscribe(&mut socket, json!({ "command": "subscribe", "battle_ids": ["*"] })).await;

    let resp = assert_ok!(
        server
            .client
            .post(server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes")))
            .json(&json!({ "wallet": VOTER, "member_id": 1, "stake": "1" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let event = wait_for_event(&mut socket, "vote_recorded").await;
    assert_eq!(event["side"], "a");

    // No personal notification arrives; the stream stays quiet.
    let quiet = tokio::time::timeout(Duration::from_millis(300), socket.next()).await;
    assert!(quiet.is_err());
}

#[tokio::test]
async fn malformed_command_gets_error_reply() {
    let server = spawn().await;
    let (mut socket, _) = assert_ok!(connect_async(format!("ws://{}/ws", server.addr)).await);
    assert_ok!(socket.send(Message::text("not json")).await);
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);
}
