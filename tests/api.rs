//! REST API tests against a live server.

#![allow(clippy::panic)]

mod common;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_test::assert_ok;

use common::{ADMIN, BATTLE_ID, VOTER, spawn};
use intuit_battle::domain::member::PLACEHOLDER_AVATAR;
use intuit_battle::domain::{BattleId, MemberId};
use intuit_battle::store::memory::StoreOp;

async fn body(resp: reqwest::Response) -> Value {
    assert_ok!(resp.json::<Value>().await)
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = spawn().await;
    let resp = assert_ok!(server.client.get(server.url("/health")).send().await);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["status"], "healthy");
}

#[tokio::test]
async fn members_sorted_and_filtered() {
    let server = spawn().await;
    let resp = assert_ok!(server.client.get(server.url("/api/v1/members")).send().await);
    let all = body(resp).await;
    assert_eq!(all["total"], 2);
    assert_eq!(all["data"][0]["name"], "bob");
    assert_eq!(all["data"][1]["avatar_url"], "https://img/alice.png");

    let resp = assert_ok!(
        server
            .client
            .get(server.url("/api/v1/members?category=Core"))
            .send()
            .await
    );
    let core = body(resp).await;
    assert_eq!(core["total"], 1);
    assert_eq!(core["data"][0]["category"], "Core");
}

#[tokio::test]
async fn battle_view_has_display_fields() {
    let server = spawn().await;
    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/battles/{BATTLE_ID}")))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let battle = body(resp).await;
    assert_eq!(battle["member_a"]["name"], "alice");
    assert_eq!(battle["counters"]["total_votes"], 8);
    assert_eq!(battle["status_line"], "Active");
    assert_eq!(battle["percent_a"], 37.5);

    let resp = assert_ok!(server.client.get(server.url("/api/v1/battles/999")).send().await);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vote_then_second_vote_is_rejected() {
    let server = spawn().await;
    let url = server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes"));

    let resp = assert_ok!(
        server
            .client
            .post(&url)
            .json(&json!({ "wallet": VOTER, "member_id": 1, "stake": "100" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let vote = body(resp).await;
    assert_eq!(vote["status"], "recorded");
    assert_eq!(
        vote["counters"],
        json!({ "votes_a": 4, "votes_b": 5, "total_votes": 9 })
    );
    assert!(vote["tx_hash"].as_str().is_some_and(|h| h.starts_with("0x")));

    let resp = assert_ok!(
        server
            .client
            .post(&url)
            .json(&json!({ "wallet": VOTER.to_uppercase().replace("0X", "0x"), "member_id": 2, "stake": "5" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err = body(resp).await;
    assert_eq!(err["error"]["code"], 2102);
    assert_eq!(err["error"]["kind"], "eligibility");

    assert_eq!(server.chain.deposits().await.len(), 1);
    let Some(row) = server.store.battle_row(BattleId::new(BATTLE_ID)).await else {
        panic!("battle row missing");
    };
    assert_eq!(row.member2_votes, Some(5));

    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!(
                "/api/v1/battles/{BATTLE_ID}/eligibility?wallet={VOTER}"
            )))
            .send()
            .await
    );
    let eligibility = body(resp).await;
    assert_eq!(eligibility["status"], "already_voted");
    assert_eq!(eligibility["caption"], "Already Voted");
    assert_eq!(eligibility["voted_for"], 1);
}

#[tokio::test]
async fn vote_without_wallet_makes_no_calls() {
    let server = spawn().await;
    let resp = assert_ok!(
        server
            .client
            .post(server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes")))
            .json(&json!({ "member_id": 1, "stake": "100" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.store.calls(StoreOp::FindVote).await, 0);
    assert_eq!(server.store.calls(StoreOp::InsertVote).await, 0);
    assert!(server.chain.deposits().await.is_empty());
}

#[tokio::test]
async fn invalid_stake_is_user_input_error() {
    let server = spawn().await;
    let resp = assert_ok!(
        server
            .client
            .post(server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes")))
            .json(&json!({ "wallet": VOTER, "member_id": 1, "stake": "-5" }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"]["kind"], "user_input");
    assert!(server.chain.deposits().await.is_empty());
    assert_eq!(server.store.vote_count().await, 0);
}

#[tokio::test]
async fn rejected_stake_is_retryable() {
    let server = spawn().await;
    server.chain.set_rejecting(true);
    let url = server.url(&format!("/api/v1/battles/{BATTLE_ID}/votes"));
    let request = json!({ "wallet": VOTER, "member_id": 2, "stake": "10" });

    let resp = assert_ok!(server.client.post(&url).json(&request).send().await);
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body(resp).await["error"]["kind"], "external");
    assert_eq!(server.store.vote_count().await, 0);

    server.chain.set_rejecting(false);
    let resp = assert_ok!(server.client.post(&url).json(&request).send().await);
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body(resp).await["counters"]["votes_b"], 6);
}

#[tokio::test]
async fn only_admins_create_battles() {
    let server = spawn().await;
    let url = server.url("/api/v1/battles");
    let end_time = Utc::now() + Duration::days(3);

    let resp = assert_ok!(
        server
            .client
            .post(&url)
            .json(&json!({
                "wallet": VOTER,
                "title": "Rematch",
                "member_a": 2,
                "member_b": 1,
                "end_time": end_time,
            }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = assert_ok!(
        server
            .client
            .post(&url)
            .json(&json!({
                "wallet": ADMIN,
                "title": " Rematch ",
                "member_a": 2,
                "member_b": 1,
                "end_time": end_time,
            }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body(resp).await;
    assert_eq!(created["title"], "Rematch");
    assert_eq!(created["counters"]["total_votes"], 0);

    let resp = assert_ok!(server.client.get(server.url("/api/v1/battles")).send().await);
    let list = body(resp).await;
    assert_eq!(list["total"], 2);
    assert_eq!(list["data"][0]["title"], "Rematch");
}

#[tokio::test]
async fn member_creation_is_quota_limited() {
    let server = spawn().await;
    let url = server.url("/api/v1/members");
    let request = |name: &str| {
        json!({
            "wallet": VOTER,
            "name": name,
            "image": "https://img/carol.png",
        })
    };

    let resp = assert_ok!(server.client.post(&url).json(&request("Carol")).send().await);
    assert_eq!(resp.status(), StatusCode::CREATED);
    let member = body(resp).await;
    assert_eq!(member["category"], "Members");
    assert!(member["atom_id"].as_str().is_some_and(|a| !a.is_empty()));

    let resp = assert_ok!(server.client.post(&url).json(&request("Dave")).send().await);
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/admin/{VOTER}")))
            .send()
            .await
    );
    let status = body(resp).await;
    assert_eq!(status["is_admin"], false);
    assert_eq!(status["member_quota"]["members_created"], 1);
    assert_eq!(status["member_quota"]["can_create"], false);
}

#[tokio::test]
async fn admin_lookup_and_stats_degrade_safely() {
    let server = spawn().await;
    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/admin/{ADMIN}")))
            .send()
            .await
    );
    assert_eq!(body(resp).await["is_admin"], true);

    server.store.fail(StoreOp::IsAdmin).await;
    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/admin/{ADMIN}")))
            .send()
            .await
    );
    assert_eq!(body(resp).await["is_admin"], false);

    server.store.fail(StoreOp::Stats).await;
    let resp = assert_ok!(
        server
            .client
            .get(server.url("/api/v1/members/1/stats"))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = body(resp).await;
    assert_eq!(stats["stats"]["total_battles"], 0);
    assert_eq!(stats["rating"], "Fair");
}

#[tokio::test]
async fn battle_list_degrades_to_empty() {
    let server = spawn().await;
    server.store.fail(StoreOp::ListBattles).await;
    let resp = assert_ok!(server.client.get(server.url("/api/v1/battles")).send().await);
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["total"], 0);
}

#[tokio::test]
async fn admin_edits_and_deactivates_members() {
    let server = spawn().await;
    let url = server.url("/api/v1/members/2");

    let resp = assert_ok!(
        server
            .client
            .patch(&url)
            .json(&json!({ "wallet": VOTER, "is_active": false }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.store.calls(StoreOp::UpdateMember).await, 0);

    let resp = assert_ok!(
        server
            .client
            .patch(&url)
            .json(&json!({ "wallet": ADMIN, "description": "retired", "is_active": false }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let member = body(resp).await;
    assert_eq!(member["is_active"], false);
    assert_eq!(member["description"], "retired");
    assert_eq!(member["name"], "bob");

    let resp = assert_ok!(server.client.get(server.url("/api/v1/members")).send().await);
    let directory = body(resp).await;
    assert_eq!(directory["total"], 1);
    assert_eq!(directory["data"][0]["name"], "alice");

    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/battles/{BATTLE_ID}")))
            .send()
            .await
    );
    assert_eq!(body(resp).await["member_b"]["name"], "bob");

    let resp = assert_ok!(
        server
            .client
            .patch(server.url("/api/v1/members/99"))
            .json(&json!({ "wallet": ADMIN, "is_active": false }))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn battle_with_missing_member_shows_placeholder() {
    let server = spawn().await;
    server.store.remove_member_row(MemberId::new(2)).await;

    let resp = assert_ok!(
        server
            .client
            .get(server.url(&format!("/api/v1/battles/{BATTLE_ID}")))
            .send()
            .await
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let battle = body(resp).await;
    assert_eq!(battle["member_a"]["name"], "alice");
    assert_eq!(battle["member_b"]["name"], "Member B");
    assert_eq!(battle["member_b"]["avatar_url"], PLACEHOLDER_AVATAR);
    assert_eq!(battle["member_b"]["id"], 2);
    assert_eq!(battle["counters"]["votes_b"], 5);
}

