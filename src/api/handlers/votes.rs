//! Vote handlers: eligibility check and the full stake-backed vote.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    EligibilityQuery, EligibilityResponse, VoteRequest, VoteResponse, parse_wallet,
};
use crate::app_state::AppState;
use crate::domain::BattleId;
use crate::error::{ArenaError, ErrorResponse};
use crate::service::VoteOutcome;

/// `GET /battles/{id}/eligibility` — Whether a wallet may vote.
///
/// # Errors
///
/// Returns [`ArenaError`] for a malformed wallet or unknown battle.
#[utoipa::path(
    get,
    path = "/api/v1/battles/{id}/eligibility",
    tag = "Votes",
    summary = "Check voting eligibility",
    description = "Evaluates the wallet against the battle: connection, existing vote, and voting window. Returns the vote button caption.",
    params(("id" = i64, Path, description = "Battle id"), EligibilityQuery),
    responses(
        (status = 200, description = "Eligibility verdict", body = EligibilityResponse),
        (status = 400, description = "Malformed wallet", body = ErrorResponse),
        (status = 404, description = "Battle not found", body = ErrorResponse),
    )
)]
pub async fn eligibility(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EligibilityQuery>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = parse_wallet(query.wallet.as_deref())?;
    let battle = state.battles.get(BattleId::new(id)).await?;
    let battle_id = battle.id;
    let session = state.vote_flow.open(battle, wallet).await;
    Ok(Json(EligibilityResponse::new(
        battle_id,
        session.eligibility(Utc::now()),
    )))
}

/// `POST /battles/{id}/votes` — Stake and vote.
///
/// Runs the whole flow: eligibility, stake validation, stake, vote
/// insert, and counter reconciliation. A duplicate vote is reported as
/// `already_voted` with status 200.
///
/// # Errors
///
/// Returns [`ArenaError`] for any failed precondition, invalid stake, or
/// external failure.
#[utoipa::path(
    post,
    path = "/api/v1/battles/{id}/votes",
    tag = "Votes",
    summary = "Vote with a stake",
    description = "Stakes the given amount on the chosen member's atom, records the vote, and updates the battle counters.",
    params(("id" = i64, Path, description = "Battle id")),
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = VoteResponse),
        (status = 200, description = "Wallet had already voted", body = VoteResponse),
        (status = 400, description = "Invalid stake", body = ErrorResponse),
        (status = 401, description = "Wallet not connected", body = ErrorResponse),
        (status = 409, description = "Already voted, inactive, or expired", body = ErrorResponse),
        (status = 422, description = "Member not in battle", body = ErrorResponse),
        (status = 502, description = "Stake failed", body = ErrorResponse),
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = parse_wallet(req.wallet.as_deref())?;
    let battle = state.battles.get(BattleId::new(id)).await?;
    let now = Utc::now();

    let (_session, outcome) = state
        .vote_flow
        .vote(battle, wallet, req.member_id, &req.stake, now)
        .await?;

    let status = match outcome {
        VoteOutcome::Recorded { .. } => StatusCode::CREATED,
        VoteOutcome::AlreadyVoted { .. } => StatusCode::OK,
    };
    Ok((status, Json(VoteResponse::new(outcome, req.member_id, now))))
}

/// Vote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/battles/{id}/eligibility", get(eligibility))
        .route("/battles/{id}/votes", post(cast_vote))
}
