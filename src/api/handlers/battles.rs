//! Battle handlers: list, detail, creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{BattleView, CreateBattleRequest, ListResponse, parse_wallet};
use crate::app_state::AppState;
use crate::domain::BattleId;
use crate::error::{ArenaError, ErrorResponse};

/// `GET /battles` — All battles, newest first.
///
/// A failed read returns an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/battles",
    tag = "Battles",
    summary = "List battles",
    description = "Returns every battle with both members joined, newest first. Missing members are shown as placeholders.",
    responses(
        (status = 200, description = "Battle list", body = ListResponse<BattleView>),
    )
)]
pub async fn list_battles(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let views = state
        .battles
        .list()
        .await
        .into_iter()
        .map(|b| BattleView::new(b, now))
        .collect();
    Json(ListResponse::new(views))
}

/// `GET /battles/{id}` — One battle.
///
/// # Errors
///
/// Returns [`ArenaError::BattleNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/battles/{id}",
    tag = "Battles",
    summary = "Get a battle",
    description = "Returns one battle with percentages, countdown, and status line.",
    params(("id" = i64, Path, description = "Battle id")),
    responses(
        (status = 200, description = "Battle", body = BattleView),
        (status = 404, description = "Battle not found", body = ErrorResponse),
    )
)]
pub async fn get_battle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ArenaError> {
    let battle = state.battles.get(BattleId::new(id)).await?;
    Ok(Json(BattleView::new(battle, Utc::now())))
}

/// `POST /battles` — Create a battle. Admin only.
///
/// # Errors
///
/// Returns [`ArenaError`] for non-admins, invalid input, or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/battles",
    tag = "Battles",
    summary = "Create a battle",
    description = "Creates an active battle between two distinct members with zeroed counters. Requires an admin wallet.",
    request_body = CreateBattleRequest,
    responses(
        (status = 201, description = "Battle created", body = BattleView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
    )
)]
pub async fn create_battle(
    State(state): State<AppState>,
    Json(req): Json<CreateBattleRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = parse_wallet(Some(&req.wallet))?;
    let now = Utc::now();
    let battle = state
        .arena_service
        .create_battle(wallet.as_ref(), req.into_draft(), now)
        .await?;
    Ok((StatusCode::CREATED, Json(BattleView::new(battle, now))))
}

/// Battle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/battles", get(list_battles).post(create_battle))
        .route("/battles/{id}", get(get_battle))
}
