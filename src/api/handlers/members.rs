//! Member handlers: directory, creation, admin edits, statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{
    CreateMemberRequest, ListResponse, MemberQuery, MemberStatsResponse, UpdateMemberRequest,
    parse_wallet,
};
use crate::app_state::AppState;
use crate::domain::{Member, MemberId};
use crate::error::{ArenaError, ErrorResponse};
use crate::service::CategoryFilter;

/// `GET /members` — Active members, most voted first.
///
/// # Errors
///
/// Returns [`ArenaError`] if the store read fails.
#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    summary = "List members",
    description = "Returns active community members ordered by total votes, optionally filtered by category.",
    params(MemberQuery),
    responses(
        (status = 200, description = "Member directory", body = ListResponse<Member>),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> Result<impl IntoResponse, ArenaError> {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let members = state.members.list(&filter).await?;
    Ok(Json(ListResponse::new(members)))
}

/// `POST /members` — Create a member backed by a new atom.
///
/// # Errors
///
/// Returns [`ArenaError`] on bad input, exhausted quota, or chain/store
/// failure.
#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    summary = "Create a member",
    description = "Creates the member's on-chain atom, then stores the member. Admins are unlimited; other wallets are limited per wallet.",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Member limit reached", body = ErrorResponse),
        (status = 502, description = "Chain call failed", body = ErrorResponse),
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = parse_wallet(Some(&req.wallet))?;
    let member = state
        .arena_service
        .create_member(wallet.as_ref(), req.into_new_member())
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// `PATCH /members/{id}` — Edit or deactivate a member. Admin only.
///
/// # Errors
///
/// Returns [`ArenaError`] for a non-admin wallet, an empty edit, an
/// unknown member, or a store failure.
#[utoipa::path(
    patch,
    path = "/api/v1/members/{id}",
    tag = "Members",
    summary = "Edit a member",
    description = "Updates name, description, category, avatar, or active flag. Deactivated members leave the directory but stay in existing battles.",
    params(("id" = i64, Path, description = "Member id")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Wallet not connected", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = parse_wallet(Some(&req.wallet))?;
    let member = state
        .arena_service
        .update_member(wallet.as_ref(), MemberId::new(id), req.into_update())
        .await?;
    Ok(Json(member))
}

/// `GET /members/{id}/stats` — Battle statistics for one member.
#[utoipa::path(
    get,
    path = "/api/v1/members/{id}/stats",
    tag = "Members",
    summary = "Member battle statistics",
    description = "Returns the member's battle history aggregate. Unavailable statistics are reported as zeros.",
    params(("id" = i64, Path, description = "Member id")),
    responses(
        (status = 200, description = "Statistics", body = MemberStatsResponse),
    )
)]
pub async fn member_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let member_id = MemberId::new(id);
    let stats = state.stats.for_member(member_id).await;
    Json(MemberStatsResponse::new(member_id, stats))
}

/// Member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/members/{id}", patch(update_member))
        .route("/members/{id}/stats", get(member_stats))
}
