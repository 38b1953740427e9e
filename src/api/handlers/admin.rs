//! Admin gate handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::AdminStatusResponse;
use crate::app_state::AppState;
use crate::domain::WalletAddress;
use crate::error::{ArenaError, ErrorResponse};

/// `GET /admin/{wallet}` — Admin status and member quota for a wallet.
///
/// Checked against the allow-list on every request. Lookup failures
/// report `is_admin: false`.
///
/// # Errors
///
/// Returns [`ArenaError::InvalidRequest`] for a malformed address.
#[utoipa::path(
    get,
    path = "/api/v1/admin/{wallet}",
    tag = "Admin",
    summary = "Admin status",
    description = "Reports whether the wallet may use admin actions and how many members it may create.",
    params(("wallet" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "Admin status", body = AdminStatusResponse),
        (status = 400, description = "Malformed wallet", body = ErrorResponse),
    )
)]
pub async fn admin_status(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<impl IntoResponse, ArenaError> {
    let wallet = WalletAddress::parse(&wallet)?;
    let member_quota = state.arena_service.member_quota(&wallet).await;
    Ok(Json(AdminStatusResponse {
        wallet: wallet.to_string(),
        is_admin: member_quota.is_admin,
        member_quota,
    }))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/{wallet}", get(admin_status))
}
