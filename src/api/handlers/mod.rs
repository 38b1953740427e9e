//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod battles;
pub mod members;
pub mod system;
pub mod votes;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(members::routes())
        .merge(battles::routes())
        .merge(votes::routes())
        .merge(admin::routes())
}
