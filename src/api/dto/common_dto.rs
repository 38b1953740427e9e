//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::WalletAddress;
use crate::error::ArenaError;
use crate::service::MemberQuota;

/// List envelope with the item count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListResponse<T> {
    /// Items.
    pub data: Vec<T>,
    /// Number of items.
    pub total: usize,
}

impl<T> ListResponse<T> {
    /// Wraps `data`.
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}

/// Response body for `GET /admin/{wallet}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStatusResponse {
    /// Normalized wallet address.
    pub wallet: String,
    /// Whether the wallet is on the admin allow-list.
    pub is_admin: bool,
    /// Member creation allowance.
    pub member_quota: MemberQuota,
}

/// Parses an optional wallet field. Blank counts as not connected.
///
/// # Errors
///
/// Returns [`ArenaError::InvalidRequest`] for a malformed address.
pub fn parse_wallet(raw: Option<&str>) -> Result<Option<WalletAddress>, ArenaError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => WalletAddress::parse(s).map(Some),
    }
}
