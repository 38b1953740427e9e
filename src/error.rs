//! Arena error types with HTTP status code mapping.
//!
//! [`ArenaError`] is the central error type for the service. Each variant
//! maps to a numeric code, an HTTP status, and an [`ErrorKind`]. The kind
//! is what the vote flow and the UI care about: eligibility violations
//! must be distinguishable from generic failures so a client can caption
//! its disabled vote button correctly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BattleId, MemberId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2102,
///     "kind": "eligibility",
///     "message": "already voted in battle 7"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind, and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error taxonomy shared by the REST layer and the vote flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad user input: reported locally, no external call made.
    UserInput,
    /// Voting is not allowed for this wallet/battle right now.
    Eligibility,
    /// The store rejected a second vote for the same (battle, wallet).
    DuplicateVote,
    /// Caller lacks the rights for the operation.
    Forbidden,
    /// Referenced record does not exist.
    NotFound,
    /// A store or chain call failed. Retryable by the user.
    External,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                   |
/// |-----------|---------------------|-------------------------------|
/// | 1000–1999 | User input          | 400 Bad Request               |
/// | 2000–2099 | Not found           | 404 Not Found                 |
/// | 2100–2199 | Eligibility         | 401 / 409 / 422               |
/// | 2200–2299 | Authorization       | 403 Forbidden                 |
/// | 3000–3999 | External / server   | 500 / 502                     |
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Stake amount could not be accepted.
    #[error("invalid stake amount: {0}")]
    InvalidStake(String),

    /// A stake was submitted without a selected side.
    #[error("no member selected")]
    NoSelection,

    /// Battle with the given ID was not found.
    #[error("battle not found: {0}")]
    BattleNotFound(BattleId),

    /// Member with the given ID was not found.
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),

    /// No wallet is connected.
    #[error("connect a wallet to vote")]
    WalletNotConnected,

    /// The wallet already has a vote recorded in this battle.
    #[error("already voted in battle {0}")]
    AlreadyVoted(BattleId),

    /// The battle has been deactivated.
    #[error("battle {0} is not active")]
    BattleInactive(BattleId),

    /// The battle's end time has passed.
    #[error("voting ended for battle {0}")]
    BattleExpired(BattleId),

    /// The chosen member is not one of the battle's two sides.
    #[error("member {member_id} is not part of battle {battle_id}")]
    MemberNotInBattle {
        /// Battle being voted on.
        battle_id: BattleId,
        /// Member that was chosen.
        member_id: MemberId,
    },

    /// The store's (battle, wallet) uniqueness constraint rejected an insert.
    #[error("duplicate vote for battle {0}")]
    DuplicateVote(BattleId),

    /// Caller is not permitted to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Chain client call (stake, atom creation) failed.
    #[error("chain error: {0}")]
    ChainError(String),

    /// Store call failed.
    #[error("store error: {0}")]
    StoreError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ArenaError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidStake(_) => 1002,
            Self::NoSelection => 1003,
            Self::BattleNotFound(_) => 2001,
            Self::MemberNotFound(_) => 2002,
            Self::WalletNotConnected => 2101,
            Self::AlreadyVoted(_) => 2102,
            Self::BattleInactive(_) => 2103,
            Self::BattleExpired(_) => 2104,
            Self::MemberNotInBattle { .. } => 2105,
            Self::DuplicateVote(_) => 2106,
            Self::Forbidden(_) => 2201,
            Self::Internal(_) => 3000,
            Self::StoreError(_) => 3001,
            Self::ChainError(_) => 3002,
        }
    }

    /// Returns the error category for this variant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::InvalidStake(_) | Self::NoSelection => {
                ErrorKind::UserInput
            }
            Self::BattleNotFound(_) | Self::MemberNotFound(_) => ErrorKind::NotFound,
            Self::WalletNotConnected
            | Self::AlreadyVoted(_)
            | Self::BattleInactive(_)
            | Self::BattleExpired(_)
            | Self::MemberNotInBattle { .. } => ErrorKind::Eligibility,
            Self::DuplicateVote(_) => ErrorKind::DuplicateVote,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::ChainError(_) | Self::StoreError(_) | Self::Internal(_) => ErrorKind::External,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidStake(_) | Self::NoSelection => {
                StatusCode::BAD_REQUEST
            }
            Self::BattleNotFound(_) | Self::MemberNotFound(_) => StatusCode::NOT_FOUND,
            Self::WalletNotConnected => StatusCode::UNAUTHORIZED,
            Self::AlreadyVoted(_)
            | Self::BattleInactive(_)
            | Self::BattleExpired(_)
            | Self::DuplicateVote(_) => StatusCode::CONFLICT,
            Self::MemberNotInBattle { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ChainError(_) => StatusCode::BAD_GATEWAY,
            Self::StoreError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ArenaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
