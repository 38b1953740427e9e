//! Data Transfer Objects for REST request/response serialization.
//!
//! Wallets arrive as plain strings and are validated in the handlers, so
//! a malformed address yields a structured error instead of a rejected
//! body.

pub mod battle_dto;
pub mod common_dto;
pub mod member_dto;

pub use battle_dto::*;
pub use common_dto::*;
pub use member_dto::*;
