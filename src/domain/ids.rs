//! Type-safe identifiers for members, battles, and voter wallets.
//!
//! Store rows key members and battles by integer ids. [`MemberId`] and
//! [`BattleId`] wrap those so a battle id can never be passed where a
//! member id is expected. [`WalletAddress`] is always lowercase, which
//! makes the (battle, wallet) vote uniqueness case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ArenaError;

/// Identifier of a community member.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Wraps a raw store id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw store id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemberId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Identifier of a battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct BattleId(i64);

impl BattleId {
    /// Wraps a raw store id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw store id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BattleId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// An EVM wallet address, normalized to lowercase.
///
/// Construction goes through [`WalletAddress::parse`], which accepts a
/// `0x`-prefixed, 40 hex digit string in any case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "0x52908400098527886e0f7030069857d2e4169ee7")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parses and lowercases a wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] if the input is not a
    /// `0x`-prefixed 20-byte hex string.
    pub fn parse(raw: &str) -> Result<Self, ArenaError> {
        let trimmed = raw.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| {
                ArenaError::InvalidRequest(format!("wallet address must start with 0x: {raw}"))
            })?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ArenaError::InvalidRequest(format!(
                "wallet address must be 40 hex digits: {raw}"
            )));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Returns the lowercase address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ArenaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(wallet: WalletAddress) -> Self {
        wallet.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const MIXED: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn wallet_is_lowercased() {
        let Ok(wallet) = WalletAddress::parse(MIXED) else {
            panic!("valid address rejected");
        };
        assert_eq!(wallet.as_str(), "0x52908400098527886e0f7030069857d2e4169ee7");
    }

    #[test]
    fn wallet_case_variants_are_equal() {
        let a = WalletAddress::parse(MIXED).ok();
        let b = WalletAddress::parse(&MIXED.to_lowercase()).ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn wallet_rejects_missing_prefix() {
        assert!(WalletAddress::parse("52908400098527886e0f7030069857d2e4169ee7").is_err());
    }

    #[test]
    fn wallet_rejects_bad_length_and_digits() {
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("0xzz908400098527886e0f7030069857d2e4169ee7").is_err());
        assert!(WalletAddress::parse("").is_err());
    }

    #[test]
    fn wallet_deserializes_through_parse() {
        let json = format!("\"{MIXED}\"");
        let parsed: Result<WalletAddress, _> = serde_json::from_str(&json);
        let Ok(wallet) = parsed else {
            panic!("deserialization failed");
        };
        assert!(wallet.as_str().starts_with("0x5290"));
        assert!(serde_json::from_str::<WalletAddress>("\"nope\"").is_err());
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(MemberId::new(7).to_string(), "7");
        assert_eq!(BattleId::from(42).get(), 42);
    }
}
