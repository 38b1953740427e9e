//! Community members and their categories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MemberId;

/// Image shown when a member has no avatar, or when a battle's joined
/// member record is missing.
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg?height=64&width=64";

/// Member category.
///
/// The three built-in categories drive the directory filter; any other
/// string is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberCategory {
    /// Core team.
    Core,
    /// Long-standing community members.
    IntuitionOg,
    /// Regular members. Default for new members.
    #[default]
    Members,
    /// Free-form category.
    Other(String),
}

impl MemberCategory {
    /// Returns the category label as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Core => "Core",
            Self::IntuitionOg => "Intuition OG",
            Self::Members => "Members",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for MemberCategory {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Core" => Self::Core,
            "Intuition OG" => Self::IntuitionOg,
            "Members" => Self::Members,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for MemberCategory {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<MemberCategory> for String {
    fn from(category: MemberCategory) -> Self {
        match category {
            MemberCategory::Other(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready community member.
///
/// Every optional store column has already been defaulted: strings are
/// empty rather than absent, counts are zero.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Member {
    /// Store id.
    pub id: MemberId,
    /// On-chain atom identifier that stakes are deposited against.
    pub atom_id: String,
    /// Display name.
    pub name: String,
    /// Free text description.
    pub description: String,
    /// Category label.
    #[schema(value_type = String)]
    pub category: MemberCategory,
    /// Avatar image reference.
    pub avatar_url: String,
    /// Cumulative vote total.
    pub total_votes: i64,
    /// Whether the member is listed.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Stand-in for a battle side whose member record could not be joined.
    #[must_use]
    pub fn placeholder(id: MemberId, fallback_name: &str) -> Self {
        Self {
            id,
            atom_id: String::new(),
            name: fallback_name.to_string(),
            description: String::new(),
            category: MemberCategory::default(),
            avatar_url: PLACEHOLDER_AVATAR.to_string(),
            total_votes: 0,
            is_active: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Returns `true` if this member can receive stakes.
    #[must_use]
    pub fn has_atom(&self) -> bool {
        !self.atom_id.is_empty()
    }
}

/// Validated input for creating a member.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    /// Display name.
    pub name: String,
    /// Free text description.
    pub description: String,
    /// Image reference, also used as the avatar.
    pub image: String,
    /// Optional website.
    pub url: Option<String>,
    /// Category label.
    pub category: MemberCategory,
}

/// Admin edit of an existing member. `None` leaves a field unchanged.
///
/// Members are never deleted; setting `is_active` to `false` removes
/// them from the directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<MemberCategory>,
    /// New avatar image reference.
    pub avatar_url: Option<String>,
    /// Listed or deactivated.
    pub is_active: Option<bool>,
}

impl MemberUpdate {
    /// Returns `true` if no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.avatar_url.is_none()
            && self.is_active.is_none()
    }
}
