//! Member DTOs: directory query, creation, edits, statistics.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BattleStats, MemberCategory, MemberId, MemberUpdate, NewMember};

/// Query parameters for `GET /members`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MemberQuery {
    /// `all` (default) or a category label such as `Core`.
    #[serde(default)]
    pub category: Option<String>,
}

/// Request body for `POST /members`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    /// Creating wallet.
    pub wallet: String,
    /// Display name.
    pub name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Image reference.
    pub image: String,
    /// Optional website.
    #[serde(default)]
    pub url: Option<String>,
    /// Category label; defaults to `Members`.
    #[serde(default)]
    pub category: Option<String>,
}

impl CreateMemberRequest {
    /// Converts to the service input, dropping the wallet.
    #[must_use]
    pub fn into_new_member(self) -> NewMember {
        NewMember {
            name: self.name,
            description: self.description,
            image: self.image,
            url: self.url.filter(|u| !u.trim().is_empty()),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .map(|c| MemberCategory::from(c.trim()))
                .unwrap_or_default(),
        }
    }
}

/// Request body for `PATCH /members/{id}`. Omitted fields are unchanged.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    /// Admin wallet performing the edit.
    pub wallet: String,
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New category label.
    #[serde(default)]
    pub category: Option<String>,
    /// New avatar image reference.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// `false` deactivates the member.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateMemberRequest {
    /// Converts to the service input, dropping the wallet. A blank
    /// category leaves the category unchanged.
    #[must_use]
    pub fn into_update(self) -> MemberUpdate {
        MemberUpdate {
            name: self.name,
            description: self.description,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .map(|c| MemberCategory::from(c.trim())),
            avatar_url: self.avatar_url,
            is_active: self.is_active,
        }
    }
}

/// Response body for `GET /members/{id}/stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberStatsResponse {
    /// Member id.
    pub member_id: MemberId,
    /// Aggregate battle history.
    pub stats: BattleStats,
    /// Won share of decided battles, as a percentage.
    pub win_loss_ratio: Option<f64>,
    /// `Good` at 50% wins or better, `Fair` otherwise.
    pub rating: String,
}

impl MemberStatsResponse {
    /// Builds the response for `member_id`.
    #[must_use]
    pub fn new(member_id: MemberId, stats: BattleStats) -> Self {
        Self {
            member_id,
            win_loss_ratio: stats.win_loss_ratio(),
            rating: stats.rating().to_string(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_defaults_to_members() {
        let req = CreateMemberRequest {
            wallet: String::new(),
            name: "Carol".to_string(),
            description: String::new(),
            image: "https://img/c.png".to_string(),
            url: Some(" ".to_string()),
            category: Some(String::new()),
        };
        let member = req.into_new_member();
        assert_eq!(member.category, MemberCategory::Members);
        assert!(member.url.is_none());
    }

    #[test]
    fn update_keeps_omitted_fields_unset() {
        let Ok(req) = serde_json::from_str::<UpdateMemberRequest>(
            r#"{"wallet":"0xad","is_active":false,"category":" "}"#,
        ) else {
            panic!("valid body");
        };
        let update = req.into_update();
        assert_eq!(update.is_active, Some(false));
        assert!(update.name.is_none());
        assert!(update.category.is_none());
    }
}
