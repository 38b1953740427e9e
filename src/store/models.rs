//! Raw store rows, as the database returns them.
//!
//! Most columns are nullable in the hosted schema, so most fields are
//! `Option`. Turning these into display records is the readers' job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BattleId, MemberId, WalletAddress};

/// A row from the `community_members` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberRow {
    /// Row id.
    pub id: i64,
    /// On-chain atom id.
    pub atomid: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Image reference.
    pub image: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Avatar reference.
    pub avatar_url: Option<String>,
    /// Cumulative votes.
    pub total_votes: Option<i64>,
    /// Listed flag.
    pub is_active: Option<bool>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// A row from the `battles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BattleRow {
    /// Row id.
    pub id: i64,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Side A member id.
    pub member1_id: i64,
    /// Side B member id.
    pub member2_id: i64,
    /// Side A votes.
    pub member1_votes: Option<i64>,
    /// Side B votes.
    pub member2_votes: Option<i64>,
    /// Total votes.
    pub total_votes: Option<i64>,
    /// Active flag.
    pub is_active: Option<bool>,
    /// Voting start.
    pub start_date: Option<DateTime<Utc>>,
    /// Voting end.
    pub end_date: Option<DateTime<Utc>>,
    /// Winner member id.
    pub winner_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A battle row with its two member rows joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedBattleRow {
    /// The battle.
    pub battle: BattleRow,
    /// Side A member, `None` if the join found nothing.
    pub member_a: Option<MemberRow>,
    /// Side B member, `None` if the join found nothing.
    pub member_b: Option<MemberRow>,
}

/// One row of `battle_votes`: a wallet's vote in a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Battle voted in.
    pub battle_id: BattleId,
    /// Lowercased voter wallet.
    pub wallet_address: WalletAddress,
    /// Member voted for.
    pub voted_for_member_id: MemberId,
}
