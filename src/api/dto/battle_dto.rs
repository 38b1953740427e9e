//! Battle DTOs: battle view, creation, eligibility, and votes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Battle, BattleId, MemberId, TimeLeft, VoteCounters};
use crate::service::{BattleDraft, Eligibility, VoteOutcome};

/// Battle as shown on a card: the snapshot plus derived display fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BattleView {
    /// Battle snapshot.
    #[serde(flatten)]
    pub battle: Battle,
    /// Share of votes for side A, in percent.
    pub percent_a: f64,
    /// Share of votes for side B, in percent.
    pub percent_b: f64,
    /// Status caption.
    pub status_line: String,
    /// Countdown, for active battles with an end time.
    pub time_left: Option<TimeLeft>,
    /// Winner's name, once recorded.
    pub winner_name: Option<String>,
}

impl BattleView {
    /// Derives the view of `battle` at `now`.
    #[must_use]
    pub fn new(battle: Battle, now: DateTime<Utc>) -> Self {
        let (percent_a, percent_b) = battle.counters.percentages();
        Self {
            percent_a,
            percent_b,
            status_line: battle.status_line(now),
            time_left: battle.time_left(now),
            winner_name: battle.winner().map(|m| m.name.clone()),
            battle,
        }
    }
}

/// Request body for `POST /battles`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBattleRequest {
    /// Admin wallet.
    pub wallet: String,
    /// Battle title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Side A member.
    pub member_a: MemberId,
    /// Side B member.
    pub member_b: MemberId,
    /// Optional voting end, in the future.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl CreateBattleRequest {
    /// Converts to the service input, dropping the wallet.
    #[must_use]
    pub fn into_draft(self) -> BattleDraft {
        BattleDraft {
            title: self.title,
            description: self.description,
            member_a: self.member_a,
            member_b: self.member_b,
            end_time: self.end_time,
        }
    }
}

/// Query parameters for `GET /battles/{id}/eligibility`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct EligibilityQuery {
    /// Connected wallet, if any.
    #[serde(default)]
    pub wallet: Option<String>,
}

/// Response body for `GET /battles/{id}/eligibility`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EligibilityResponse {
    /// Battle id.
    pub battle_id: BattleId,
    /// `connect_wallet`, `already_voted`, `inactive`, `expired`, or `open`.
    pub status: String,
    /// Vote button caption.
    pub caption: String,
    /// Whether a vote may be triggered.
    pub can_vote: bool,
    /// Member the wallet voted for, when known.
    pub voted_for: Option<MemberId>,
}

impl EligibilityResponse {
    /// Builds the response from an eligibility verdict.
    #[must_use]
    pub fn new(battle_id: BattleId, eligibility: Eligibility) -> Self {
        let (status, voted_for) = match eligibility {
            Eligibility::ConnectWallet => ("connect_wallet", None),
            Eligibility::AlreadyVoted { member_id } => ("already_voted", member_id),
            Eligibility::Inactive => ("inactive", None),
            Eligibility::Expired => ("expired", None),
            Eligibility::Open => ("open", None),
        };
        Self {
            battle_id,
            status: status.to_string(),
            caption: eligibility.caption().to_string(),
            can_vote: eligibility.can_vote(),
            voted_for,
        }
    }
}

/// Request body for `POST /battles/{id}/votes`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Voting wallet; absent means not connected.
    #[serde(default)]
    pub wallet: Option<String>,
    /// Chosen member.
    pub member_id: MemberId,
    /// Stake amount as entered, e.g. `"100"`.
    #[serde(default)]
    pub stake: String,
}

/// Response body for `POST /battles/{id}/votes`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoteResponse {
    /// `recorded` or `already_voted`.
    pub status: String,
    /// Member the wallet's vote counts for, when known.
    pub voted_for: Option<MemberId>,
    /// Counters after the vote; absent for a duplicate.
    pub counters: Option<VoteCounters>,
    /// Updated battle; absent for a duplicate.
    pub battle: Option<BattleView>,
    /// Stake transaction hash.
    pub tx_hash: Option<String>,
}

impl VoteResponse {
    /// Builds the response for `outcome`, given the chosen member.
    #[must_use]
    pub fn new(outcome: VoteOutcome, chosen: MemberId, now: DateTime<Utc>) -> Self {
        match outcome {
            VoteOutcome::Recorded { battle, receipt } => Self {
                status: "recorded".to_string(),
                voted_for: Some(chosen),
                counters: Some(battle.counters),
                battle: Some(BattleView::new(battle, now)),
                tx_hash: Some(receipt.tx_hash),
            },
            VoteOutcome::AlreadyVoted { member_id } => Self {
                status: "already_voted".to_string(),
                voted_for: member_id,
                counters: None,
                battle: None,
                tx_hash: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::battle::tests::sample_battle;

    #[test]
    fn view_derives_display_fields() {
        let view = BattleView::new(sample_battle(1, 3), Utc::now());
        assert!((view.percent_a - 25.0).abs() < f64::EPSILON);
        assert_eq!(view.status_line, "Active");
        assert!(view.time_left.is_some_and(|t| !t.expired));
        assert!(view.winner_name.is_none());
    }

    #[test]
    fn eligibility_status_strings() {
        let resp = EligibilityResponse::new(
            BattleId::new(1),
            Eligibility::AlreadyVoted {
                member_id: Some(MemberId::new(2)),
            },
        );
        assert_eq!(resp.status, "already_voted");
        assert_eq!(resp.caption, "Already Voted");
        assert!(!resp.can_vote);
        assert_eq!(resp.voted_for, Some(MemberId::new(2)));
    }
}
