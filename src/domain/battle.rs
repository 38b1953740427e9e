//! Battles: two members, per-side vote counters, and a voting window.
//!
//! A [`Battle`] is an immutable snapshot. Recording a vote never edits a
//! battle in place; [`Battle::with_counters`] produces the next snapshot
//! from the counters the store just accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::countdown::TimeLeft;
use super::{BattleId, Member, MemberId};

/// One of the two ordered sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BattleSide {
    /// First member (`member_a`).
    A,
    /// Second member (`member_b`).
    B,
}

/// Lifecycle status derived from the store's active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    /// Open for votes, subject to the end time.
    Active,
    /// Deactivated by an admin.
    Completed,
}

impl BattleStatus {
    /// Maps the store's `is_active` column.
    #[must_use]
    pub const fn from_active_flag(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Completed
        }
    }
}

/// Whether a battle accepts votes at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VotingWindow {
    /// Active and not past its end time.
    Open,
    /// Active flag is false.
    Inactive,
    /// Active, but the end time has passed.
    Expired,
}

/// Per-side vote counters as stored.
///
/// `total_votes` is kept as its own column; after every committed vote it
/// equals `votes_a + votes_b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VoteCounters {
    /// Votes for side A.
    pub votes_a: i64,
    /// Votes for side B.
    pub votes_b: i64,
    /// Total votes.
    pub total_votes: i64,
}

impl VoteCounters {
    /// Creates counters with the total derived from both sides.
    #[must_use]
    pub const fn new(votes_a: i64, votes_b: i64) -> Self {
        Self {
            votes_a,
            votes_b,
            total_votes: votes_a.saturating_add(votes_b),
        }
    }

    /// Returns the count for one side.
    #[must_use]
    pub const fn for_side(&self, side: BattleSide) -> i64 {
        match side {
            BattleSide::A => self.votes_a,
            BattleSide::B => self.votes_b,
        }
    }

    /// Returns counters with `side` and the total each raised by one.
    #[must_use]
    pub const fn increment(self, side: BattleSide) -> Self {
        let (votes_a, votes_b) = match side {
            BattleSide::A => (self.votes_a.saturating_add(1), self.votes_b),
            BattleSide::B => (self.votes_a, self.votes_b.saturating_add(1)),
        };
        Self {
            votes_a,
            votes_b,
            total_votes: self.total_votes.saturating_add(1),
        }
    }

    /// Returns `true` if the total column matches the per-side sum.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.total_votes == self.votes_a.saturating_add(self.votes_b)
    }

    /// Percentage split between side A and side B.
    ///
    /// Computed from the per-side counts. An empty battle is shown 50/50.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentages(&self) -> (f64, f64) {
        let total = self.votes_a.saturating_add(self.votes_b);
        if total <= 0 {
            return (50.0, 50.0);
        }
        let a = self.votes_a as f64 / total as f64 * 100.0;
        (a, 100.0 - a)
    }
}

/// Display-ready battle snapshot with both members joined.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Battle {
    /// Store id.
    pub id: BattleId,
    /// Title.
    pub title: String,
    /// Description, empty when unset.
    pub description: String,
    /// Side A member, or a placeholder if the join failed.
    pub member_a: Member,
    /// Side B member, or a placeholder if the join failed.
    pub member_b: Member,
    /// Vote counters.
    pub counters: VoteCounters,
    /// Lifecycle status.
    pub status: BattleStatus,
    /// Voting start.
    pub start_time: DateTime<Utc>,
    /// Voting end. `None` means open for as long as the battle is active.
    pub end_time: Option<DateTime<Utc>>,
    /// Recorded winner, if any.
    pub winner_id: Option<MemberId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Battle {
    /// Returns which side `member_id` is on, if either.
    #[must_use]
    pub fn side_of(&self, member_id: MemberId) -> Option<BattleSide> {
        if self.member_a.id == member_id {
            Some(BattleSide::A)
        } else if self.member_b.id == member_id {
            Some(BattleSide::B)
        } else {
            None
        }
    }

    /// Returns the member on `side`.
    #[must_use]
    pub const fn member(&self, side: BattleSide) -> &Member {
        match side {
            BattleSide::A => &self.member_a,
            BattleSide::B => &self.member_b,
        }
    }

    /// Evaluates the voting window at `now`.
    ///
    /// The active flag is checked first, so a deactivated battle is
    /// `Inactive` regardless of its end time. The end time itself is
    /// inclusive.
    #[must_use]
    pub fn voting_window(&self, now: DateTime<Utc>) -> VotingWindow {
        if self.status != BattleStatus::Active {
            return VotingWindow::Inactive;
        }
        match self.end_time {
            Some(end) if now > end => VotingWindow::Expired,
            _ => VotingWindow::Open,
        }
    }

    /// Time left until the end time, if the battle is active and has one.
    #[must_use]
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<TimeLeft> {
        if self.status != BattleStatus::Active {
            return None;
        }
        self.end_time.map(|end| TimeLeft::until(end, now))
    }

    /// Returns the winning member, if a winner is recorded.
    #[must_use]
    pub fn winner(&self) -> Option<&Member> {
        self.winner_id
            .and_then(|id| self.side_of(id))
            .map(|side| self.member(side))
    }

    /// One-line status caption for a battle card.
    #[must_use]
    pub fn status_line(&self, now: DateTime<Utc>) -> String {
        match (self.voting_window(now), self.end_time) {
            (VotingWindow::Open, _) => "Active".to_string(),
            (VotingWindow::Expired, _) => "Voting Ended".to_string(),
            (VotingWindow::Inactive, Some(end)) => format!("Ended {}", end.format("%Y-%m-%d")),
            (VotingWindow::Inactive, None) => "No end date".to_string(),
        }
    }

    /// Returns a new snapshot carrying `counters`.
    #[must_use]
    pub fn with_counters(&self, counters: VoteCounters) -> Self {
        Self {
            counters,
            ..self.clone()
        }
    }
}

/// Validated input for creating a battle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBattle {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Side A member.
    pub member_a: MemberId,
    /// Side B member, distinct from side A.
    pub member_b: MemberId,
    /// Voting start.
    pub start_time: DateTime<Utc>,
    /// Optional voting end.
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Duration;

    use super::*;

    pub(crate) fn sample_battle(votes_a: i64, votes_b: i64) -> Battle {
        let now = Utc::now();
        let mut member_a = Member::placeholder(MemberId::new(1), "Alice");
        member_a.atom_id = "0xatom-alice".to_string();
        let mut member_b = Member::placeholder(MemberId::new(2), "Bob");
        member_b.atom_id = "0xatom-bob".to_string();
        Battle {
            id: BattleId::new(10),
            title: "Alice vs Bob".to_string(),
            description: String::new(),
            member_a,
            member_b,
            counters: VoteCounters::new(votes_a, votes_b),
            status: BattleStatus::Active,
            start_time: now - Duration::hours(1),
            end_time: Some(now + Duration::days(1)),
            winner_id: None,
            created_at: now - Duration::hours(1),
        }
    }

    #[test]
    fn increment_keeps_total_consistent() {
        let counters = VoteCounters::new(3, 5);
        let next = counters.increment(BattleSide::A);
        assert_eq!(next, VoteCounters::new(4, 5));
        assert!(next.is_consistent());
        assert_eq!(next.total_votes, 9);
    }

    #[test]
    fn empty_battle_splits_evenly() {
        assert_eq!(VoteCounters::default().percentages(), (50.0, 50.0));
        let (a, b) = VoteCounters::new(1, 3).percentages();
        assert!((a - 25.0).abs() < f64::EPSILON);
        assert!((b - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inactive_wins_over_end_time() {
        let mut battle = sample_battle(0, 0);
        battle.status = BattleStatus::Completed;
        battle.end_time = Some(Utc::now() - Duration::days(2));
        assert_eq!(battle.voting_window(Utc::now()), VotingWindow::Inactive);
    }

    #[test]
    fn past_end_time_is_expired() {
        let mut battle = sample_battle(0, 0);
        battle.end_time = Some(Utc::now() - Duration::seconds(1));
        assert_eq!(battle.voting_window(Utc::now()), VotingWindow::Expired);
        assert_eq!(battle.status_line(Utc::now()), "Voting Ended");
    }

    #[test]
    fn end_time_is_inclusive() {
        let mut battle = sample_battle(0, 0);
        let end = Utc::now();
        battle.end_time = Some(end);
        assert_eq!(battle.voting_window(end), VotingWindow::Open);
    }

    #[test]
    fn no_end_time_stays_open_while_active() {
        let mut battle = sample_battle(0, 0);
        battle.end_time = None;
        let far_future = Utc::now() + Duration::days(3650);
        assert_eq!(battle.voting_window(far_future), VotingWindow::Open);
        assert!(battle.time_left(far_future).is_none());
    }

    #[test]
    fn side_lookup_and_winner() {
        let mut battle = sample_battle(0, 0);
        assert_eq!(battle.side_of(MemberId::new(2)), Some(BattleSide::B));
        assert_eq!(battle.side_of(MemberId::new(3)), None);
        battle.winner_id = Some(MemberId::new(1));
        assert_eq!(battle.winner().map(|m| m.name.as_str()), Some("Alice"));
    }

    #[test]
    fn with_counters_leaves_original_untouched() {
        let battle = sample_battle(3, 5);
        let next = battle.with_counters(VoteCounters::new(4, 5));
        assert_eq!(battle.counters, VoteCounters::new(3, 5));
        assert_eq!(next.counters.votes_a, 4);
        assert_eq!(next.id, battle.id);
    }

    #[test]
    fn inactive_status_line_shows_end_date() {
        let mut battle = sample_battle(0, 0);
        battle.status = BattleStatus::Completed;
        battle.end_time = None;
        assert_eq!(battle.status_line(Utc::now()), "No end date");
        battle.end_time = Some(Utc::now());
        assert!(battle.status_line(Utc::now()).starts_with("Ended "));
    }
}
