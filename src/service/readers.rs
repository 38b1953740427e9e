//! Read adapters: member directory, battles, and member statistics.
//!
//! Readers turn raw store rows into display records. Every optional
//! column is defaulted here so nothing downstream handles `None` for a
//! field that only exists for display. The battle list and statistics
//! degrade to empty/zero on failure; the directory and single-battle
//! lookups propagate errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::member::PLACEHOLDER_AVATAR;
use crate::domain::{
    Battle, BattleId, BattleStats, BattleStatus, Member, MemberCategory, MemberId, VoteCounters,
};
use crate::error::ArenaError;
use crate::store::{ArenaStore, JoinedBattleRow, MemberRow};

/// Category filter for the member directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// One category.
    Only(MemberCategory),
}

impl CategoryFilter {
    /// Parses a query value; `"all"` or empty means no filter.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(s) if s.eq_ignore_ascii_case("all") => Self::All,
            Some(s) => Self::Only(MemberCategory::from(s)),
        }
    }

    fn matches(&self, member: &Member) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => &member.category == category,
        }
    }
}

/// Maps a raw member row to a display record.
#[must_use]
pub fn map_member(row: MemberRow) -> Member {
    let image = row.image.filter(|s| !s.is_empty());
    let avatar_url = row
        .avatar_url
        .filter(|s| !s.is_empty())
        .or(image)
        .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string());

    Member {
        id: MemberId::new(row.id),
        atom_id: row.atomid.unwrap_or_default(),
        name: row.name.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        category: row
            .category
            .filter(|s| !s.is_empty())
            .map(MemberCategory::from)
            .unwrap_or_default(),
        avatar_url,
        total_votes: row.total_votes.unwrap_or(0),
        is_active: row.is_active.unwrap_or(true),
        created_at: row.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

/// Maps a joined battle row to a display snapshot. A missing member
/// becomes a placeholder rather than failing the read.
#[must_use]
pub fn map_battle(row: JoinedBattleRow) -> Battle {
    let JoinedBattleRow {
        battle,
        member_a,
        member_b,
    } = row;

    let member_a = member_a.map_or_else(
        || Member::placeholder(MemberId::new(battle.member1_id), "Member A"),
        map_member,
    );
    let member_b = member_b.map_or_else(
        || Member::placeholder(MemberId::new(battle.member2_id), "Member B"),
        map_member,
    );

    let votes_a = battle.member1_votes.unwrap_or(0);
    let votes_b = battle.member2_votes.unwrap_or(0);
    let counters = VoteCounters {
        votes_a,
        votes_b,
        total_votes: battle
            .total_votes
            .unwrap_or_else(|| votes_a.saturating_add(votes_b)),
    };

    Battle {
        id: BattleId::new(battle.id),
        title: battle.title.unwrap_or_default(),
        description: battle.description.unwrap_or_default(),
        member_a,
        member_b,
        counters,
        status: BattleStatus::from_active_flag(battle.is_active.unwrap_or(false)),
        start_time: battle.start_date.unwrap_or(battle.created_at),
        end_time: battle.end_date,
        winner_id: battle.winner_id.map(MemberId::new),
        created_at: battle.created_at,
    }
}

/// Lists active members, most voted first.
#[derive(Debug, Clone)]
pub struct MemberDirectory {
    store: Arc<dyn ArenaStore>,
}

impl MemberDirectory {
    /// Creates a directory reader.
    #[must_use]
    pub fn new(store: Arc<dyn ArenaStore>) -> Self {
        Self { store }
    }

    /// Returns active members matching `filter`, ordered by votes.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::StoreError`] if the store read fails.
    pub async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Member>, ArenaError> {
        let rows = self.store.list_active_members().await?;
        Ok(rows
            .into_iter()
            .map(map_member)
            .filter(|m| filter.matches(m))
            .collect())
    }
}

/// Reads battles joined with their members.
#[derive(Debug, Clone)]
pub struct BattleReader {
    store: Arc<dyn ArenaStore>,
}

impl BattleReader {
    /// Creates a battle reader.
    #[must_use]
    pub fn new(store: Arc<dyn ArenaStore>) -> Self {
        Self { store }
    }

    /// Returns all battles, newest first. A failed read yields an empty
    /// list.
    pub async fn list(&self) -> Vec<Battle> {
        match self.store.list_battles().await {
            Ok(rows) => rows.into_iter().map(map_battle).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "battle list unavailable, showing none");
                Vec::new()
            }
        }
    }

    /// Returns one battle.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::BattleNotFound`] if no such battle exists, or
    /// [`ArenaError::StoreError`] if the read fails.
    pub async fn get(&self, battle_id: BattleId) -> Result<Battle, ArenaError> {
        self.store
            .fetch_battle(battle_id)
            .await?
            .map(map_battle)
            .ok_or(ArenaError::BattleNotFound(battle_id))
    }
}

/// Reads per-member battle statistics.
#[derive(Debug, Clone)]
pub struct StatsReader {
    store: Arc<dyn ArenaStore>,
}

impl StatsReader {
    /// Creates a stats reader.
    #[must_use]
    pub fn new(store: Arc<dyn ArenaStore>) -> Self {
        Self { store }
    }

    /// Returns stats for `member_id`; zeroed on failure or no history.
    pub async fn for_member(&self, member_id: MemberId) -> BattleStats {
        match self.store.member_battle_stats(member_id).await {
            Ok(Some(stats)) => stats,
            Ok(None) => BattleStats::zeroed(),
            Err(e) => {
                tracing::warn!(%member_id, error = %e, "battle stats unavailable, showing zeros");
                BattleStats::zeroed()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::memory::StoreOp;
    use crate::store::{BattleRow, MemoryStore};

    fn member_row(id: i64, category: &str, votes: i64) -> MemberRow {
        MemberRow {
            id,
            atomid: Some(format!("0xatom{id}")),
            name: Some(format!("member-{id}")),
            category: Some(category.to_string()),
            total_votes: Some(votes),
            is_active: Some(true),
            ..MemberRow::default()
        }
    }

    fn battle_row(id: i64, a: i64, b: i64, age_hours: i64) -> BattleRow {
        BattleRow {
            id,
            title: Some(format!("battle-{id}")),
            description: None,
            member1_id: a,
            member2_id: b,
            member1_votes: Some(1),
            member2_votes: None,
            total_votes: None,
            is_active: Some(true),
            start_date: None,
            end_date: None,
            winner_id: None,
            created_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    #[test]
    fn member_defaults_are_safe() {
        let member = map_member(MemberRow {
            id: 4,
            ..MemberRow::default()
        });
        assert_eq!(member.name, "");
        assert_eq!(member.category, MemberCategory::Members);
        assert_eq!(member.avatar_url, PLACEHOLDER_AVATAR);
        assert_eq!(member.total_votes, 0);
        assert!(member.is_active);
    }

    #[test]
    fn avatar_falls_back_to_image() {
        let member = map_member(MemberRow {
            id: 1,
            image: Some("https://img/a.png".to_string()),
            avatar_url: Some(String::new()),
            ..MemberRow::default()
        });
        assert_eq!(member.avatar_url, "https://img/a.png");
    }

    #[test]
    fn battle_defaults_and_placeholder() {
        let row = JoinedBattleRow {
            battle: battle_row(1, 1, 2, 0),
            member_a: Some(member_row(1, "Core", 0)),
            member_b: None,
        };
        let created_at = row.battle.created_at;
        let battle = map_battle(row);
        assert_eq!(battle.member_b.name, "Member B");
        assert_eq!(battle.member_b.id, MemberId::new(2));
        assert_eq!(battle.counters, VoteCounters::new(1, 0));
        assert_eq!(battle.start_time, created_at);
        assert_eq!(battle.description, "");
    }

    #[tokio::test]
    async fn directory_filters_by_category() {
        let store = Arc::new(MemoryStore::new());
        store.add_member_row(member_row(1, "Core", 3)).await;
        store.add_member_row(member_row(2, "Members", 9)).await;
        store.add_member_row(member_row(3, "Core", 7)).await;
        let directory = MemberDirectory::new(store);

        let Ok(all) = directory.list(&CategoryFilter::All).await else {
            panic!("list failed");
        };
        assert_eq!(
            all.iter().map(|m| m.id.get()).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );

        let Ok(core) = directory.list(&CategoryFilter::parse(Some("Core"))).await else {
            panic!("list failed");
        };
        assert_eq!(
            core.iter().map(|m| m.id.get()).collect::<Vec<_>>(),
            vec![3, 1]
        );
    }

    #[tokio::test]
    async fn battles_newest_first_and_degrade_on_failure() {
        let store = Arc::new(MemoryStore::new());
        store.add_battle_row(battle_row(1, 1, 2, 5)).await;
        store.add_battle_row(battle_row(2, 1, 2, 1)).await;
        let reader = BattleReader::new(Arc::clone(&store) as Arc<dyn ArenaStore>);

        let ids: Vec<i64> = reader.list().await.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);

        store.fail(StoreOp::ListBattles).await;
        assert!(reader.list().await.is_empty());
    }

    #[tokio::test]
    async fn missing_battle_is_not_found() {
        let reader = BattleReader::new(Arc::new(MemoryStore::new()));
        let result = reader.get(BattleId::new(99)).await;
        assert!(matches!(result, Err(ArenaError::BattleNotFound(_))));
    }

    #[tokio::test]
    async fn stats_zeroed_without_history_or_on_failure() {
        let store = Arc::new(MemoryStore::new());
        let reader = StatsReader::new(Arc::clone(&store) as Arc<dyn ArenaStore>);
        assert_eq!(
            reader.for_member(MemberId::new(1)).await,
            BattleStats::zeroed()
        );

        store.add_battle_row(battle_row(1, 1, 2, 0)).await;
        let stats = reader.for_member(MemberId::new(1)).await;
        assert_eq!(stats.total_battles, 1);
        assert_eq!(stats.currently_winning, 1);

        store.fail(StoreOp::Stats).await;
        assert_eq!(
            reader.for_member(MemberId::new(1)).await,
            BattleStats::zeroed()
        );
    }

    #[test]
    fn category_filter_parsing() {
        assert_eq!(CategoryFilter::parse(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("ALL")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(Some("Intuition OG")),
            CategoryFilter::Only(MemberCategory::IntuitionOg)
        );
    }
}
