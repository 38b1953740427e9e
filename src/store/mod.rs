//! Store layer: the external database behind the [`ArenaStore`] trait.
//!
//! The store owns every record and enforces the (battle, wallet) vote
//! uniqueness constraint. Two implementations are provided:
//! [`postgres::PostgresStore`] over `sqlx::PgPool`, and
//! [`memory::MemoryStore`] for local runs and tests.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{
    BattleId, BattleSide, BattleStats, MemberId, MemberUpdate, NewBattle, NewMember,
    VoteCounters, WalletAddress,
};
use crate::error::ArenaError;

pub use memory::MemoryStore;
pub use models::{BattleRow, JoinedBattleRow, MemberRow, VoteRecord};
pub use postgres::PostgresStore;

/// Contract for the hosted store.
///
/// Every method is one external call. Implementations must:
/// - return members ordered by `total_votes` descending, active only;
/// - return battles ordered by `created_at` descending, with a `None`
///   member wherever the join found nothing;
/// - map a (battle, wallet) uniqueness violation on
///   [`ArenaStore::insert_vote`] to [`ArenaError::DuplicateVote`] and
///   every other failure to [`ArenaError::StoreError`].
#[async_trait]
pub trait ArenaStore: Send + Sync + std::fmt::Debug {
    /// Active members, most voted first.
    async fn list_active_members(&self) -> Result<Vec<MemberRow>, ArenaError>;

    /// All battles with both members joined, newest first.
    async fn list_battles(&self) -> Result<Vec<JoinedBattleRow>, ArenaError>;

    /// A single battle with both members joined.
    async fn fetch_battle(&self, battle_id: BattleId)
    -> Result<Option<JoinedBattleRow>, ArenaError>;

    /// Looks up the vote `wallet` cast in `battle_id`, if any.
    async fn find_vote(
        &self,
        battle_id: BattleId,
        wallet: &WalletAddress,
    ) -> Result<Option<VoteRecord>, ArenaError>;

    /// Inserts a vote record.
    async fn insert_vote(&self, vote: &VoteRecord) -> Result<(), ArenaError>;

    /// Reads the battle's current counters.
    async fn read_counters(&self, battle_id: BattleId) -> Result<VoteCounters, ArenaError>;

    /// Writes `side`'s counter and the total from `counters`.
    async fn update_counters(
        &self,
        battle_id: BattleId,
        side: BattleSide,
        counters: VoteCounters,
    ) -> Result<(), ArenaError>;

    /// Allow-list lookup for admin wallets.
    async fn is_admin_wallet(&self, wallet: &WalletAddress) -> Result<bool, ArenaError>;

    /// Number of members created by `wallet`.
    async fn member_count_by_wallet(&self, wallet: &WalletAddress) -> Result<i64, ArenaError>;

    /// Aggregate battle history for a member. `None` when the aggregate
    /// returns no row.
    async fn member_battle_stats(
        &self,
        member_id: MemberId,
    ) -> Result<Option<BattleStats>, ArenaError>;

    /// Inserts a battle with zeroed counters and returns its id.
    async fn insert_battle(
        &self,
        battle: &NewBattle,
        created_by: &WalletAddress,
    ) -> Result<BattleId, ArenaError>;

    /// Inserts an active member with zero votes and returns its id.
    async fn insert_member(
        &self,
        member: &NewMember,
        atom_id: &str,
        created_by: &WalletAddress,
    ) -> Result<MemberId, ArenaError>;

    /// Applies `update` to a member of any status and returns the row as
    /// stored afterwards. `None` when no member has that id.
    async fn update_member(
        &self,
        member_id: MemberId,
        update: &MemberUpdate,
    ) -> Result<Option<MemberRow>, ArenaError>;
}
