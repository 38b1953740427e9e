//! In-memory store for local runs and tests.
//!
//! Mirrors the hosted schema's behavior: the (battle, wallet) uniqueness
//! constraint, the per-side counter columns, and the stats aggregate.
//! Every operation is counted, and any operation can be made to fail, so
//! tests can assert exactly which external calls a flow performed.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::ArenaStore;
use super::models::{BattleRow, JoinedBattleRow, MemberRow, VoteRecord};
use crate::domain::{
    BattleId, BattleSide, BattleStats, MemberId, MemberUpdate, NewBattle, NewMember,
    VoteCounters, WalletAddress,
};
use crate::error::ArenaError;

/// Store operations, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// [`ArenaStore::list_active_members`].
    ListMembers,
    /// [`ArenaStore::list_battles`].
    ListBattles,
    /// [`ArenaStore::fetch_battle`].
    FetchBattle,
    /// [`ArenaStore::find_vote`].
    FindVote,
    /// [`ArenaStore::insert_vote`].
    InsertVote,
    /// [`ArenaStore::read_counters`].
    ReadCounters,
    /// [`ArenaStore::update_counters`].
    UpdateCounters,
    /// [`ArenaStore::is_admin_wallet`].
    IsAdmin,
    /// [`ArenaStore::member_count_by_wallet`].
    MemberCount,
    /// [`ArenaStore::member_battle_stats`].
    Stats,
    /// [`ArenaStore::insert_battle`].
    InsertBattle,
    /// [`ArenaStore::insert_member`].
    InsertMember,
    /// [`ArenaStore::update_member`].
    UpdateMember,
}

#[derive(Debug, Default)]
struct MemoryState {
    members: Vec<MemberRow>,
    battles: Vec<BattleRow>,
    votes: HashMap<(BattleId, WalletAddress), MemberId>,
    admins: HashSet<WalletAddress>,
    creators: HashMap<WalletAddress, i64>,
    failing: HashSet<StoreOp>,
    calls: HashMap<StoreOp, usize>,
}

impl MemoryState {
    fn enter(&mut self, op: StoreOp) -> Result<(), ArenaError> {
        let calls = self.calls.entry(op).or_insert(0);
        *calls = calls.saturating_add(1);
        if self.failing.contains(&op) {
            return Err(ArenaError::StoreError(format!("{op:?} unavailable")));
        }
        Ok(())
    }

    fn member(&self, id: i64) -> Option<MemberRow> {
        self.members.iter().find(|m| m.id == id).cloned()
    }

    fn join(&self, battle: &BattleRow) -> JoinedBattleRow {
        JoinedBattleRow {
            battle: battle.clone(),
            member_a: self.member(battle.member1_id),
            member_b: self.member(battle.member2_id),
        }
    }

    fn battle_mut(&mut self, id: BattleId) -> Result<&mut BattleRow, ArenaError> {
        self.battles
            .iter_mut()
            .find(|b| b.id == id.get())
            .ok_or(ArenaError::BattleNotFound(id))
    }

    fn next_member_id(&self) -> i64 {
        self.members
            .iter()
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    fn next_battle_id(&self) -> i64 {
        self.battles
            .iter()
            .map(|b| b.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

/// Store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member row verbatim.
    pub async fn add_member_row(&self, row: MemberRow) {
        self.state.write().await.members.push(row);
    }

    /// Removes a member row, leaving battles that reference it dangling.
    pub async fn remove_member_row(&self, id: MemberId) {
        self.state
            .write()
            .await
            .members
            .retain(|m| m.id != id.get());
    }

    /// Adds a battle row verbatim.
    pub async fn add_battle_row(&self, row: BattleRow) {
        self.state.write().await.battles.push(row);
    }

    /// Adds a wallet to the admin allow-list.
    pub async fn add_admin(&self, wallet: WalletAddress) {
        self.state.write().await.admins.insert(wallet);
    }

    /// Makes every subsequent call of `op` fail.
    pub async fn fail(&self, op: StoreOp) {
        self.state.write().await.failing.insert(op);
    }

    /// Undoes [`MemoryStore::fail`].
    pub async fn recover(&self, op: StoreOp) {
        self.state.write().await.failing.remove(&op);
    }

    /// Number of times `op` has been called.
    pub async fn calls(&self, op: StoreOp) -> usize {
        self.state
            .read()
            .await
            .calls
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    /// Number of vote records stored.
    pub async fn vote_count(&self) -> usize {
        self.state.read().await.votes.len()
    }

    /// Current raw battle row, bypassing call counting.
    pub async fn battle_row(&self, id: BattleId) -> Option<BattleRow> {
        self.state
            .read()
            .await
            .battles
            .iter()
            .find(|b| b.id == id.get())
            .cloned()
    }
}

#[async_trait]
impl ArenaStore for MemoryStore {
    async fn list_active_members(&self) -> Result<Vec<MemberRow>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::ListMembers)?;
        let mut members: Vec<MemberRow> = state
            .members
            .iter()
            .filter(|m| m.is_active == Some(true))
            .cloned()
            .collect();
        members.sort_by(|a, b| b.total_votes.unwrap_or(0).cmp(&a.total_votes.unwrap_or(0)));
        Ok(members)
    }

    async fn list_battles(&self) -> Result<Vec<JoinedBattleRow>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::ListBattles)?;
        let mut battles: Vec<JoinedBattleRow> =
            state.battles.iter().map(|b| state.join(b)).collect();
        battles.sort_by(|a, b| b.battle.created_at.cmp(&a.battle.created_at));
        Ok(battles)
    }

    async fn fetch_battle(
        &self,
        battle_id: BattleId,
    ) -> Result<Option<JoinedBattleRow>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::FetchBattle)?;
        Ok(state
            .battles
            .iter()
            .find(|b| b.id == battle_id.get())
            .map(|b| state.join(b)))
    }

    async fn find_vote(
        &self,
        battle_id: BattleId,
        wallet: &WalletAddress,
    ) -> Result<Option<VoteRecord>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::FindVote)?;
        Ok(state
            .votes
            .get(&(battle_id, wallet.clone()))
            .map(|member_id| VoteRecord {
                battle_id,
                wallet_address: wallet.clone(),
                voted_for_member_id: *member_id,
            }))
    }

    async fn insert_vote(&self, vote: &VoteRecord) -> Result<(), ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::InsertVote)?;
        let key = (vote.battle_id, vote.wallet_address.clone());
        if state.votes.contains_key(&key) {
            return Err(ArenaError::DuplicateVote(vote.battle_id));
        }
        state.votes.insert(key, vote.voted_for_member_id);
        Ok(())
    }

    async fn read_counters(&self, battle_id: BattleId) -> Result<VoteCounters, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::ReadCounters)?;
        let battle = state.battle_mut(battle_id)?;
        Ok(VoteCounters {
            votes_a: battle.member1_votes.unwrap_or(0),
            votes_b: battle.member2_votes.unwrap_or(0),
            total_votes: battle.total_votes.unwrap_or(0),
        })
    }

    async fn update_counters(
        &self,
        battle_id: BattleId,
        side: BattleSide,
        counters: VoteCounters,
    ) -> Result<(), ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::UpdateCounters)?;
        let battle = state.battle_mut(battle_id)?;
        match side {
            BattleSide::A => battle.member1_votes = Some(counters.votes_a),
            BattleSide::B => battle.member2_votes = Some(counters.votes_b),
        }
        battle.total_votes = Some(counters.total_votes);
        Ok(())
    }

    async fn is_admin_wallet(&self, wallet: &WalletAddress) -> Result<bool, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::IsAdmin)?;
        Ok(state.admins.contains(wallet))
    }

    async fn member_count_by_wallet(&self, wallet: &WalletAddress) -> Result<i64, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::MemberCount)?;
        Ok(state.creators.get(wallet).copied().unwrap_or(0))
    }

    async fn member_battle_stats(
        &self,
        member_id: MemberId,
    ) -> Result<Option<BattleStats>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::Stats)?;
        let id = member_id.get();
        let mut stats = BattleStats::zeroed();
        for battle in state
            .battles
            .iter()
            .filter(|b| b.member1_id == id || b.member2_id == id)
        {
            stats.total_battles = stats.total_battles.saturating_add(1);
            let (own, other) = if battle.member1_id == id {
                (battle.member1_votes, battle.member2_votes)
            } else {
                (battle.member2_votes, battle.member1_votes)
            };
            if battle.is_active == Some(true) {
                stats.active_battles = stats.active_battles.saturating_add(1);
                if own.unwrap_or(0) > other.unwrap_or(0) {
                    stats.currently_winning = stats.currently_winning.saturating_add(1);
                }
            }
            match battle.winner_id {
                Some(winner) if winner == id => {
                    stats.won_battles = stats.won_battles.saturating_add(1);
                }
                Some(_) => stats.lost_battles = stats.lost_battles.saturating_add(1),
                None => {}
            }
        }
        if stats.total_battles == 0 {
            return Ok(None);
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = (stats.won_battles as f64 * 10_000.0 / stats.total_battles as f64).round()
            / 100.0;
        stats.win_percentage = pct;
        Ok(Some(stats))
    }

    async fn insert_battle(
        &self,
        battle: &NewBattle,
        created_by: &WalletAddress,
    ) -> Result<BattleId, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::InsertBattle)?;
        let id = state.next_battle_id();
        tracing::debug!(battle_id = id, %created_by, "memory store: battle inserted");
        state.battles.push(BattleRow {
            id,
            title: Some(battle.title.clone()),
            description: battle.description.clone(),
            member1_id: battle.member_a.get(),
            member2_id: battle.member_b.get(),
            member1_votes: Some(0),
            member2_votes: Some(0),
            total_votes: Some(0),
            is_active: Some(true),
            start_date: Some(battle.start_time),
            end_date: battle.end_time,
            winner_id: None,
            created_at: Utc::now(),
        });
        Ok(BattleId::new(id))
    }

    async fn insert_member(
        &self,
        member: &NewMember,
        atom_id: &str,
        created_by: &WalletAddress,
    ) -> Result<MemberId, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::InsertMember)?;
        let id = state.next_member_id();
        state.members.push(MemberRow {
            id,
            atomid: Some(atom_id.to_string()),
            name: Some(member.name.clone()),
            description: Some(member.description.clone()),
            image: Some(member.image.clone()),
            category: Some(member.category.as_str().to_string()),
            avatar_url: Some(member.image.clone()),
            total_votes: Some(0),
            is_active: Some(true),
            created_at: Some(Utc::now()),
        });
        let created = state.creators.entry(created_by.clone()).or_insert(0);
        *created = created.saturating_add(1);
        Ok(MemberId::new(id))
    }

    async fn update_member(
        &self,
        member_id: MemberId,
        update: &MemberUpdate,
    ) -> Result<Option<MemberRow>, ArenaError> {
        let mut state = self.state.write().await;
        state.enter(StoreOp::UpdateMember)?;
        let Some(row) = state.members.iter_mut().find(|m| m.id == member_id.get()) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            row.name = Some(name.clone());
        }
        if let Some(description) = &update.description {
            row.description = Some(description.clone());
        }
        if let Some(category) = &update.category {
            row.category = Some(category.as_str().to_string());
        }
        if let Some(avatar_url) = &update.avatar_url {
            row.avatar_url = Some(avatar_url.clone());
        }
        if let Some(is_active) = update.is_active {
            row.is_active = Some(is_active);
        }
        Ok(Some(row.clone()))
    }
}
