//! PostgreSQL implementation of the store.
//!
//! Talks to the hosted schema directly: the `community_members`,
//! `battles`, and `battle_votes` tables plus the `is_admin_wallet`,
//! `get_member_count_by_wallet`, and `get_member_battle_stats` functions.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::ArenaStore;
use super::models::{BattleRow, JoinedBattleRow, MemberRow, VoteRecord};
use crate::config::ArenaConfig;
use crate::domain::{
    BattleId, BattleSide, BattleStats, MemberCategory, MemberId, MemberUpdate, NewBattle,
    NewMember, VoteCounters, WalletAddress,
};
use crate::error::ArenaError;

const MEMBER_COLUMNS: &str = "id::BIGINT AS id, atomid, name, description, image, category, \
     avatar_url, total_votes::BIGINT AS total_votes, is_active, created_at";

const BATTLE_COLUMNS: &str = "id::BIGINT AS id, title, description, \
     member1_id::BIGINT AS member1_id, member2_id::BIGINT AS member2_id, \
     member1_votes::BIGINT AS member1_votes, member2_votes::BIGINT AS member2_votes, \
     total_votes::BIGINT AS total_votes, is_active, start_date, end_date, \
     winner_id::BIGINT AS winner_id, created_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::StoreError`] if the database is unreachable.
    pub async fn connect(config: &ArenaConfig) -> Result<Self, ArenaError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(store_error)?;
        Ok(Self::new(pool))
    }

    async fn members_by_id(&self, ids: Vec<i64>) -> Result<HashMap<i64, MemberRow>, ArenaError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM community_members WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }

    async fn join_members(&self, battles: Vec<BattleRow>) -> Result<Vec<JoinedBattleRow>, ArenaError> {
        let mut ids: Vec<i64> = battles
            .iter()
            .flat_map(|b| [b.member1_id, b.member2_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let members = self.members_by_id(ids).await?;

        Ok(battles
            .into_iter()
            .map(|battle| JoinedBattleRow {
                member_a: members.get(&battle.member1_id).cloned(),
                member_b: members.get(&battle.member2_id).cloned(),
                battle,
            })
            .collect())
    }
}

#[async_trait]
impl ArenaStore for PostgresStore {
    async fn list_active_members(&self) -> Result<Vec<MemberRow>, ArenaError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM community_members \
             WHERE is_active = true ORDER BY total_votes DESC NULLS LAST"
        );
        sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn list_battles(&self) -> Result<Vec<JoinedBattleRow>, ArenaError> {
        let sql = format!("SELECT {BATTLE_COLUMNS} FROM battles ORDER BY created_at DESC");
        let battles = sqlx::query_as::<_, BattleRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        self.join_members(battles).await
    }

    async fn fetch_battle(
        &self,
        battle_id: BattleId,
    ) -> Result<Option<JoinedBattleRow>, ArenaError> {
        let sql = format!("SELECT {BATTLE_COLUMNS} FROM battles WHERE id = $1");
        let battle = sqlx::query_as::<_, BattleRow>(&sql)
            .bind(battle_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        match battle {
            Some(battle) => Ok(self.join_members(vec![battle]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn find_vote(
        &self,
        battle_id: BattleId,
        wallet: &WalletAddress,
    ) -> Result<Option<VoteRecord>, ArenaError> {
        let voted_for = sqlx::query_scalar::<_, i64>(
            "SELECT voted_for_member_id::BIGINT FROM battle_votes \
             WHERE battle_id = $1 AND wallet_address = $2",
        )
        .bind(battle_id.get())
        .bind(wallet.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(voted_for.map(|member_id| VoteRecord {
            battle_id,
            wallet_address: wallet.clone(),
            voted_for_member_id: MemberId::new(member_id),
        }))
    }

    async fn insert_vote(&self, vote: &VoteRecord) -> Result<(), ArenaError> {
        sqlx::query(
            "INSERT INTO battle_votes (battle_id, wallet_address, voted_for_member_id) \
             VALUES ($1, $2, $3)",
        )
        .bind(vote.battle_id.get())
        .bind(vote.wallet_address.as_str())
        .bind(vote.voted_for_member_id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                ArenaError::DuplicateVote(vote.battle_id)
            } else {
                store_error(e)
            }
        })?;
        Ok(())
    }

    async fn read_counters(&self, battle_id: BattleId) -> Result<VoteCounters, ArenaError> {
        let row = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COALESCE(member1_votes, 0)::BIGINT, COALESCE(member2_votes, 0)::BIGINT, \
             COALESCE(total_votes, 0)::BIGINT FROM battles WHERE id = $1",
        )
        .bind(battle_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .ok_or(ArenaError::BattleNotFound(battle_id))?;

        Ok(VoteCounters {
            votes_a: row.0,
            votes_b: row.1,
            total_votes: row.2,
        })
    }

    async fn update_counters(
        &self,
        battle_id: BattleId,
        side: BattleSide,
        counters: VoteCounters,
    ) -> Result<(), ArenaError> {
        let sql = match side {
            BattleSide::A => {
                "UPDATE battles SET member1_votes = $2, total_votes = $3, updated_at = now() \
                 WHERE id = $1"
            }
            BattleSide::B => {
                "UPDATE battles SET member2_votes = $2, total_votes = $3, updated_at = now() \
                 WHERE id = $1"
            }
        };
        let result = sqlx::query(sql)
            .bind(battle_id.get())
            .bind(counters.for_side(side))
            .bind(counters.total_votes)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(ArenaError::BattleNotFound(battle_id));
        }
        Ok(())
    }

    async fn is_admin_wallet(&self, wallet: &WalletAddress) -> Result<bool, ArenaError> {
        let is_admin = sqlx::query_scalar::<_, Option<bool>>("SELECT is_admin_wallet($1)")
            .bind(wallet.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(is_admin == Some(true))
    }

    async fn member_count_by_wallet(&self, wallet: &WalletAddress) -> Result<i64, ArenaError> {
        let count = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT get_member_count_by_wallet($1)::BIGINT",
        )
        .bind(wallet.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(count.unwrap_or(0))
    }

    async fn member_battle_stats(
        &self,
        member_id: MemberId,
    ) -> Result<Option<BattleStats>, ArenaError> {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64, i64, f64)>(
            "SELECT total_battles::BIGINT, won_battles::BIGINT, lost_battles::BIGINT, \
             active_battles::BIGINT, currently_winning::BIGINT, win_percentage::FLOAT8 \
             FROM get_member_battle_stats($1)",
        )
        .bind(member_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(
            |(total, won, lost, active, winning, pct)| BattleStats {
                total_battles: total,
                won_battles: won,
                lost_battles: lost,
                active_battles: active,
                currently_winning: winning,
                win_percentage: pct,
            },
        ))
    }

    async fn insert_battle(
        &self,
        battle: &NewBattle,
        created_by: &WalletAddress,
    ) -> Result<BattleId, ArenaError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO battles (title, description, member1_id, member2_id, member1_votes, \
             member2_votes, total_votes, is_active, start_date, end_date, created_by) \
             VALUES ($1, $2, $3, $4, 0, 0, 0, true, $5, $6, $7) RETURNING id::BIGINT",
        )
        .bind(&battle.title)
        .bind(battle.description.as_deref())
        .bind(battle.member_a.get())
        .bind(battle.member_b.get())
        .bind(battle.start_time)
        .bind(battle.end_time)
        .bind(created_by.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(BattleId::new(id))
    }

    async fn insert_member(
        &self,
        member: &NewMember,
        atom_id: &str,
        created_by: &WalletAddress,
    ) -> Result<MemberId, ArenaError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO community_members (atomid, name, description, image, category, \
             avatar_url, total_votes, upvotes, downvotes, is_active, created_by) \
             VALUES ($1, $2, $3, $4, $5, $4, 0, 0, 0, true, $6) RETURNING id::BIGINT",
        )
        .bind(atom_id)
        .bind(&member.name)
        .bind(&member.description)
        .bind(&member.image)
        .bind(member.category.as_str())
        .bind(created_by.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(MemberId::new(id))
    }

    async fn update_member(
        &self,
        member_id: MemberId,
        update: &MemberUpdate,
    ) -> Result<Option<MemberRow>, ArenaError> {
        let sql = format!(
            "UPDATE community_members SET name = COALESCE($2, name), \
             description = COALESCE($3, description), category = COALESCE($4, category), \
             avatar_url = COALESCE($5, avatar_url), is_active = COALESCE($6, is_active), \
             updated_at = now() WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, MemberRow>(&sql)
            .bind(member_id.get())
            .bind(update.name.as_deref())
            .bind(update.description.as_deref())
            .bind(update.category.as_ref().map(MemberCategory::as_str))
            .bind(update.avatar_url.as_deref())
            .bind(update.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }
}

fn store_error(e: sqlx::Error) -> ArenaError {
    ArenaError::StoreError(e.to_string())
}
