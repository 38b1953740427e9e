//! Arena service: battle and member creation.
//!
//! Every action is gated on the connected wallet and emits an
//! [`ArenaEvent`] plus a notification on success. Member creation makes
//! the on-chain atom first and only then writes the record. Members are
//! edited and deactivated by admins, never deleted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::admin_gate::AdminGate;
use super::readers::{BattleReader, map_member};
use crate::chain::{AtomData, ChainClient};
use crate::domain::countdown::spawn_expiry_watch;
use crate::domain::{
    ArenaEvent, Battle, EventBus, Member, MemberId, MemberUpdate, NewBattle, NewMember,
    Notification, NotificationVariant, WalletAddress,
};
use crate::error::ArenaError;
use crate::store::{ArenaStore, MemberRow};

/// Unvalidated battle creation input.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleDraft {
    /// Title; trimmed and required.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Side A member.
    pub member_a: MemberId,
    /// Side B member.
    pub member_b: MemberId,
    /// Optional end time, which must lie in the future.
    pub end_time: Option<DateTime<Utc>>,
}

/// What a wallet may do with members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MemberQuota {
    /// Wallet is on the admin allow-list.
    pub is_admin: bool,
    /// Members the wallet has created.
    pub members_created: i64,
    /// Per-wallet limit for non-admins.
    pub limit: i64,
    /// Whether another member may be created now.
    pub can_create: bool,
}

/// Orchestrates battle and member creation.
#[derive(Debug, Clone)]
pub struct ArenaService {
    store: Arc<dyn ArenaStore>,
    chain: Arc<dyn ChainClient>,
    admin_gate: AdminGate,
    battles: BattleReader,
    event_bus: EventBus,
    max_members_per_wallet: i64,
}

impl ArenaService {
    /// Creates a new `ArenaService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ArenaStore>,
        chain: Arc<dyn ChainClient>,
        event_bus: EventBus,
        max_members_per_wallet: i64,
    ) -> Self {
        Self {
            admin_gate: AdminGate::new(Arc::clone(&store)),
            battles: BattleReader::new(Arc::clone(&store)),
            store,
            chain,
            event_bus,
            max_members_per_wallet,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Creates a battle. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::WalletNotConnected`] or
    /// [`ArenaError::Forbidden`] for a non-admin,
    /// [`ArenaError::InvalidRequest`] for a blank title, identical sides,
    /// or a past end time, [`ArenaError::MemberNotFound`] for an unknown
    /// or inactive member, and [`ArenaError::StoreError`] if a store call
    /// fails.
    pub async fn create_battle(
        &self,
        wallet: Option<&WalletAddress>,
        draft: BattleDraft,
        now: DateTime<Utc>,
    ) -> Result<Battle, ArenaError> {
        self.admin_gate
            .require_admin(wallet, "create battles")
            .await?;
        let Some(creator) = wallet else {
            return Err(ArenaError::WalletNotConnected);
        };

        let new_battle = self.validate_battle(draft, now).await?;
        let battle_id = self.store.insert_battle(&new_battle, creator).await?;
        let battle = self.battles.get(battle_id).await?;

        if let Some(end_time) = battle.end_time {
            let _watch = spawn_expiry_watch(self.event_bus.clone(), battle_id, end_time);
        }

        let _ = self.event_bus.publish(ArenaEvent::BattleCreated {
            battle_id,
            title: battle.title.clone(),
            member_a: battle.member_a.id,
            member_b: battle.member_b.id,
            timestamp: Utc::now(),
        });
        let _ = self.event_bus.notify(
            Notification::new(
                NotificationVariant::Success,
                "Battle Created!",
                format!("{} vs {}", battle.member_a.name, battle.member_b.name),
            )
            .for_wallet(creator)
            .for_battle(battle_id),
        );

        tracing::info!(%battle_id, %creator, title = %battle.title, "battle created");
        Ok(battle)
    }

    /// Creates a member backed by a new on-chain atom.
    ///
    /// Admins are unlimited; other wallets may create up to the
    /// configured limit. A failed permission lookup denies.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::WalletNotConnected`] without a wallet,
    /// [`ArenaError::InvalidRequest`] for a missing name or image,
    /// [`ArenaError::Forbidden`] once the limit is reached,
    /// [`ArenaError::ChainError`] if the atom cannot be created, and
    /// [`ArenaError::StoreError`] if the record cannot be written.
    pub async fn create_member(
        &self,
        wallet: Option<&WalletAddress>,
        mut draft: NewMember,
    ) -> Result<Member, ArenaError> {
        let Some(creator) = wallet else {
            return Err(ArenaError::WalletNotConnected);
        };

        draft.name = draft.name.trim().to_string();
        draft.image = draft.image.trim().to_string();
        if draft.name.is_empty() {
            return Err(ArenaError::InvalidRequest("name is required".to_string()));
        }
        if draft.image.is_empty() {
            return Err(ArenaError::InvalidRequest("image is required".to_string()));
        }

        let quota = self.member_quota(creator).await;
        if !quota.can_create {
            return Err(ArenaError::Forbidden(format!(
                "member limit of {} reached",
                quota.limit
            )));
        }

        let atom = AtomData {
            name: draft.name.clone(),
            description: draft.description.clone(),
            image: draft.image.clone(),
            url: draft.url.clone(),
        };
        let atom_id = self.chain.create_atom(creator, &atom).await?;
        let member_id = match self.store.insert_member(&draft, &atom_id, creator).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(%creator, %atom_id, error = %e, "atom created but member not stored");
                return Err(e);
            }
        };

        let now = Utc::now();
        let member = map_member(MemberRow {
            id: member_id.get(),
            atomid: Some(atom_id),
            name: Some(draft.name),
            description: Some(draft.description),
            image: Some(draft.image.clone()),
            category: Some(draft.category.as_str().to_string()),
            avatar_url: Some(draft.image),
            total_votes: Some(0),
            is_active: Some(true),
            created_at: Some(now),
        });

        let _ = self.event_bus.publish(ArenaEvent::MemberCreated {
            member_id,
            name: member.name.clone(),
            timestamp: now,
        });
        let _ = self.event_bus.notify(
            Notification::new(
                NotificationVariant::Success,
                "Member created",
                format!("{} joined the arena", member.name),
            )
            .for_wallet(creator),
        );

        tracing::info!(%member_id, %creator, name = %member.name, "member created");
        Ok(member)
    }

    /// Edits a member. Admin only.
    ///
    /// Deactivating (`is_active: Some(false)`) hides the member from the
    /// directory; battles that already reference it are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::WalletNotConnected`] or
    /// [`ArenaError::Forbidden`] for a non-admin,
    /// [`ArenaError::InvalidRequest`] for an empty edit or a blank name,
    /// [`ArenaError::MemberNotFound`] for an unknown id, and
    /// [`ArenaError::StoreError`] if the write fails.
    pub async fn update_member(
        &self,
        wallet: Option<&WalletAddress>,
        member_id: MemberId,
        mut update: MemberUpdate,
    ) -> Result<Member, ArenaError> {
        self.admin_gate.require_admin(wallet, "edit members").await?;
        let Some(editor) = wallet else {
            return Err(ArenaError::WalletNotConnected);
        };

        if update.is_empty() {
            return Err(ArenaError::InvalidRequest("nothing to update".to_string()));
        }
        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(ArenaError::InvalidRequest("name is required".to_string()));
            }
        }
        if let Some(avatar_url) = update.avatar_url.as_mut() {
            *avatar_url = avatar_url.trim().to_string();
        }

        let Some(row) = self.store.update_member(member_id, &update).await? else {
            return Err(ArenaError::MemberNotFound(member_id));
        };
        let member = map_member(row);

        let _ = self.event_bus.publish(ArenaEvent::MemberUpdated {
            member_id,
            name: member.name.clone(),
            is_active: member.is_active,
            timestamp: Utc::now(),
        });
        let _ = self.event_bus.notify(
            Notification::new(
                NotificationVariant::Success,
                "Member updated",
                format!("{} has been updated successfully", member.name),
            )
            .for_wallet(editor),
        );

        tracing::info!(%member_id, %editor, is_active = member.is_active, "member updated");
        Ok(member)
    }

    /// Reports whether `wallet` is an admin and how many members it may
    /// still create. Lookup failures deny.
    pub async fn member_quota(&self, wallet: &WalletAddress) -> MemberQuota {
        let is_admin = self.admin_gate.is_admin(Some(wallet)).await;
        let members_created = match self.store.member_count_by_wallet(wallet).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(%wallet, error = %e, "member count lookup failed");
                None
            }
        };
        let can_create = is_admin
            || members_created.is_some_and(|count| count < self.max_members_per_wallet);

        MemberQuota {
            is_admin,
            members_created: members_created.unwrap_or(0),
            limit: self.max_members_per_wallet,
            can_create,
        }
    }

    async fn validate_battle(
        &self,
        draft: BattleDraft,
        now: DateTime<Utc>,
    ) -> Result<NewBattle, ArenaError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ArenaError::InvalidRequest("title is required".to_string()));
        }
        if draft.member_a == draft.member_b {
            return Err(ArenaError::InvalidRequest(
                "a battle needs two different members".to_string(),
            ));
        }
        if let Some(end) = draft.end_time
            && end <= now
        {
            return Err(ArenaError::InvalidRequest(
                "end time must be in the future".to_string(),
            ));
        }

        let members = self.store.list_active_members().await?;
        for id in [draft.member_a, draft.member_b] {
            if !members.iter().any(|m| m.id == id.get()) {
                return Err(ArenaError::MemberNotFound(id));
            }
        }

        Ok(NewBattle {
            title,
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            member_a: draft.member_a,
            member_b: draft.member_b,
            start_time: now,
            end_time: draft.end_time,
        })
    }
}
