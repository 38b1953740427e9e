//! Domain events and user-facing notifications.
//!
//! Every state change publishes an [`ArenaEvent`] through the
//! [`super::EventBus`]. Notifications (toasts) ride the same bus instead
//! of a process-wide listener list; a client sees them by subscribing
//! over the WebSocket stream and stops seeing them when it disconnects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{BattleId, BattleSide, MemberId, VoteCounters, WalletAddress};

/// Visual variant of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
}

/// A toast addressed to one wallet, or to everyone when `wallet` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Unique id.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Visual variant.
    pub variant: NotificationVariant,
    /// Recipient wallet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletAddress>,
    /// Battle the notification is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battle_id: Option<BattleId>,
}

impl Notification {
    /// Creates a notification with a fresh id.
    #[must_use]
    pub fn new(
        variant: NotificationVariant,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            variant,
            wallet: None,
            battle_id: None,
        }
    }

    /// Addresses the notification to `wallet`.
    #[must_use]
    pub fn for_wallet(mut self, wallet: &WalletAddress) -> Self {
        self.wallet = Some(wallet.clone());
        self
    }

    /// Tags the notification with a battle.
    #[must_use]
    pub const fn for_battle(mut self, battle_id: BattleId) -> Self {
        self.battle_id = Some(battle_id);
        self
    }
}

/// Domain event emitted after every state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ArenaEvent {
    /// A new battle was created.
    BattleCreated {
        /// Battle identifier.
        battle_id: BattleId,
        /// Battle title.
        title: String,
        /// Side A member.
        member_a: MemberId,
        /// Side B member.
        member_b: MemberId,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A new member was added to the directory.
    MemberCreated {
        /// Member identifier.
        member_id: MemberId,
        /// Member name.
        name: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An admin edited a member.
    MemberUpdated {
        /// Member identifier.
        member_id: MemberId,
        /// Member name after the edit.
        name: String,
        /// Whether the member is still listed.
        is_active: bool,
        /// Edit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A vote was committed and counters reconciled.
    VoteRecorded {
        /// Battle identifier.
        battle_id: BattleId,
        /// Side that received the vote.
        side: BattleSide,
        /// Counters after the vote.
        counters: VoteCounters,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A battle's end time passed.
    BattleExpired {
        /// Battle identifier.
        battle_id: BattleId,
        /// Expiry timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user-facing notification.
    Notification(Notification),
}

impl ArenaEvent {
    /// Returns the battle this event concerns, if any.
    #[must_use]
    pub fn battle_id(&self) -> Option<BattleId> {
        match self {
            Self::BattleCreated { battle_id, .. }
            | Self::VoteRecorded { battle_id, .. }
            | Self::BattleExpired { battle_id, .. } => Some(*battle_id),
            Self::MemberCreated { .. } | Self::MemberUpdated { .. } => None,
            Self::Notification(n) => n.battle_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BattleCreated { .. } => "battle_created",
            Self::MemberCreated { .. } => "member_created",
            Self::MemberUpdated { .. } => "member_updated",
            Self::VoteRecorded { .. } => "vote_recorded",
            Self::BattleExpired { .. } => "battle_expired",
            Self::Notification(_) => "notification",
        }
    }
}
