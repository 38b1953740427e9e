//! Per-connection subscription manager.
//!
//! Tracks which battles a WebSocket client follows and which wallet it
//! speaks for, and filters events server-side.

use std::collections::HashSet;

use crate::domain::{ArenaEvent, BattleId, WalletAddress};

use super::messages::Selection;

/// Manages the subscriptions of a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Followed battles. Ignored when `subscribe_all` is set.
    battle_ids: HashSet<BattleId>,
    /// Whether the client follows every battle (wildcard `"*"`).
    subscribe_all: bool,
    /// Wallet whose personal notifications are delivered.
    wallet: Option<WalletAddress>,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds selections to the subscription set.
    pub fn subscribe(&mut self, selections: &[Selection]) {
        for selection in selections {
            match selection {
                Selection::All => self.subscribe_all = true,
                Selection::Battle(id) => {
                    self.battle_ids.insert(*id);
                }
            }
        }
    }

    /// Removes battles from the subscription set. `"*"` clears the
    /// wildcard.
    pub fn unsubscribe(&mut self, selections: &[Selection]) {
        for selection in selections {
            match selection {
                Selection::All => self.subscribe_all = false,
                Selection::Battle(id) => {
                    self.battle_ids.remove(id);
                }
            }
        }
    }

    /// Sets the wallet this connection receives notifications for.
    pub fn identify(&mut self, wallet: WalletAddress) {
        self.wallet = Some(wallet);
    }

    /// Returns `true` if `event` should be forwarded to this client.
    ///
    /// Notifications addressed to a wallet reach only that wallet.
    /// Events without a battle need the wildcard.
    #[must_use]
    pub fn matches(&self, event: &ArenaEvent) -> bool {
        if let ArenaEvent::Notification(n) = event
            && let Some(recipient) = &n.wallet
        {
            return self.wallet.as_ref() == Some(recipient);
        }
        match event.battle_id() {
            Some(id) => self.subscribe_all || self.battle_ids.contains(&id),
            None => self.subscribe_all,
        }
    }

    /// Returns the number of explicitly followed battles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.battle_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
