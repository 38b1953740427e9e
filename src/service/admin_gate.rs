//! Admin gate: decides whether a wallet may use admin-only actions.

use std::sync::Arc;

use crate::domain::WalletAddress;
use crate::error::ArenaError;
use crate::store::ArenaStore;

/// Asks the store's allow-list on every call. Fails closed.
#[derive(Debug, Clone)]
pub struct AdminGate {
    store: Arc<dyn ArenaStore>,
}

impl AdminGate {
    /// Creates a gate over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ArenaStore>) -> Self {
        Self { store }
    }

    /// Returns `true` only if `wallet` is connected and on the allow-list.
    /// A failed lookup counts as not admin.
    pub async fn is_admin(&self, wallet: Option<&WalletAddress>) -> bool {
        let Some(wallet) = wallet else {
            return false;
        };
        match self.store.is_admin_wallet(wallet).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                tracing::warn!(%wallet, error = %e, "admin lookup failed, denying");
                false
            }
        }
    }

    /// Requires admin rights for `action`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::WalletNotConnected`] without a wallet, or
    /// [`ArenaError::Forbidden`] if the wallet is not an admin.
    pub async fn require_admin(
        &self,
        wallet: Option<&WalletAddress>,
        action: &str,
    ) -> Result<(), ArenaError> {
        if wallet.is_none() {
            return Err(ArenaError::WalletNotConnected);
        }
        if self.is_admin(wallet).await {
            Ok(())
        } else {
            Err(ArenaError::Forbidden(format!("only admins can {action}")))
        }
    }
}
