//! Chain layer: staking and atom creation behind the [`ChainClient`] trait.
//!
//! Deposits are made against a member's on-chain atom. The contract
//! itself lives outside this service; [`simulated::SimulatedChain`] is
//! the client used when no RPC-backed implementation is wired in.

pub mod simulated;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{StakeAmount, WalletAddress};
use crate::error::ArenaError;

pub use simulated::SimulatedChain;

/// Proof that a deposit was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeReceipt {
    /// Transaction hash.
    pub tx_hash: String,
}

/// Data describing a new atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtomData {
    /// Atom name.
    pub name: String,
    /// Atom description.
    pub description: String,
    /// Image reference.
    pub image: String,
    /// Optional website.
    pub url: Option<String>,
}

/// Wallet-backed chain client.
///
/// Calls are asynchronous and may fail for wallet rejection, network
/// mismatch, or RPC errors; all of those surface as
/// [`ArenaError::ChainError`].
#[async_trait]
pub trait ChainClient: Send + Sync + std::fmt::Debug {
    /// Deposits `amount` from `staker` into the vault for `atom_id`.
    async fn deposit(
        &self,
        staker: &WalletAddress,
        atom_id: &str,
        amount: StakeAmount,
    ) -> Result<StakeReceipt, ArenaError>;

    /// Creates an atom for `creator` and returns its id.
    async fn create_atom(
        &self,
        creator: &WalletAddress,
        atom: &AtomData,
    ) -> Result<String, ArenaError>;
}
