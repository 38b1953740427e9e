//! Simulated chain client.
//!
//! Accepts deposits and atom creations without touching a network, while
//! still enforcing that the wallet is on the expected chain. Rejections
//! can be switched on to exercise failure paths. Only the most recent
//! [`HISTORY_LIMIT`] deposits and atoms are remembered.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AtomData, ChainClient, StakeReceipt};
use crate::domain::{StakeAmount, WalletAddress};
use crate::error::ArenaError;

/// Number of deposits and atoms kept for inspection.
pub const HISTORY_LIMIT: usize = 256;

/// A deposit the simulated chain accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    /// Staking wallet.
    pub staker: WalletAddress,
    /// Target atom.
    pub atom_id: String,
    /// Amount staked.
    pub amount: StakeAmount,
    /// Receipt handed back.
    pub receipt: StakeReceipt,
}

/// In-process stand-in for the staking contract.
#[derive(Debug)]
pub struct SimulatedChain {
    expected_chain_id: u64,
    wallet_chain_id: u64,
    reject_all: AtomicBool,
    deposits: Mutex<VecDeque<Deposit>>,
    atoms: Mutex<VecDeque<String>>,
}

impl SimulatedChain {
    /// Creates a client whose wallet is connected to `chain_id`.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self::with_wallet_chain(chain_id, chain_id)
    }

    /// Creates a client expecting `expected_chain_id` while the wallet is
    /// connected to `wallet_chain_id`.
    #[must_use]
    pub fn with_wallet_chain(expected_chain_id: u64, wallet_chain_id: u64) -> Self {
        Self {
            expected_chain_id,
            wallet_chain_id,
            reject_all: AtomicBool::new(false),
            deposits: Mutex::new(VecDeque::new()),
            atoms: Mutex::new(VecDeque::new()),
        }
    }

    /// Makes the wallet reject (or stop rejecting) every request.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.reject_all.store(rejecting, Ordering::SeqCst);
    }

    /// Recent deposits, oldest first.
    pub async fn deposits(&self) -> Vec<Deposit> {
        self.deposits.lock().await.iter().cloned().collect()
    }

    /// Recent atoms, oldest first.
    pub async fn atoms(&self) -> Vec<String> {
        self.atoms.lock().await.iter().cloned().collect()
    }

    fn check_wallet(&self) -> Result<(), ArenaError> {
        if self.wallet_chain_id != self.expected_chain_id {
            return Err(ArenaError::ChainError(format!(
                "wallet is on chain {}, switch to chain {}",
                self.wallet_chain_id, self.expected_chain_id
            )));
        }
        if self.reject_all.load(Ordering::SeqCst) {
            return Err(ArenaError::ChainError(
                "user rejected the request".to_string(),
            ));
        }
        Ok(())
    }
}

fn remember<T>(log: &mut VecDeque<T>, entry: T) {
    if log.len() >= HISTORY_LIMIT {
        log.pop_front();
    }
    log.push_back(entry);
}

fn random_hex() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}

#[async_trait]
impl ChainClient for SimulatedChain {
    async fn deposit(
        &self,
        staker: &WalletAddress,
        atom_id: &str,
        amount: StakeAmount,
    ) -> Result<StakeReceipt, ArenaError> {
        self.check_wallet()?;
        if atom_id.is_empty() {
            return Err(ArenaError::ChainError("missing atom id".to_string()));
        }
        let receipt = StakeReceipt {
            tx_hash: random_hex(),
        };
        tracing::info!(%staker, atom_id, %amount, tx = %receipt.tx_hash, "simulated deposit");
        remember(
            &mut *self.deposits.lock().await,
            Deposit {
                staker: staker.clone(),
                atom_id: atom_id.to_string(),
                amount,
                receipt: receipt.clone(),
            },
        );
        Ok(receipt)
    }

    async fn create_atom(
        &self,
        creator: &WalletAddress,
        atom: &AtomData,
    ) -> Result<String, ArenaError> {
        self.check_wallet()?;
        let atom_id = random_hex();
        tracing::info!(%creator, name = %atom.name, %atom_id, "simulated atom created");
        remember(&mut *self.atoms.lock().await, atom_id.clone());
        Ok(atom_id)
    }
}
