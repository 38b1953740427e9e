//! Vote/stake flow: one voter, one battle, one stake-backed vote.
//!
//! A [`VoteSession`] walks through
//!
//! ```text
//! Idle -> CheckingEligibility -> AwaitingStakeInput -> Staking
//!      -> SubmittingVote -> Reconciling -> Settled(Voted | Error)
//! ```
//!
//! [`VoteFlow`] drives the transitions. Precondition failures never reach
//! the store or the chain. Inside one run the order is always stake,
//! then vote insert, then counter read and update. Nothing is retried
//! automatically; after an error the voter triggers again.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::chain::{ChainClient, StakeReceipt};
use crate::domain::{
    ArenaEvent, Battle, BattleSide, EventBus, MemberId, Notification, NotificationVariant,
    StakeAmount, VoteCounters, VotingWindow, WalletAddress,
};
use crate::error::ArenaError;
use crate::store::{ArenaStore, VoteRecord};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The wallet has a vote on this battle. `member_id` is `None` only
    /// when a duplicate was detected and the recorded side could not be
    /// read back.
    Voted {
        /// Member the recorded vote went to.
        member_id: Option<MemberId>,
    },
    /// The run failed; the voter may trigger again.
    Error {
        /// User-facing message.
        message: String,
    },
}

/// Position of a session in the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteState {
    /// Nothing selected.
    Idle,
    /// Looking up an existing vote for the wallet.
    CheckingEligibility,
    /// A member is chosen and the stake amount is being collected.
    AwaitingStakeInput {
        /// Chosen member.
        member_id: MemberId,
        /// Side of the chosen member.
        side: BattleSide,
    },
    /// Stake submitted to the chain.
    Staking {
        /// Side being staked on.
        side: BattleSide,
        /// Validated amount.
        amount: StakeAmount,
    },
    /// Vote record being inserted.
    SubmittingVote {
        /// Side being voted for.
        side: BattleSide,
    },
    /// Counters being re-read and written back.
    Reconciling {
        /// Side being voted for.
        side: BattleSide,
    },
    /// Terminal state.
    Settled(Settlement),
}

impl VoteState {
    /// Returns `true` while an external call is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::CheckingEligibility
                | Self::Staking { .. }
                | Self::SubmittingVote { .. }
                | Self::Reconciling { .. }
        )
    }
}

/// Whether the connected wallet may vote right now, and why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// No wallet connected.
    ConnectWallet,
    /// The wallet already voted.
    AlreadyVoted {
        /// Member the vote went to, when known.
        member_id: Option<MemberId>,
    },
    /// The battle is not active.
    Inactive,
    /// The end time has passed.
    Expired,
    /// Voting allowed.
    Open,
}

impl Eligibility {
    /// Caption for the vote button.
    #[must_use]
    pub const fn caption(&self) -> &'static str {
        match self {
            Self::ConnectWallet => "Connect Wallet",
            Self::AlreadyVoted { .. } => "Already Voted",
            Self::Inactive | Self::Expired => "Expired",
            Self::Open => "Vote",
        }
    }

    /// Returns `true` if a vote may be triggered.
    #[must_use]
    pub const fn can_vote(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Per-voter, per-battle flow state.
#[derive(Debug, Clone)]
pub struct VoteSession {
    battle: Battle,
    wallet: Option<WalletAddress>,
    voted_for: Option<MemberId>,
    has_voted: bool,
    state: VoteState,
}

impl VoteSession {
    fn new(battle: Battle, wallet: Option<WalletAddress>) -> Self {
        Self {
            battle,
            wallet,
            voted_for: None,
            has_voted: false,
            state: VoteState::Idle,
        }
    }

    /// Current battle snapshot.
    #[must_use]
    pub const fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Connected wallet.
    #[must_use]
    pub const fn wallet(&self) -> Option<&WalletAddress> {
        self.wallet.as_ref()
    }

    /// Member this wallet voted for, when known.
    #[must_use]
    pub const fn voted_for(&self) -> Option<MemberId> {
        self.voted_for
    }

    /// Returns `true` once a vote record exists for this wallet.
    #[must_use]
    pub const fn has_voted(&self) -> bool {
        self.has_voted
    }

    /// Current flow state.
    #[must_use]
    pub const fn state(&self) -> &VoteState {
        &self.state
    }

    /// Evaluates eligibility at `now`, without any external call.
    #[must_use]
    pub fn eligibility(&self, now: DateTime<Utc>) -> Eligibility {
        if self.wallet.is_none() {
            return Eligibility::ConnectWallet;
        }
        if self.has_voted {
            return Eligibility::AlreadyVoted {
                member_id: self.voted_for,
            };
        }
        match self.battle.voting_window(now) {
            VotingWindow::Inactive => Eligibility::Inactive,
            VotingWindow::Expired => Eligibility::Expired,
            VotingWindow::Open => Eligibility::Open,
        }
    }

    /// Abandons stake input. Only allowed while awaiting the amount;
    /// returns `false` in any other state.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, VoteState::AwaitingStakeInput { .. }) {
            self.transition(VoteState::Idle);
            true
        } else {
            false
        }
    }

    fn transition(&mut self, next: VoteState) {
        tracing::debug!(
            battle_id = %self.battle.id,
            from = ?self.state,
            to = ?next,
            "vote flow transition"
        );
        self.state = next;
    }

    fn mark_voted(&mut self, member_id: Option<MemberId>) {
        self.has_voted = true;
        self.voted_for = member_id;
    }
}

/// Result of a completed stake submission.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// The vote was recorded and counters reconciled.
    Recorded {
        /// Snapshot carrying the counters just written.
        battle: Battle,
        /// Stake receipt.
        receipt: StakeReceipt,
    },
    /// A vote for this wallet already existed; nothing was counted.
    AlreadyVoted {
        /// Member the existing vote went to, when it could be read.
        member_id: Option<MemberId>,
    },
}

/// Drives [`VoteSession`]s against the store and the chain.
#[derive(Debug, Clone)]
pub struct VoteFlow {
    store: Arc<dyn ArenaStore>,
    chain: Arc<dyn ChainClient>,
    event_bus: EventBus,
    min_stake: Decimal,
    token_symbol: String,
}

impl VoteFlow {
    /// Creates a flow driver.
    #[must_use]
    pub fn new(
        store: Arc<dyn ArenaStore>,
        chain: Arc<dyn ChainClient>,
        event_bus: EventBus,
        min_stake: Decimal,
        token_symbol: impl Into<String>,
    ) -> Self {
        Self {
            store,
            chain,
            event_bus,
            min_stake,
            token_symbol: token_symbol.into(),
        }
    }

    /// Opens a session and runs the eligibility check.
    ///
    /// Without a wallet no lookup is made. An existing vote settles the
    /// session as voted with the recorded member. A failed lookup leaves
    /// the session idle; the store's uniqueness constraint still guards
    /// the insert.
    pub async fn open(&self, battle: Battle, wallet: Option<WalletAddress>) -> VoteSession {
        let mut session = VoteSession::new(battle, wallet);
        let Some(wallet) = session.wallet.clone() else {
            return session;
        };

        session.transition(VoteState::CheckingEligibility);
        match self.store.find_vote(session.battle.id, &wallet).await {
            Ok(Some(record)) => {
                session.mark_voted(Some(record.voted_for_member_id));
                session.transition(VoteState::Settled(Settlement::Voted {
                    member_id: Some(record.voted_for_member_id),
                }));
            }
            Ok(None) => session.transition(VoteState::Idle),
            Err(e) => {
                tracing::warn!(
                    battle_id = %session.battle.id,
                    %wallet,
                    error = %e,
                    "vote lookup failed, assuming not voted"
                );
                session.transition(VoteState::Idle);
            }
        }
        session
    }

    /// Selects `member_id` and moves to stake input.
    ///
    /// Checks, in order: wallet connected, not already voted, battle
    /// open at `now`, member in battle. Makes no external call.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition as
    /// [`ArenaError::WalletNotConnected`], [`ArenaError::AlreadyVoted`],
    /// [`ArenaError::BattleInactive`], [`ArenaError::BattleExpired`], or
    /// [`ArenaError::MemberNotInBattle`]. Returns
    /// [`ArenaError::InvalidRequest`] if a run is already in flight.
    pub fn trigger(
        &self,
        session: &mut VoteSession,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<(), ArenaError> {
        if session.state.is_in_flight() {
            return Err(ArenaError::InvalidRequest(
                "a vote is already in progress".to_string(),
            ));
        }

        let battle_id = session.battle.id;
        let side = match session.eligibility(now) {
            Eligibility::ConnectWallet => Err(ArenaError::WalletNotConnected),
            Eligibility::AlreadyVoted { .. } => Err(ArenaError::AlreadyVoted(battle_id)),
            Eligibility::Inactive => Err(ArenaError::BattleInactive(battle_id)),
            Eligibility::Expired => Err(ArenaError::BattleExpired(battle_id)),
            Eligibility::Open => session
                .battle
                .side_of(member_id)
                .ok_or(ArenaError::MemberNotInBattle {
                    battle_id,
                    member_id,
                }),
        };

        match side {
            Ok(side) => {
                session.transition(VoteState::AwaitingStakeInput { member_id, side });
                Ok(())
            }
            Err(e) => {
                if let ArenaError::AlreadyVoted(_) = e {
                    self.notify(
                        session,
                        NotificationVariant::Info,
                        "Already Voted",
                        "You have already voted in this battle",
                    );
                }
                Err(e)
            }
        }
    }

    /// Validates `input` and runs stake, vote insert, and counter
    /// reconciliation.
    ///
    /// An invalid amount leaves the session awaiting input. A duplicate
    /// vote settles as voted and counts nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NoSelection`] unless awaiting stake input,
    /// [`ArenaError::InvalidStake`] for a bad amount, and
    /// [`ArenaError::ChainError`] or [`ArenaError::StoreError`] when an
    /// external call fails. External failures settle the session as an
    /// error.
    pub async fn submit_stake(
        &self,
        session: &mut VoteSession,
        input: &str,
    ) -> Result<VoteOutcome, ArenaError> {
        let VoteState::AwaitingStakeInput { member_id, side } = session.state else {
            return Err(ArenaError::NoSelection);
        };
        let Some(wallet) = session.wallet.clone() else {
            return Err(ArenaError::WalletNotConnected);
        };
        let amount = StakeAmount::parse(input, self.min_stake)?;

        let battle_id = session.battle.id;
        let atom_id = session.battle.member(side).atom_id.clone();
        if atom_id.is_empty() {
            return Err(self.fail(
                session,
                ArenaError::ChainError(format!("member {member_id} has no on-chain atom")),
            ));
        }

        session.transition(VoteState::Staking { side, amount });
        self.notify(
            session,
            NotificationVariant::Info,
            "Staking",
            format!(
                "Staking {amount} {} on {}",
                self.token_symbol,
                session.battle.member(side).name
            ),
        );
        let receipt = match self.chain.deposit(&wallet, &atom_id, amount).await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.fail(session, e)),
        };
        tracing::info!(%battle_id, %wallet, tx = %receipt.tx_hash, "stake confirmed");

        session.transition(VoteState::SubmittingVote { side });
        let record = VoteRecord {
            battle_id,
            wallet_address: wallet.clone(),
            voted_for_member_id: member_id,
        };
        match self.store.insert_vote(&record).await {
            Ok(()) => {}
            Err(ArenaError::DuplicateVote(_)) => {
                return Ok(self.settle_duplicate(session, &wallet).await);
            }
            Err(e) => return Err(self.fail(session, e)),
        }
        session.mark_voted(Some(member_id));

        session.transition(VoteState::Reconciling { side });
        let counters = match self.reconcile(session, side).await {
            Ok(counters) => counters,
            Err(e) => return Err(self.fail(session, e)),
        };

        session.battle = session.battle.with_counters(counters);
        session.transition(VoteState::Settled(Settlement::Voted {
            member_id: Some(member_id),
        }));

        let _ = self.event_bus.publish(ArenaEvent::VoteRecorded {
            battle_id,
            side,
            counters,
            timestamp: Utc::now(),
        });
        self.notify(
            session,
            NotificationVariant::Success,
            "Vote Recorded!",
            format!(
                "Your vote for {} has been recorded",
                session.battle.member(side).name
            ),
        );
        tracing::info!(%battle_id, %wallet, ?side, total = counters.total_votes, "vote recorded");

        Ok(VoteOutcome::Recorded {
            battle: session.battle.clone(),
            receipt,
        })
    }

    /// Convenience run of trigger and stake submission on a fresh
    /// session.
    ///
    /// # Errors
    ///
    /// Returns whatever [`VoteFlow::trigger`] or
    /// [`VoteFlow::submit_stake`] returns.
    pub async fn vote(
        &self,
        battle: Battle,
        wallet: Option<WalletAddress>,
        member_id: MemberId,
        stake_input: &str,
        now: DateTime<Utc>,
    ) -> Result<(VoteSession, VoteOutcome), ArenaError> {
        let mut session = self.open(battle, wallet).await;
        self.trigger(&mut session, member_id, now)?;
        let outcome = self.submit_stake(&mut session, stake_input).await?;
        Ok((session, outcome))
    }

    async fn reconcile(
        &self,
        session: &VoteSession,
        side: BattleSide,
    ) -> Result<VoteCounters, ArenaError> {
        let battle_id = session.battle.id;
        let next = self.store.read_counters(battle_id).await?.increment(side);
        self.store.update_counters(battle_id, side, next).await?;
        Ok(next)
    }

    async fn settle_duplicate(
        &self,
        session: &mut VoteSession,
        wallet: &WalletAddress,
    ) -> VoteOutcome {
        let battle_id = session.battle.id;
        let member_id = match self.store.find_vote(battle_id, wallet).await {
            Ok(record) => record.map(|r| r.voted_for_member_id),
            Err(e) => {
                tracing::warn!(%battle_id, %wallet, error = %e, "recorded vote unreadable");
                None
            }
        };
        tracing::info!(%battle_id, %wallet, "duplicate vote, already counted");

        session.mark_voted(member_id);
        session.transition(VoteState::Settled(Settlement::Voted { member_id }));
        self.notify(
            session,
            NotificationVariant::Info,
            "Already Voted",
            "You have already voted in this battle",
        );
        VoteOutcome::AlreadyVoted { member_id }
    }

    fn fail(&self, session: &mut VoteSession, error: ArenaError) -> ArenaError {
        tracing::warn!(battle_id = %session.battle.id, error = %error, "vote failed");
        session.transition(VoteState::Settled(Settlement::Error {
            message: error.to_string(),
        }));
        self.notify(
            session,
            NotificationVariant::Error,
            "Error",
            format!("Failed to vote: {error}"),
        );
        error
    }

    fn notify(
        &self,
        session: &VoteSession,
        variant: NotificationVariant,
        title: &str,
        description: impl Into<String>,
    ) {
        let mut notification =
            Notification::new(variant, title, description).for_battle(session.battle.id);
        if let Some(wallet) = &session.wallet {
            notification = notification.for_wallet(wallet);
        }
        let _ = self.event_bus.notify(notification);
    }
}
