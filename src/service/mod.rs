//! Service layer: business logic orchestration.
//!
//! [`VoteFlow`] runs the stake-backed vote state machine, [`ArenaService`]
//! creates battles and members, and the readers turn store rows into
//! display records. All of them emit through the
//! [`super::domain::EventBus`].

pub mod admin_gate;
pub mod arena_service;
pub mod readers;
pub mod vote_flow;

pub use admin_gate::AdminGate;
pub use arena_service::{ArenaService, BattleDraft, MemberQuota};
pub use readers::{BattleReader, CategoryFilter, MemberDirectory, StatsReader};
pub use vote_flow::{Eligibility, VoteFlow, VoteOutcome, VoteSession, VoteState};
