//! Domain layer: members, battles, votes, stakes, and the event system.
//!
//! Everything here is a plain value type except [`EventBus`] and the
//! countdown watcher. Store and chain access live in [`crate::store`] and
//! [`crate::chain`].

pub mod arena_event;
pub mod battle;
pub mod countdown;
pub mod event_bus;
pub mod ids;
pub mod member;
pub mod stake;
pub mod stats;

pub use arena_event::{ArenaEvent, Notification, NotificationVariant};
pub use battle::{Battle, BattleSide, BattleStatus, NewBattle, VoteCounters, VotingWindow};
pub use countdown::TimeLeft;
pub use event_bus::EventBus;
pub use ids::{BattleId, MemberId, WalletAddress};
pub use member::{Member, MemberCategory, MemberUpdate, NewMember};
pub use stake::StakeAmount;
pub use stats::BattleStats;
