//! Battle countdown: time-left breakdown and a one-second expiry watcher.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use utoipa::ToSchema;

use super::{ArenaEvent, BattleId, EventBus};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Remaining time until a battle's end, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeLeft {
    /// Whole days.
    pub days: u64,
    /// Hours within the day.
    pub hours: u64,
    /// Minutes within the hour.
    pub minutes: u64,
    /// Seconds within the minute.
    pub seconds: u64,
    /// `true` once the end time has been reached.
    pub expired: bool,
}

impl TimeLeft {
    /// A zeroed, expired countdown.
    pub const EXPIRED: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        expired: true,
    };

    /// Time left from `now` until `end`.
    #[must_use]
    pub fn until(end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        (end - now)
            .to_std()
            .map_or(Self::EXPIRED, Self::from_duration)
    }

    /// Breaks a remaining duration down. Sub-millisecond remainders count
    /// as expired.
    #[must_use]
    pub fn from_duration(remaining: Duration) -> Self {
        if remaining.as_millis() == 0 {
            return Self::EXPIRED;
        }
        let secs = remaining.as_secs();
        Self {
            days: secs / SECS_PER_DAY,
            hours: (secs % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (secs % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: secs % SECS_PER_MINUTE,
            expired: false,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expired {
            return f.write_str("Voting Ended");
        }
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Ticks once per second, handing each [`TimeLeft`] to `on_tick`, and
/// returns after the first expired tick.
pub async fn run_countdown(remaining: Duration, mut on_tick: impl FnMut(TimeLeft)) {
    let deadline = Instant::now() + remaining;
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let left = TimeLeft::from_duration(deadline.saturating_duration_since(Instant::now()));
        on_tick(left);
        if left.expired {
            break;
        }
    }
}

/// Spawns a watcher that publishes [`ArenaEvent::BattleExpired`] once
/// `end_time` passes.
pub fn spawn_expiry_watch(
    bus: EventBus,
    battle_id: BattleId,
    end_time: DateTime<Utc>,
) -> JoinHandle<()> {
    let remaining = (end_time - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    tokio::spawn(async move {
        run_countdown(remaining, |left| {
            tracing::trace!(%battle_id, %left, "countdown tick");
        })
        .await;
        tracing::info!(%battle_id, "battle voting window closed");
        let _ = bus.publish(ArenaEvent::BattleExpired {
            battle_id,
            timestamp: Utc::now(),
        });
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;

    #[test]
    fn breakdown_of_mixed_duration() {
        let left = TimeLeft::from_duration(Duration::from_secs(
            SECS_PER_DAY + 2 * SECS_PER_HOUR + 3 * SECS_PER_MINUTE + 4,
        ));
        assert_eq!(
            left,
            TimeLeft {
                days: 1,
                hours: 2,
                minutes: 3,
                seconds: 4,
                expired: false
            }
        );
        assert_eq!(left.to_string(), "1d 02:03:04");
    }

    #[test]
    fn past_end_is_expired() {
        let now = Utc::now();
        let left = TimeLeft::until(now - ChronoDuration::seconds(5), now);
        assert!(left.expired);
        assert_eq!(left.to_string(), "Voting Ended");
        assert!(TimeLeft::until(now, now).expired);
    }

    #[test]
    fn under_a_day_omits_days() {
        let now = Utc::now();
        let left = TimeLeft::until(now + ChronoDuration::seconds(65), now);
        assert_eq!(left.to_string(), "00:01:05");
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_every_second_until_expired() {
        let mut ticks = Vec::new();
        run_countdown(Duration::from_millis(2_500), |left| ticks.push(left)).await;
        assert_eq!(ticks.len(), 4);
        assert!(ticks.last().is_some_and(|t| t.expired));
        assert!(ticks.first().is_some_and(|t| !t.expired));
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_publishes_expiry() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let id = BattleId::new(5);
        let handle = spawn_expiry_watch(bus, id, Utc::now() + ChronoDuration::seconds(2));
        let Ok(event) = rx.recv().await else {
            panic!("expected expiry event");
        };
        assert_eq!(event.battle_id(), Some(id));
        assert_eq!(event.event_type_str(), "battle_expired");
        assert!(handle.await.is_ok());
    }
}
