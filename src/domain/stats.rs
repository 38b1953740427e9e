//! Per-member battle statistics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate battle history for one member, computed by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BattleStats {
    /// Battles the member took part in.
    pub total_battles: i64,
    /// Battles won.
    pub won_battles: i64,
    /// Battles lost.
    pub lost_battles: i64,
    /// Battles still open.
    pub active_battles: i64,
    /// Open battles the member currently leads.
    pub currently_winning: i64,
    /// Win rate as a percentage.
    pub win_percentage: f64,
}

impl BattleStats {
    /// All counters zero, 0% win rate.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Share of decided battles that were won, for the win/loss bar.
    /// `None` when no battle has been decided.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_loss_ratio(&self) -> Option<f64> {
        let decided = self.won_battles.saturating_add(self.lost_battles);
        (decided > 0).then(|| self.won_battles as f64 / decided as f64 * 100.0)
    }

    /// Short rating label shown next to the win rate.
    #[must_use]
    pub fn rating(&self) -> &'static str {
        if self.win_percentage >= 50.0 {
            "Good"
        } else {
            "Fair"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_no_ratio() {
        let stats = BattleStats::zeroed();
        assert_eq!(stats.total_battles, 0);
        assert!(stats.win_percentage.abs() < f64::EPSILON);
        assert_eq!(stats.win_loss_ratio(), None);
        assert_eq!(stats.rating(), "Fair");
    }

    #[test]
    fn ratio_ignores_active_battles() {
        let stats = BattleStats {
            total_battles: 5,
            won_battles: 3,
            lost_battles: 1,
            active_battles: 1,
            currently_winning: 1,
            win_percentage: 60.0,
        };
        assert_eq!(stats.win_loss_ratio(), Some(75.0));
        assert_eq!(stats.rating(), "Good");
    }
}
