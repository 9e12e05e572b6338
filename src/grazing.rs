//! Rotational grazing schedule used to colour the silvopasture paddocks.
//!
//! The schedule runs on accelerated demo time: one wall-clock minute counts
//! as one "day" of the rotation. Nothing downstream depends on it being day
//! accurate.

use chrono::Utc;
use serde::Serialize;

use crate::canvas::Color;
use crate::config::LayoutParameters;

/// Source of the rotation's current minute.
pub trait RotationClock: Send {
    fn now_minutes(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl RotationClock for SystemClock {
    fn now_minutes(&self) -> i64 {
        Utc::now().timestamp() / 60
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl RotationClock for FixedClock {
    fn now_minutes(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecoveryStage {
    Active,
    Grazed,
    Regrowing,
    NearlyRecovered,
    Recovered,
}

impl RecoveryStage {
    pub fn color(self) -> Color {
        match self {
            RecoveryStage::Active => Color::hex(0xf59e0b),
            RecoveryStage::Grazed => Color::hex(0xef4444),
            RecoveryStage::Regrowing => Color::hex(0xeab308),
            RecoveryStage::NearlyRecovered => Color::hex(0x84cc16),
            RecoveryStage::Recovered => Color::hex(0x22c55e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrazingRotation {
    pub occupation_days: u32,
    pub recovery_days: u32,
    pub paddocks_per_guild: u32,
}

impl GrazingRotation {
    /// `None` when the rotation cannot run (no occupation period).
    pub fn new(occupation_days: u32, recovery_days: u32) -> Option<Self> {
        if occupation_days == 0 {
            return None;
        }
        Some(Self {
            occupation_days,
            recovery_days,
            paddocks_per_guild: recovery_days.div_ceil(occupation_days).saturating_add(1),
        })
    }

    pub fn from_params(params: &LayoutParameters) -> Option<Self> {
        Self::new(params.occupation_days, params.recovery_days)
    }

    pub fn cycle_days(&self) -> i64 {
        self.paddocks_per_guild as i64 * self.occupation_days as i64
    }

    /// Index of the occupied paddock at `minute`; the same for every guild.
    pub fn active_paddock(&self, minute: i64) -> u32 {
        let day = minute.rem_euclid(self.cycle_days());
        (day / self.occupation_days as i64) as u32 % self.paddocks_per_guild
    }

    pub fn days_since_occupied(&self, paddock: u32, active: u32) -> u64 {
        let n = u64::from(self.paddocks_per_guild);
        let periods = (u64::from(active) + n - u64::from(paddock) % n) % n;
        periods * u64::from(self.occupation_days)
    }

    pub fn stage(&self, paddock: u32, active: u32) -> RecoveryStage {
        if paddock == active {
            return RecoveryStage::Active;
        }
        let days = self.days_since_occupied(paddock, active) as f64;
        let recovery = self.recovery_days as f64;
        if days < recovery * 0.3 {
            RecoveryStage::Grazed
        } else if days < recovery * 0.7 {
            RecoveryStage::Regrowing
        } else if days < recovery {
            RecoveryStage::NearlyRecovered
        } else {
            RecoveryStage::Recovered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paddock_count_from_durations() {
        let rotation = GrazingRotation::new(2, 45).unwrap();
        assert_eq!(rotation.paddocks_per_guild, 24);
        assert_eq!(rotation.cycle_days(), 48);
    }

    #[test]
    fn exactly_one_active_paddock() {
        let rotation = GrazingRotation::new(2, 45).unwrap();
        for minute in [0, 1, 2, 47, 48, 1_000_003, -5] {
            let active = rotation.active_paddock(minute);
            let count = (0..rotation.paddocks_per_guild)
                .filter(|p| rotation.stage(*p, active) == RecoveryStage::Active)
                .count();
            assert_eq!(count, 1, "minute {minute}");
            assert!(active < rotation.paddocks_per_guild);
        }
    }

    #[test]
    fn active_paddock_advances_every_occupation_period() {
        let rotation = GrazingRotation::new(2, 45).unwrap();
        assert_eq!(rotation.active_paddock(0), 0);
        assert_eq!(rotation.active_paddock(1), 0);
        assert_eq!(rotation.active_paddock(2), 1);
        assert_eq!(rotation.active_paddock(47), 23);
        assert_eq!(rotation.active_paddock(48), 0);
    }

    #[test]
    fn stage_thresholds() {
        let rotation = GrazingRotation::new(2, 45).unwrap();
        let active = 10;
        assert_eq!(rotation.stage(9, active), RecoveryStage::Grazed);
        assert_eq!(rotation.days_since_occupied(9, active), 2);
        // seven periods back is 14 days, just past the 30% mark
        assert_eq!(rotation.stage(3, active), RecoveryStage::Regrowing);
        assert_eq!(rotation.stage(18, active), RecoveryStage::NearlyRecovered);
        assert_eq!(rotation.days_since_occupied(11, active), 46);
        assert_eq!(rotation.stage(11, active), RecoveryStage::Recovered);
    }

    #[test]
    fn extreme_recovery_saturates() {
        let rotation = GrazingRotation::new(1, u32::MAX).unwrap();
        assert_eq!(rotation.paddocks_per_guild, u32::MAX);
        let active = rotation.active_paddock(i64::MAX);
        assert!(active < rotation.paddocks_per_guild);
        assert_eq!(rotation.stage(active, active), RecoveryStage::Active);
        assert_eq!(
            rotation.days_since_occupied(0, u32::MAX - 1),
            u64::from(u32::MAX - 1)
        );
        assert_eq!(rotation.stage(0, 1), RecoveryStage::Grazed);
    }

    #[test]
    fn zero_occupation_disables_rotation() {
        assert!(GrazingRotation::new(0, 45).is_none());
    }

    #[test]
    fn stage_colors() {
        assert_eq!(RecoveryStage::Active.color(), Color::hex(0xf59e0b));
        assert_eq!(RecoveryStage::Recovered.color(), Color::hex(0x22c55e));
    }
}
