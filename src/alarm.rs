//! Low-fuel alarm policy.
//!
//! A two-state hysteresis latch evaluated on every fuel refresh:
//!
//! ```text
//!            fuel ≤ low threshold  (sound tone)
//!   ┌───────┐ ─────────────────────────────▶ ┌──────────┐
//!   │ Armed │                                │ Disarmed │
//!   └───────┘ ◀───────────────────────────── └──────────┘
//!            fuel ≥ re-arm threshold
//! ```
//!
//! The low threshold is `100 × alarm_level_l / tank_capacity_l`. While
//! disarmed nothing sounds, however low the level gets; the only way back
//! to `Armed` is a reading at or above the re-arm threshold.

use log::{info, warn};

use crate::config::TripConfig;

/// Latch state. Armed at startup, lives for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Armed,
    Disarmed,
}

/// What the caller must do after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmAction {
    /// Nothing changed.
    None,
    /// Fuel crossed the low threshold while armed: sound the tone.
    Sound,
    /// Fuel recovered above the re-arm threshold.
    Rearmed,
}

/// Hysteresis policy for the low-fuel alarm.
pub struct AlarmPolicy {
    state: AlarmState,
    low_percent: f32,
    rearm_percent: f32,
}

impl AlarmPolicy {
    pub fn new(config: &TripConfig) -> Self {
        Self::with_thresholds(
            config.calibration.alarm_percent(),
            config.alarm_rearm_percent,
        )
    }

    pub fn with_thresholds(low_percent: f32, rearm_percent: f32) -> Self {
        Self {
            state: AlarmState::Armed,
            low_percent,
            rearm_percent,
        }
    }

    /// Feed one fuel-percentage reading through the latch.
    pub fn evaluate(&mut self, fuel_percent: f32) -> AlarmAction {
        match self.state {
            AlarmState::Armed if fuel_percent <= self.low_percent => {
                warn!(
                    "LOW FUEL: {:.0}% <= {:.0}%, alarm disarmed until {:.0}%",
                    fuel_percent, self.low_percent, self.rearm_percent
                );
                self.state = AlarmState::Disarmed;
                AlarmAction::Sound
            }
            AlarmState::Disarmed if fuel_percent >= self.rearm_percent => {
                info!("Low-fuel alarm re-armed at {:.0}%", fuel_percent);
                self.state = AlarmState::Armed;
                AlarmAction::Rearmed
            }
            _ => AlarmAction::None,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == AlarmState::Armed
    }

    pub fn low_percent(&self) -> f32 {
        self.low_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AlarmPolicy {
        AlarmPolicy::new(&TripConfig::default())
    }

    #[test]
    fn starts_armed() {
        assert!(policy().is_armed());
    }

    #[test]
    fn down_then_up_fires_once_and_rearms_once() {
        let mut p = policy();
        let actions: Vec<AlarmAction> = [90.0, 50.0, 3.0, 50.0, 90.0]
            .into_iter()
            .map(|pct| p.evaluate(pct))
            .collect();

        assert_eq!(
            actions,
            vec![
                AlarmAction::None,
                AlarmAction::None,
                AlarmAction::Sound,
                AlarmAction::None,
                AlarmAction::Rearmed,
            ]
        );
        assert!(p.is_armed());
    }

    #[test]
    fn lingering_low_does_not_refire() {
        let mut p = policy();
        assert_eq!(p.evaluate(8.0), AlarmAction::Sound);
        for pct in [9.0, 7.0, 10.0, 2.0, 0.0] {
            assert_eq!(p.evaluate(pct), AlarmAction::None);
        }
        assert_eq!(p.state(), AlarmState::Disarmed);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut p = AlarmPolicy::with_thresholds(10.0, 80.0);
        assert_eq!(p.evaluate(10.0), AlarmAction::Sound);
        assert_eq!(p.evaluate(80.0), AlarmAction::Rearmed);
    }

    #[test]
    fn partial_recovery_keeps_disarmed() {
        let mut p = policy();
        p.evaluate(5.0);
        assert_eq!(p.evaluate(79.9), AlarmAction::None);
        assert_eq!(p.evaluate(5.0), AlarmAction::None);
        assert_eq!(p.state(), AlarmState::Disarmed);
    }

    #[test]
    fn refires_after_rearm() {
        let mut p = policy();
        assert_eq!(p.evaluate(5.0), AlarmAction::Sound);
        assert_eq!(p.evaluate(95.0), AlarmAction::Rearmed);
        assert_eq!(p.evaluate(5.0), AlarmAction::Sound);
    }
}
