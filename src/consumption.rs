//! Consumption engine.
//!
//! Turns one [`Snapshot`] of the pulse counters into a consumption figure.
//! Pure and deterministic: the same snapshot and calibration always give
//! the same result, and there is no error path.
//!
//! ```text
//!   liters_in  = flow_in  / pulses_per_liter
//!   liters_out = flow_out / pulses_per_liter
//!   fuel_delta = |liters_in - liters_out|          (supply minus return)
//!   distance_m = distance * wheel_circumference_m
//!
//!   distance_m > 0  →  fuel_delta / distance_m * 100 000   L/100km
//!   distance_m ≤ 0  →  fuel_delta * 60 / window_secs       L/min (idle burn)
//! ```

use core::fmt;

use crate::config::Calibration;
use crate::sensors::pulses::Snapshot;

/// Meters per 100 km.
const METERS_PER_100_KM: f32 = 100_000.0;

/// Unit the consumption value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionUnit {
    /// Vehicle moving: distance efficiency.
    LitersPer100Km,
    /// Vehicle stationary: idle fuel burn.
    LitersPerMinute,
}

impl ConsumptionUnit {
    /// Short suffix used on the display.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::LitersPer100Km => "L/100",
            Self::LitersPerMinute => "L/min",
        }
    }
}

impl fmt::Display for ConsumptionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LitersPer100Km => write!(f, "L/100km"),
            Self::LitersPerMinute => write!(f, "L/min"),
        }
    }
}

/// A consumption figure and its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumption {
    pub value: f32,
    pub unit: ConsumptionUnit,
}

impl fmt::Display for Consumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

/// Net fuel (liters) that passed the supply meter but not the return meter.
pub fn fuel_delta_liters(snapshot: &Snapshot, cal: &Calibration) -> f32 {
    let liters_in = snapshot.flow_in / cal.pulses_per_liter;
    let liters_out = snapshot.flow_out / cal.pulses_per_liter;
    (liters_in - liters_out).abs()
}

/// Distance (meters) covered during the snapshot window.
pub fn distance_meters(snapshot: &Snapshot, cal: &Calibration) -> f32 {
    snapshot.distance * cal.wheel_circumference_m
}

/// Compute consumption from one snapshot.
///
/// Zero distance is the stationary case and reports liters per minute over
/// the accumulation window; it never divides by the distance. A negative or
/// non-finite figure (meter disagreement, noise) is reported as `0.00`.
pub fn compute_consumption(snapshot: &Snapshot, cal: &Calibration) -> Consumption {
    let fuel_delta = fuel_delta_liters(snapshot, cal);
    let distance_m = distance_meters(snapshot, cal);

    if distance_m > 0.0 {
        Consumption {
            value: clamp_non_negative(fuel_delta / distance_m * METERS_PER_100_KM),
            unit: ConsumptionUnit::LitersPer100Km,
        }
    } else {
        let per_minute = 60.0 / cal.window_secs.max(1) as f32;
        Consumption {
            value: clamp_non_negative(fuel_delta * per_minute),
            unit: ConsumptionUnit::LitersPerMinute,
        }
    }
}

fn clamp_non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(flow_in: f32, flow_out: f32, distance: f32) -> Snapshot {
        Snapshot {
            flow_in,
            flow_out,
            distance,
        }
    }

    #[test]
    fn regression_example_is_about_200_l_per_100km() {
        let cal = Calibration::default();
        let c = compute_consumption(&snap(900.0, 450.0, 261.0), &cal);

        assert_eq!(c.unit, ConsumptionUnit::LitersPer100Km);
        // 1.0 L over 261 × 1.915 m = 499.815 m
        assert!((c.value - 200.074).abs() < 0.01, "got {}", c.value);
    }

    #[test]
    fn fuel_delta_and_distance_intermediates() {
        let cal = Calibration::default();
        let s = snap(900.0, 450.0, 261.0);
        assert!((fuel_delta_liters(&s, &cal) - 1.0).abs() < 1e-6);
        assert!((distance_meters(&s, &cal) - 499.815).abs() < 1e-2);
    }

    #[test]
    fn stationary_with_no_flow_is_zero_per_minute() {
        let c = compute_consumption(&snap(0.0, 0.0, 0.0), &Calibration::default());
        assert_eq!(c.unit, ConsumptionUnit::LitersPerMinute);
        assert_eq!(c.value, 0.0);
        assert_eq!(c.to_string(), "0.00 L/min");
    }

    #[test]
    fn stationary_burn_scales_by_window() {
        // 0.5 L net over a 60 s window = 0.5 L/min.
        let cal = Calibration::default();
        let c = compute_consumption(&snap(450.0, 225.0, 0.0), &cal);
        assert_eq!(c.unit, ConsumptionUnit::LitersPerMinute);
        assert!((c.value - 0.5).abs() < 1e-6);

        let short = Calibration {
            window_secs: 30,
            ..cal
        };
        let c = compute_consumption(&snap(450.0, 225.0, 0.0), &short);
        assert!((c.value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn equal_flows_report_zero_regardless_of_distance() {
        let cal = Calibration::default();
        for distance in [0.0, 1.0, 261.0, 10_000.0] {
            let c = compute_consumption(&snap(300.0, 300.0, distance), &cal);
            assert_eq!(c.value, 0.0);
        }
    }

    #[test]
    fn return_exceeding_supply_uses_absolute_difference() {
        let cal = Calibration::default();
        let forward = compute_consumption(&snap(900.0, 450.0, 261.0), &cal);
        let reversed = compute_consumption(&snap(450.0, 900.0, 261.0), &cal);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn deterministic() {
        let cal = Calibration::default();
        let s = snap(1234.0, 987.0, 55.0);
        assert_eq!(compute_consumption(&s, &cal), compute_consumption(&s, &cal));
    }

    #[test]
    fn non_finite_result_clamped() {
        assert_eq!(clamp_non_negative(f32::NAN), 0.0);
        assert_eq!(clamp_non_negative(f32::INFINITY), 0.0);
        assert_eq!(clamp_non_negative(-3.0), 0.0);
    }

    #[test]
    fn display_suffixes() {
        assert_eq!(ConsumptionUnit::LitersPer100Km.suffix(), "L/100");
        assert_eq!(ConsumptionUnit::LitersPerMinute.suffix(), "L/min");
    }
}
