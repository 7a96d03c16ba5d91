//! System configuration parameters
//!
//! Calibration constants and cadence intervals for the trip computer.
//! Everything is read-only once the [`TripComputer`](crate::app::service::TripComputer)
//! is constructed. Defaults can be overridden at build time with a JSON
//! blob (see [`TripConfig::from_json`]).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest accumulation window accepted by validation.
///
/// Every snapshot happens at most this long after the previous one, which
/// bounds how many pulses a `u32` counter can ever have to hold.
pub const MAX_WINDOW_SECS: u32 = 3600;

/// Calibration constants consumed by the consumption engine and alarm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Usable fuel tank volume (liters).
    pub tank_capacity_l: f32,
    /// Remaining fuel (liters) at or below which the low-fuel alarm sounds.
    pub alarm_level_l: f32,
    /// Distance travelled per distance-sensor pulse (meters).
    pub wheel_circumference_m: f32,
    /// Flow-meter pulses per liter (same meter model on supply and return).
    pub pulses_per_liter: f32,
    /// Accumulated distance (meters) that triggers a consumption update.
    pub distance_threshold_m: f32,
    /// Accumulation window (seconds); also the divisor for L/min at idle.
    pub window_secs: u32,
}

impl Calibration {
    /// Fuel percentage at or below which the alarm fires.
    pub fn alarm_percent(&self) -> f32 {
        100.0 * self.alarm_level_l / self.tank_capacity_l
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            tank_capacity_l: 50.0,
            alarm_level_l: 5.0,
            wheel_circumference_m: 1.915,
            pulses_per_liter: 450.0,
            distance_threshold_m: 500.0,
            window_secs: 60,
        }
    }
}

/// Buzzer tone sequence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneConfig {
    pub on_ms: u32,
    pub off_ms: u32,
    pub repeat: u8,
}

impl ToneConfig {
    /// Wall-clock time the blocking sequence occupies (no trailing gap).
    pub fn total_ms(&self) -> u32 {
        let beeps = u32::from(self.repeat);
        beeps * self.on_ms + beeps.saturating_sub(1) * self.off_ms
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    // --- Calibration ---
    pub calibration: Calibration,

    // --- Cadences ---
    /// Temperature / voltage / RPM refresh interval (milliseconds)
    pub fast_interval_ms: u32,
    /// Clock / fuel refresh interval (milliseconds)
    pub slow_interval_ms: u32,
    /// Main loop sleep between scheduler polls (milliseconds)
    pub loop_interval_ms: u32,

    // --- Low-fuel alarm ---
    /// Fuel percentage at or above which a disarmed alarm re-arms
    pub alarm_rearm_percent: f32,
    pub alarm_tone: ToneConfig,

    // --- Analog inputs ---
    /// Full-scale raw ADC value (10-bit)
    pub adc_full_scale: u16,
    /// Multiplier applied to the linear fuel-sender percentage
    pub fuel_scale: f32,
    /// ADC reference voltage (volts)
    pub voltage_ref_v: f32,
    /// Battery sense resistor-divider ratio
    pub voltage_divider: f32,

    // --- Tachometer ---
    pub tach_pulses_per_rev: u32,
    /// No tach edge for this long means the engine is off (milliseconds)
    pub tach_timeout_ms: u32,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),

            // Cadences
            fast_interval_ms: 1_000,  // 1 Hz
            slow_interval_ms: 15_000, // every 15 s
            loop_interval_ms: 20,

            // Alarm: two 500 ms beeps with a 250 ms gap (1.25 s)
            alarm_rearm_percent: 80.0,
            alarm_tone: ToneConfig {
                on_ms: 500,
                off_ms: 250,
                repeat: 2,
            },

            // Analog
            adc_full_scale: 1023,
            fuel_scale: 1.0,
            voltage_ref_v: 3.3,
            voltage_divider: 5.7,

            // Tach
            tach_pulses_per_rev: 1,
            tach_timeout_ms: 1_000,
        }
    }
}

impl TripConfig {
    /// Parse a JSON override and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// The override if present and valid, defaults otherwise. A rejected
    /// override is logged, never fatal.
    pub fn with_override(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json.as_bytes()) {
            Ok(config) => {
                info!("Config: build-time override applied");
                config
            }
            Err(e) => {
                warn!("Config: override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject values that would break the consumption engine, alarm
    /// hysteresis or counter sizing. Invalid values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cal = &self.calibration;
        if !(cal.tank_capacity_l > 0.0) {
            return Err(ConfigError::ValidationFailed("tank_capacity_l must be > 0"));
        }
        if !(cal.alarm_level_l >= 0.0 && cal.alarm_level_l < cal.tank_capacity_l) {
            return Err(ConfigError::ValidationFailed(
                "alarm_level_l must be within [0, tank_capacity_l)",
            ));
        }
        if !(cal.wheel_circumference_m > 0.0) {
            return Err(ConfigError::ValidationFailed("wheel_circumference_m must be > 0"));
        }
        if !(cal.pulses_per_liter > 0.0) {
            return Err(ConfigError::ValidationFailed("pulses_per_liter must be > 0"));
        }
        if !(cal.distance_threshold_m > 0.0) {
            return Err(ConfigError::ValidationFailed("distance_threshold_m must be > 0"));
        }
        if cal.window_secs == 0 || cal.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::ValidationFailed(
                "window_secs must be within 1..=MAX_WINDOW_SECS",
            ));
        }
        if !(self.alarm_rearm_percent > cal.alarm_percent() && self.alarm_rearm_percent <= 100.0)
        {
            return Err(ConfigError::ValidationFailed(
                "alarm_rearm_percent must be above the alarm percent and <= 100",
            ));
        }
        if self.fast_interval_ms == 0 || self.slow_interval_ms == 0 || self.loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("cadence intervals must be > 0"));
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ValidationFailed("adc_full_scale must be > 0"));
        }
        if self.tach_pulses_per_rev == 0 {
            return Err(ConfigError::ValidationFailed("tach_pulses_per_rev must be > 0"));
        }
        Ok(())
    }
}
