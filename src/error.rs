//! Error types for the trip computer firmware.
//!
//! One enum per failure domain. All variants are `Copy` so they travel
//! through the service and event sink without allocation. Nothing here is
//! fatal to the control loop: sensor errors are absorbed by the service and
//! configuration errors fall back to defaults.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction (I2C, 1-Wire, GPIO) failed.
    BusFault,
    /// Data arrived but its checksum did not match.
    ChecksumMismatch,
    /// No device answered the presence / address probe.
    NoDevice,
    /// A measurement has been started but no result is available yet.
    NotReady,
    /// Reading decoded to a physically implausible value.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFault => write!(f, "bus fault"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::NoDevice => write!(f, "no device present"),
            Self::NotReady => write!(f, "conversion not ready"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override blob is not valid JSON for [`TripConfig`](crate::config::TripConfig).
    Parse,
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse failed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
