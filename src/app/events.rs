//! Outbound application events.
//!
//! The [`TripComputer`](super::service::TripComputer) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The firmware routes
//! them to the serial log; tests record them.

use crate::consumption::Consumption;
use crate::error::SensorError;
use crate::scheduler::CadenceKind;
use crate::sensors::pulses::RawCounts;

/// Which collaborator a [`TripEvent::SensorFault`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Clock,
    Thermometer,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum TripEvent {
    /// The service rendered its first frame.
    Started,

    /// A snapshot was taken and a new consumption figure computed.
    ConsumptionUpdated {
        trigger: CadenceKind,
        pulses: RawCounts,
        consumption: Consumption,
    },

    /// The low-fuel tone was played.
    LowFuelAlarm { fuel_percent: f32 },

    /// The low-fuel alarm re-armed after a refill.
    AlarmRearmed { fuel_percent: f32 },

    /// A collaborator read failed; the previous value stays on screen.
    SensorFault {
        sensor: SensorKind,
        error: SensorError,
    },
}
