//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TripComputer (domain)
//! ```
//!
//! Driven adapters (clock chip, thermometer, ADC, tach, LCD, buzzer, event
//! sinks) implement these traits. The [`TripComputer`](super::service::TripComputer)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every test can run against mocks.

use crate::error::SensorError;
use crate::scheduler::CadenceKind;
use crate::sensors::analog::AnalogChannel;

// ───────────────────────────────────────────────────────────────
// Read-side ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
}

/// Real-time clock chip.
pub trait ClockPort {
    fn read_time(&mut self) -> Result<ClockTime, SensorError>;
}

/// Temperature probe. Whole degrees Celsius.
pub trait ThermometerPort {
    fn read_celsius(&mut self) -> Result<i16, SensorError>;
}

/// Raw 10-bit ADC samples.
pub trait AnalogPort {
    fn read(&mut self, channel: AnalogChannel) -> u16;
}

/// Ignition / tach pulse timing.
pub trait TachPort {
    /// Latest edge-to-edge width in microseconds, `None` when no edge has
    /// arrived recently (engine off).
    fn read_pulse_width_us(&mut self) -> Option<u32>;
}

// ───────────────────────────────────────────────────────────────
// Write-side ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Character display. Fire-and-forget: adapters swallow bus errors.
pub trait DisplayPort {
    fn write(&mut self, row: u8, col: u8, text: &str);
}

/// Piezo buzzer.
pub trait BuzzerPort {
    /// Play `repeat` beeps of `on_ms` separated by `off_ms`.
    /// Blocks the caller for the whole sequence.
    fn tone(&mut self, on_ms: u32, off_ms: u32, repeat: u8);
}

/// Everything the trip computer drives, bundled so the service can take a
/// single `&mut hw` without double mutable borrows.
pub trait TripHardware:
    ClockPort + ThermometerPort + AnalogPort + TachPort + DisplayPort + BuzzerPort
{
}

impl<T> TripHardware for T where
    T: ClockPort + ThermometerPort + AnalogPort + TachPort + DisplayPort + BuzzerPort
{
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`TripEvent`](super::events::TripEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::TripEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the work it triggers)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes for
/// every cadence that fires during one poll.
pub trait CadenceDelegate {
    fn on_cadence(&mut self, kind: CadenceKind);
}
