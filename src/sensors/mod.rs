//! Sensor-side logic that does not need a bus driver.
//!
//! - [`pulses`] — ISR-fed flow and distance counters plus the snapshot
//!   protocol. This is the only state shared with interrupt context.
//! - [`tach`] — ISR-fed edge timing for the RPM readout.
//! - [`analog`] — raw ADC value conversions for fuel level and battery.

pub mod analog;
pub mod pulses;
pub mod tach;
