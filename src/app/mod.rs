//! Application core — pure domain logic, zero I/O.
//!
//! The trip computer's orchestration: cadence dispatch, consumption
//! updates, low-fuel alarm handling and display rendering. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
