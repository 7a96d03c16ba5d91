//! Trip computer firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod consumption;
pub mod display;
pub mod error;
pub mod scheduler;

pub mod pins;

// Hardware-facing modules compile on every target; the ESP-IDF parts are
// cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
