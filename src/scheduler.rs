//! Cadence scheduler.
//!
//! Decides, once per main-loop iteration, which periodic work is due. It
//! owns every "last fired" timestamp and nothing else; the work itself is
//! done by whoever implements [`CadenceDelegate`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Cadences                                 │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Fast 1 s  │  │ Slow 15 s │  │ Distance  │  │ Window   │   │
//! │  │ T / V/RPM │  │ clock/fuel│  │ ≥ thresh. │  │ 60 s     │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        │              │              └──────┬───────┘        │
//! │        ▼              ▼                     ▼                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              CadenceDelegate::on_cadence               │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time is injected as monotonic milliseconds so the whole thing runs on
//! the host without timers.

use log::debug;

use crate::app::ports::CadenceDelegate;
use crate::config::TripConfig;

/// Which cadence fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceKind {
    /// Temperature, voltage and RPM refresh.
    Fast,
    /// Clock and fuel refresh (evaluates the low-fuel alarm).
    Slow,
    /// Accumulated distance reached the threshold: snapshot and compute.
    Distance,
    /// Accumulation window elapsed without a distance trigger: snapshot
    /// and compute (this is where the stationary L/min figure comes from).
    Window,
}

impl CadenceKind {
    /// True for the two cadences that consume a pulse snapshot.
    pub fn takes_snapshot(self) -> bool {
        matches!(self, Self::Distance | Self::Window)
    }
}

/// "Elapsed since last fire ≥ interval" timer.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    interval_ms: u64,
    last_fire_ms: u64,
}

impl Cadence {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: 0,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fire_ms) >= self.interval_ms
    }

    /// Reset the timestamp to `now_ms`.
    pub fn fire(&mut self, now_ms: u64) {
        self.last_fire_ms = now_ms;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

/// The scheduler engine.
pub struct Scheduler {
    fast: Cadence,
    slow: Cadence,
    window: Cadence,
    distance_threshold_m: f32,
    wheel_circumference_m: f32,
}

impl Scheduler {
    pub fn new(config: &TripConfig) -> Self {
        Self {
            fast: Cadence::new(u64::from(config.fast_interval_ms)),
            slow: Cadence::new(u64::from(config.slow_interval_ms)),
            window: Cadence::new(u64::from(config.calibration.window_secs) * 1000),
            distance_threshold_m: config.calibration.distance_threshold_m,
            wheel_circumference_m: config.calibration.wheel_circumference_m,
        }
    }

    /// Treat `now_ms` as the moment every cadence last fired.
    pub fn restart(&mut self, now_ms: u64) {
        self.fast.fire(now_ms);
        self.slow.fire(now_ms);
        self.window.fire(now_ms);
    }

    /// Level check: has the distance counter reached the threshold?
    pub fn distance_due(&self, distance_pulses: u32) -> bool {
        distance_pulses as f32 * self.wheel_circumference_m >= self.distance_threshold_m
    }

    /// Poll every cadence once and notify the delegate of those that fire.
    ///
    /// At most one snapshot cadence fires per call: a distance trigger
    /// wins over an elapsed window, and either restarts the window.
    pub fn tick(
        &mut self,
        now_ms: u64,
        distance_pulses: u32,
        delegate: &mut dyn CadenceDelegate,
    ) {
        if self.fast.is_due(now_ms) {
            self.fast.fire(now_ms);
            delegate.on_cadence(CadenceKind::Fast);
        }

        if self.slow.is_due(now_ms) {
            self.slow.fire(now_ms);
            delegate.on_cadence(CadenceKind::Slow);
        }

        if self.distance_due(distance_pulses) {
            debug!(
                "Scheduler: distance threshold reached ({} pulses)",
                distance_pulses
            );
            self.window.fire(now_ms);
            delegate.on_cadence(CadenceKind::Distance);
        } else if self.window.is_due(now_ms) {
            debug!("Scheduler: accumulation window elapsed");
            self.window.fire(now_ms);
            delegate.on_cadence(CadenceKind::Window);
        }
    }
}
