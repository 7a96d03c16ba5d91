//! Pulse counters for the two flow meters and the wheel-rotation sensor.
//!
//! Each GPIO ISR bumps one counter per rising edge. The main loop reads and
//! clears all three at once with [`PulseCounters::take_snapshot_and_reset`].
//!
//! The triple lives behind a single `critical_section::Mutex`, so the ISRs
//! and the snapshot exclude each other: an edge that fires while a snapshot
//! holds the section is latched by the interrupt controller and lands in
//! the freshly zeroed counters, i.e. in the *next* snapshot. Nothing inside
//! the section does more than integer copies.
//!
//! ## Counter width
//!
//! `u32` counters are reset at least once per accumulation window
//! (bounded by [`MAX_WINDOW_SECS`](crate::config::MAX_WINDOW_SECS)). At a
//! generous 10 kHz pulse rate that is 3.6e7 pulses, two orders of magnitude
//! below `u32::MAX`. The increment still saturates rather than wraps.

use core::cell::Cell;

use critical_section::Mutex;

/// One of the three pulse inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseChannel {
    /// Supply-line flow meter.
    FlowIn,
    /// Return-line flow meter.
    FlowOut,
    /// Wheel-rotation sensor.
    Distance,
}

/// Integer counter values as held in interrupt context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCounts {
    pub flow_in: u32,
    pub flow_out: u32,
    pub distance: u32,
}

impl RawCounts {
    pub const ZERO: Self = Self {
        flow_in: 0,
        flow_out: 0,
        distance: 0,
    };

    #[inline]
    fn bump(&mut self, channel: PulseChannel) {
        let slot = match channel {
            PulseChannel::FlowIn => &mut self.flow_in,
            PulseChannel::FlowOut => &mut self.flow_out,
            PulseChannel::Distance => &mut self.distance,
        };
        *slot = slot.saturating_add(1);
    }

    /// Count for one channel.
    pub fn get(&self, channel: PulseChannel) -> u32 {
        match channel {
            PulseChannel::FlowIn => self.flow_in,
            PulseChannel::FlowOut => self.flow_out,
            PulseChannel::Distance => self.distance,
        }
    }
}

/// Real-valued copy of the three counters taken at one instant.
///
/// "Total pulses since the last reset" for each channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    pub flow_in: f32,
    pub flow_out: f32,
    pub distance: f32,
}

impl From<RawCounts> for Snapshot {
    fn from(raw: RawCounts) -> Self {
        Self {
            flow_in: raw.flow_in as f32,
            flow_out: raw.flow_out as f32,
            distance: raw.distance as f32,
        }
    }
}

/// The three counters shared between ISRs and the main loop.
pub struct PulseCounters {
    counts: Mutex<Cell<RawCounts>>,
}

impl Default for PulseCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCounters {
    pub const fn new() -> Self {
        Self {
            counts: Mutex::new(Cell::new(RawCounts::ZERO)),
        }
    }

    /// Count one edge. Called from the GPIO ISR: increment only, no I/O,
    /// no floating point.
    #[inline]
    pub fn record(&self, channel: PulseChannel) {
        critical_section::with(|cs| {
            let cell = self.counts.borrow(cs);
            let mut counts = cell.get();
            counts.bump(channel);
            cell.set(counts);
        });
    }

    /// Current distance pulses without resetting anything.
    ///
    /// The scheduler polls this every loop iteration to decide whether the
    /// distance threshold has been reached.
    pub fn distance_pulses(&self) -> u32 {
        critical_section::with(|cs| self.counts.borrow(cs).get().distance)
    }

    /// Current values of all counters without resetting them.
    pub fn peek(&self) -> RawCounts {
        critical_section::with(|cs| self.counts.borrow(cs).get())
    }

    /// Copy and zero all three counters inside one critical section.
    pub fn take_raw_and_reset(&self) -> RawCounts {
        critical_section::with(|cs| self.counts.borrow(cs).replace(RawCounts::ZERO))
    }

    /// Exclusive read-and-clear of the counter triple.
    ///
    /// The float conversion happens after the critical section has been
    /// released so added interrupt latency stays at a handful of loads and
    /// stores.
    pub fn take_snapshot_and_reset(&self) -> Snapshot {
        Snapshot::from(self.take_raw_and_reset())
    }
}

/// Process-wide counters. A `static` because GPIO ISR callbacks cannot
/// capture state; everything else reaches it through a `&'static` handed to
/// the [`TripComputer`](crate::app::service::TripComputer).
pub static PULSE_COUNTERS: PulseCounters = PulseCounters::new();

/// Supply-line flow meter rising edge.
pub fn flow_in_isr_handler() {
    PULSE_COUNTERS.record(PulseChannel::FlowIn);
}

/// Return-line flow meter rising edge.
pub fn flow_out_isr_handler() {
    PULSE_COUNTERS.record(PulseChannel::FlowOut);
}

/// Wheel-rotation sensor rising edge.
pub fn distance_isr_handler() {
    PULSE_COUNTERS.record(PulseChannel::Distance);
}
