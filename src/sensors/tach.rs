//! Tachometer edge timing.
//!
//! The tach ISR records the time between consecutive edges in atomics; the
//! main loop reads the latest width on the fast cadence. A width is only
//! reported while edges keep arriving: once the last edge is older than the
//! configured timeout the engine is considered off, and stays off until two
//! new edges arrive. The latch keeps a long-parked timestamp from looking
//! fresh again when the 32-bit µs clock wraps (every ~71.6 min).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Microseconds per minute; `60_000 / width_ms` expressed in µs.
const US_PER_MINUTE: u64 = 60_000_000;

/// Lock-free edge timestamps written from interrupt context.
pub struct EdgeTimer {
    last_edge_us: AtomicU32,
    width_us: AtomicU32,
    seen: AtomicBool,
}

impl Default for EdgeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeTimer {
    pub const fn new() -> Self {
        Self {
            last_edge_us: AtomicU32::new(0),
            width_us: AtomicU32::new(0),
            seen: AtomicBool::new(false),
        }
    }

    /// Record one edge at `now_us` (microsecond uptime, wrapping).
    pub fn on_edge(&self, now_us: u32) {
        let prev = self.last_edge_us.swap(now_us, Ordering::Relaxed);
        if self.seen.swap(true, Ordering::Release) {
            self.width_us
                .store(now_us.wrapping_sub(prev), Ordering::Release);
        }
    }

    /// Latest edge-to-edge width, or `None` if no edge arrived within
    /// `timeout_us` of `now_us` or fewer than two edges have been seen.
    ///
    /// `timeout_us` must stay below 2^31.
    pub fn pulse_width_us(&self, now_us: u32, timeout_us: u32) -> Option<u32> {
        if !self.seen.load(Ordering::Acquire) {
            return None;
        }
        let last = self.last_edge_us.load(Ordering::Relaxed);
        // Negative age: the ISR stamped an edge after `now_us` was sampled.
        let age = now_us.wrapping_sub(last) as i32;
        if age > 0 && age.unsigned_abs() > timeout_us {
            if self
                .seen
                .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                self.width_us.store(0, Ordering::Release);
            }
            return None;
        }
        match self.width_us.load(Ordering::Acquire) {
            0 => None,
            w => Some(w),
        }
    }
}

/// Process-wide tach timer (GPIO ISR callbacks cannot capture state).
pub static TACH_EDGES: EdgeTimer = EdgeTimer::new();

/// Tach GPIO ISR body.
pub fn tach_isr_handler(now_us: u32) {
    TACH_EDGES.on_edge(now_us);
}

/// Engine speed from one edge-to-edge width.
///
/// Returns `None` for a zero width ("engine off") instead of dividing.
pub fn rpm_from_pulse_width(width_us: u32, pulses_per_rev: u32) -> Option<u32> {
    let denom = u64::from(width_us) * u64::from(pulses_per_rev);
    if denom == 0 {
        return None;
    }
    Some((US_PER_MINUTE / denom).min(u64::from(u32::MAX)) as u32)
}
