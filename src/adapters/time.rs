//! Monotonic uptime source.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! The scheduler takes milliseconds; the tach timeout check takes wrapping
//! 32-bit microseconds to match the ISR timestamps.

/// Uptime clock for the ESP32-S3 platform.
pub struct UptimeClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: read-only query of the high-resolution timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds since boot, the scheduler's time base.
    pub fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }

    /// Low 32 bits of [`uptime_us`](Self::uptime_us), same time base as the
    /// tach ISR timestamps.
    pub fn uptime_us_wrapping(&self) -> u32 {
        self.uptime_us() as u32
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let clock = UptimeClock::new();
        let a = clock.uptime_us();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.uptime_us();
        assert!(b > a);
        assert!(clock.uptime_ms() >= 2);
    }
}
