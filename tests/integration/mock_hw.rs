//! Mock hardware adapter for integration tests.
//!
//! Sensor readings are plain fields the test sets; every display write
//! lands in a 20×4 character grid and every tone is recorded, so tests can
//! assert on what the driver would actually see.

use tripcomputer::app::events::TripEvent;
use tripcomputer::app::ports::{
    AnalogPort, BuzzerPort, ClockPort, ClockTime, DisplayPort, EventSink, TachPort,
    ThermometerPort,
};
use tripcomputer::error::SensorError;
use tripcomputer::sensors::analog::AnalogChannel;

pub const ROWS: usize = 4;
pub const COLUMNS: usize = 20;

/// Raw 10-bit fuel sample for a whole-number percentage.
pub fn fuel_raw(percent: u32) -> u16 {
    ((percent * 1023 + 50) / 100) as u16
}

// ── Tone record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub on_ms: u32,
    pub off_ms: u32,
    pub repeat: u8,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub time: Result<ClockTime, SensorError>,
    pub celsius: Result<i16, SensorError>,
    pub fuel_raw: u16,
    pub battery_raw: u16,
    pub tach_width_us: Option<u32>,
    pub screen: [[char; COLUMNS]; ROWS],
    pub writes: usize,
    pub tones: Vec<Tone>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            time: Ok(ClockTime {
                hours: 12,
                minutes: 0,
            }),
            celsius: Ok(20),
            fuel_raw: fuel_raw(90),
            battery_raw: 700,
            tach_width_us: None,
            screen: [[' '; COLUMNS]; ROWS],
            writes: 0,
            tones: Vec::new(),
        }
    }

    pub fn row(&self, row: usize) -> String {
        self.screen[row].iter().collect()
    }

    /// `len` characters of `row` starting at `col`.
    pub fn field(&self, row: usize, col: usize, len: usize) -> String {
        self.screen[row][col..col + len].iter().collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for MockHardware {
    fn read_time(&mut self) -> Result<ClockTime, SensorError> {
        self.time
    }
}

impl ThermometerPort for MockHardware {
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.celsius
    }
}

impl AnalogPort for MockHardware {
    fn read(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::FuelLevel => self.fuel_raw,
            AnalogChannel::BatteryVoltage => self.battery_raw,
        }
    }
}

impl TachPort for MockHardware {
    fn read_pulse_width_us(&mut self) -> Option<u32> {
        self.tach_width_us
    }
}

impl DisplayPort for MockHardware {
    fn write(&mut self, row: u8, col: u8, text: &str) {
        self.writes += 1;
        let row = usize::from(row);
        for (i, ch) in text.chars().enumerate() {
            let col = usize::from(col) + i;
            if row < ROWS && col < COLUMNS {
                self.screen[row][col] = ch;
            }
        }
    }
}

impl BuzzerPort for MockHardware {
    fn tone(&mut self, on_ms: u32, off_ms: u32, repeat: u8) {
        self.tones.push(Tone {
            on_ms,
            off_ms,
            repeat,
        });
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event for later assertions.
pub struct RecordingSink {
    pub events: Vec<TripEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&TripEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &TripEvent) {
        self.events.push(event.clone());
    }
}
