//! Text formatting for the 20×4 character display.
//!
//! Every field is rendered at a fixed width so a shorter value overwrites
//! the previous one completely; no clear-screen is ever needed.
//!
//! ```text
//!   col           1111111111
//!       01234567890123456789
//!   0   200.07L/100    12:34
//!   1   T  23C        12.5V
//!   2   RPM  3000
//!   3   F 40% ####......
//! ```

use core::fmt::Write;

use heapless::String;

use crate::app::ports::ClockTime;
use crate::consumption::Consumption;

/// Display width in characters.
pub const COLUMNS: usize = 20;

/// Number of segments in the fuel bar.
pub const FUEL_BAR_SEGMENTS: usize = 10;

/// Largest consumption value that fits the field.
const CONSUMPTION_MAX: f32 = 999.99;

/// One rendered field.
pub type Line = String<COLUMNS>;

/// Every field on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Consumption,
    Clock,
    Temperature,
    Voltage,
    Rpm,
    Fuel,
}

impl Field {
    /// `(row, col)` of the field's first character.
    pub const fn position(self) -> (u8, u8) {
        match self {
            Self::Consumption => (0, 0),
            Self::Clock => (0, 15),
            Self::Temperature => (1, 0),
            Self::Voltage => (1, 14),
            Self::Rpm => (2, 0),
            Self::Fuel => (3, 0),
        }
    }
}

/// `200.07L/100`, `  0.00L/min`, or dashes before the first computation.
pub fn format_consumption(consumption: Option<&Consumption>) -> Line {
    let mut line = Line::new();
    match consumption {
        Some(c) => {
            let _ = write!(
                line,
                "{:>6.2}{}",
                c.value.min(CONSUMPTION_MAX),
                c.unit.suffix()
            );
        }
        None => {
            let _ = line.push_str(" --.--     ");
        }
    }
    line
}

/// `HH:MM`
pub fn format_clock(time: ClockTime) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{:02}:{:02}", time.hours, time.minutes);
    line
}

/// `T  23C`
pub fn format_temperature(celsius: i16) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "T {:>3}C", celsius);
    line
}

/// `12.5V`
pub fn format_voltage(volts: f32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{:>4.1}V", volts.clamp(0.0, 99.9));
    line
}

/// `RPM  3000`, or `RPM  ----` when the engine is off.
pub fn format_rpm(rpm: Option<u32>) -> Line {
    let mut line = Line::new();
    match rpm {
        Some(rpm) => {
            let _ = write!(line, "RPM {:>5}", rpm.min(99_999));
        }
        None => {
            let _ = line.push_str("RPM  ----");
        }
    }
    line
}

/// `F 40% ####......`
pub fn format_fuel(percent: f32) -> Line {
    let mut line = Line::new();
    let pct = percent.clamp(0.0, 100.0);
    let _ = write!(line, "F{:>3.0}% ", pct);
    let _ = line.push_str(&fuel_bar(pct));
    line
}

/// Ten-segment bar, one `#` per started-and-rounded 10 %.
pub fn fuel_bar(percent: f32) -> String<FUEL_BAR_SEGMENTS> {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * FUEL_BAR_SEGMENTS as f32).round() as usize;
    let mut bar = String::new();
    for i in 0..FUEL_BAR_SEGMENTS {
        let _ = bar.push(if i < filled { '#' } else { '.' });
    }
    bar
}
