//! DS1307 real-time clock over I2C.
//!
//! Only the time of day is needed: one register-pointer write followed by a
//! three-byte read of seconds, minutes and hours (BCD).

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

use crate::app::ports::ClockTime;
use crate::error::SensorError;

/// Fixed 7-bit bus address.
pub const I2C_ADDR: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;

/// Seconds register bit 7: oscillator halted.
const CLOCK_HALT: u8 = 0x80;
/// Hours register bit 6: 12-hour mode.
const MODE_12H: u8 = 0x40;
/// Hours register bit 5 in 12-hour mode: PM.
const PM: u8 = 0x20;

fn bcd_to_bin(bcd: u8) -> Option<u8> {
    let (tens, units) = (bcd >> 4, bcd & 0x0F);
    (tens <= 9 && units <= 9).then_some(tens * 10 + units)
}

/// Decode the seconds/minutes/hours registers.
pub fn decode_time(regs: [u8; 3]) -> Result<ClockTime, SensorError> {
    let [seconds, minutes, hours] = regs;
    if seconds & CLOCK_HALT != 0 {
        return Err(SensorError::NotReady);
    }

    let minutes = bcd_to_bin(minutes & 0x7F).ok_or(SensorError::OutOfRange)?;
    let hours = if hours & MODE_12H != 0 {
        let h12 = bcd_to_bin(hours & 0x1F).ok_or(SensorError::OutOfRange)?;
        if !(1..=12).contains(&h12) {
            return Err(SensorError::OutOfRange);
        }
        match (h12, hours & PM != 0) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        }
    } else {
        bcd_to_bin(hours & 0x3F).ok_or(SensorError::OutOfRange)?
    };

    if hours > 23 || minutes > 59 {
        return Err(SensorError::OutOfRange);
    }
    Ok(ClockTime { hours, minutes })
}

fn map_bus_error(kind: ErrorKind) -> SensorError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => SensorError::NoDevice,
        _ => SensorError::BusFault,
    }
}

pub struct Ds1307<I> {
    i2c: I,
}

impl<I: I2c> Ds1307<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn read_time(&mut self) -> Result<ClockTime, SensorError> {
        let mut regs = [0u8; 3];
        self.i2c
            .write_read(I2C_ADDR, &[REG_SECONDS], &mut regs)
            .map_err(|e| map_bus_error(e.kind()))?;
        decode_time(regs)
    }
}
