//! DS18B20 temperature probe on a bit-banged 1-Wire bus.
//!
//! Single device on the bus, so every transaction starts with SKIP ROM.
//! Conversions take up to 750 ms at 12-bit resolution; instead of blocking
//! for that, reads are pipelined: each [`Ds18b20::read_celsius`] collects
//! the conversion started by the previous call and immediately starts the
//! next one. The very first call therefore reports
//! [`SensorError::NotReady`].
//!
//! The pin must be open-drain with an external pull-up: `set_low` drives the
//! line, `set_high` releases it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::error::SensorError;

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Scratchpad length including the trailing CRC byte.
pub const SCRATCHPAD_LEN: usize = 9;

/// Measurement range from the datasheet.
const MIN_CELSIUS: i16 = -55;
const MAX_CELSIUS: i16 = 125;

/// Temperature register after power-on reset (+85 °C).
const POWER_ON_RAW: [u8; 2] = [0x50, 0x05];
const POWER_ON_CELSIUS: i16 = 85;
/// How close the previous reading must be for +85 °C to be believed.
const POWER_ON_SLACK: i16 = 5;

/// Dallas/Maxim CRC-8 (x^8 + x^5 + x^4 + 1, reflected).
pub fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in bytes {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Whole degrees from the two temperature bytes (1/16 °C per LSB).
pub fn decode_celsius(lsb: u8, msb: u8) -> Result<i16, SensorError> {
    let raw = i16::from_le_bytes([lsb, msb]);
    let celsius = (f32::from(raw) / 16.0).round() as i16;
    if (MIN_CELSIUS..=MAX_CELSIUS).contains(&celsius) {
        Ok(celsius)
    } else {
        Err(SensorError::OutOfRange)
    }
}

/// Validate a raw scratchpad and extract the temperature.
pub fn parse_scratchpad(pad: &[u8; SCRATCHPAD_LEN]) -> Result<i16, SensorError> {
    if crc8(&pad[..8]) != pad[8] {
        return Err(SensorError::ChecksumMismatch);
    }
    decode_celsius(pad[0], pad[1])
}

pub struct Ds18b20<P, D> {
    pin: P,
    delay: D,
    converting: bool,
    last_celsius: Option<i16>,
}

impl<P, D> Ds18b20<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(mut pin: P, delay: D) -> Self {
        let _ = pin.set_high();
        Self {
            pin,
            delay,
            converting: false,
            last_celsius: None,
        }
    }

    /// Collect the pending conversion and start the next one.
    pub fn read_celsius(&mut self) -> Result<i16, SensorError> {
        if !self.converting {
            self.start_conversion()?;
            return Err(SensorError::NotReady);
        }

        let pad = self.read_scratchpad();
        // The next conversion starts even if this read failed.
        if let Err(e) = self.start_conversion() {
            debug!("ds18b20: could not start next conversion: {}", e);
        }
        let result = pad.and_then(|pad| self.accept(&pad));
        self.last_celsius = result.ok();
        result
    }

    /// Parse a scratchpad, rejecting the power-on value unless the probe was
    /// already reading close to it. A probe that browned out mid-conversion
    /// (engine cranking) reports +85 °C with a valid CRC.
    fn accept(&self, pad: &[u8; SCRATCHPAD_LEN]) -> Result<i16, SensorError> {
        let celsius = parse_scratchpad(pad)?;
        let plausible = self
            .last_celsius
            .is_some_and(|last| (last - POWER_ON_CELSIUS).abs() <= POWER_ON_SLACK);
        if pad[..2] == POWER_ON_RAW && !plausible {
            debug!("ds18b20: power-on value read, conversion was lost");
            return Err(SensorError::NotReady);
        }
        Ok(celsius)
    }

    pub fn start_conversion(&mut self) -> Result<(), SensorError> {
        self.converting = false;
        self.select()?;
        self.write_byte(CMD_CONVERT_T)?;
        self.converting = true;
        Ok(())
    }

    pub fn read_scratchpad(&mut self) -> Result<[u8; SCRATCHPAD_LEN], SensorError> {
        self.select()?;
        self.write_byte(CMD_READ_SCRATCHPAD)?;
        let mut pad = [0u8; SCRATCHPAD_LEN];
        for byte in pad.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(pad)
    }

    fn select(&mut self) -> Result<(), SensorError> {
        if !self.reset()? {
            return Err(SensorError::NoDevice);
        }
        self.write_byte(CMD_SKIP_ROM)
    }

    // ── 1-Wire link layer ─────────────────────────────────────

    /// Reset pulse; `true` when a device answered with a presence pulse.
    fn reset(&mut self) -> Result<bool, SensorError> {
        // A released line must idle high; low means shorted or no pull-up.
        if self.pin.is_low().map_err(|_| SensorError::BusFault)? {
            return Err(SensorError::BusFault);
        }

        self.drive_low()?;
        self.delay.delay_us(480);
        let present = critical_section::with(|_| -> Result<bool, SensorError> {
            self.release()?;
            self.delay.delay_us(70);
            self.pin.is_low().map_err(|_| SensorError::BusFault)
        })?;
        self.delay.delay_us(410);
        Ok(present)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), SensorError> {
        let (low_us, high_us) = if bit { (6, 64) } else { (60, 10) };
        critical_section::with(|_| -> Result<(), SensorError> {
            self.drive_low()?;
            self.delay.delay_us(low_us);
            self.release()
        })?;
        self.delay.delay_us(high_us);
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, SensorError> {
        let bit = critical_section::with(|_| -> Result<bool, SensorError> {
            self.drive_low()?;
            self.delay.delay_us(6);
            self.release()?;
            self.delay.delay_us(9);
            self.pin.is_high().map_err(|_| SensorError::BusFault)
        })?;
        self.delay.delay_us(55);
        Ok(bit)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SensorError> {
        for i in 0..8 {
            self.write_bit((byte >> i) & 1 == 1)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SensorError> {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    fn drive_low(&mut self) -> Result<(), SensorError> {
        self.pin.set_low().map_err(|_| SensorError::BusFault)
    }

    fn release(&mut self) -> Result<(), SensorError> {
        self.pin.set_high().map_err(|_| SensorError::BusFault)
    }
}
