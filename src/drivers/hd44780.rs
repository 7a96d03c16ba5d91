//! HD44780 character LCD, 4-bit parallel mode, write-only (R/W tied low).
//!
//! Generic over `embedded-hal` 1.0 output pins and delay so it runs on the
//! board with `esp-idf-hal` pin drivers and on the host with mocks.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Geometry of the fitted panel.
pub const ROWS: u8 = 4;
pub const COLUMNS: u8 = 20;

/// DDRAM start address of each row on a 20×4 panel.
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40, 0x14, 0x54];

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// 4-bit HD44780 driver. All six pins share one type; use the HAL's
/// type-erased pin driver for mixed GPIOs.
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4..D7
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self { rs, en, data, delay }
    }

    /// Power-on initialization by instruction (datasheet figure 24).
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.delay.delay_ms(50);
        self.rs.set_low()?;
        self.en.set_low()?;

        // Three 8-bit function sets, then switch to 4-bit.
        self.write_nibble(0x03)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE_INC)
    }

    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Move the cursor. Out-of-range positions are clamped to the panel.
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), P::Error> {
        let row = row.min(ROWS - 1);
        let col = col.min(COLUMNS - 1);
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row as usize] + col))
    }

    /// Write text at the cursor. Non-ASCII characters print as `?`;
    /// anything past the end of the row is dropped.
    pub fn write_str(&mut self, text: &str) -> Result<(), P::Error> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.write_byte(byte, PinState::High)?;
        }
        Ok(())
    }

    /// Cursor move plus text, clipped to the row.
    pub fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), P::Error> {
        if row >= ROWS || col >= COLUMNS {
            return Ok(());
        }
        self.set_cursor(row, col)?;
        let room = usize::from(COLUMNS - col);
        let end = text
            .char_indices()
            .nth(room)
            .map_or(text.len(), |(i, _)| i);
        self.write_str(&text[..end])
    }

    fn command(&mut self, cmd: u8) -> Result<(), P::Error> {
        self.write_byte(cmd, PinState::Low)
    }

    fn write_byte(&mut self, value: u8, rs: PinState) -> Result<(), P::Error> {
        self.rs.set_state(rs)?;
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from((nibble >> bit) & 1 == 1))?;
        }
        self.en.set_high()?;
        self.delay.delay_us(1);
        self.en.set_low()?;
        self.delay.delay_us(100);
        Ok(())
    }
}
