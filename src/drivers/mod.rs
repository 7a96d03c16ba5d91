//! Peripheral drivers and one-shot hardware initialisation.
//!
//! The bus drivers are generic over `embedded-hal` 1.0 traits; the board
//! binary instantiates them with `esp-idf-hal` pin, I2C and delay types.

pub mod buzzer;
pub mod ds1307;
pub mod ds18b20;
pub mod hd44780;
pub mod hw_init;
