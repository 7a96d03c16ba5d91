//! GPIO / peripheral pin assignments for the trip computer board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pulse inputs (rising-edge interrupts)
// ---------------------------------------------------------------------------

/// Supply-line flow meter (tank → engine).
pub const FLOW_IN_GPIO: i32 = 4;
/// Return-line flow meter (engine → tank).
pub const FLOW_OUT_GPIO: i32 = 5;
/// Wheel-rotation (distance) sensor, one pulse per revolution.
pub const DISTANCE_GPIO: i32 = 6;
/// Ignition / tach signal, one pulse per `tach_pulses_per_rev` revolutions.
pub const TACH_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// Fuel sender voltage — ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const FUEL_ADC_GPIO: i32 = 1;
/// Battery voltage through the sense divider — ADC1 channel 1 (GPIO 2).
pub const BATTERY_ADC_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Buses
// ---------------------------------------------------------------------------

/// DS18B20 1-Wire data line (open-drain, external 4.7 kΩ pull-up).
pub const ONEWIRE_GPIO: i32 = 15;
/// DS1307 real-time clock.
pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// HD44780 20x4 character LCD (4-bit mode)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 10;
pub const LCD_EN_GPIO: i32 = 11;
pub const LCD_D4_GPIO: i32 = 12;
pub const LCD_D5_GPIO: i32 = 13;
pub const LCD_D6_GPIO: i32 = 14;
pub const LCD_D7_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Piezo buzzer driver transistor (active HIGH).
pub const BUZZER_GPIO: i32 = 16;
