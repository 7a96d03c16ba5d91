//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to                      |
//! |------------|-------------------|----------------------------------|
//! | `hardware` | ClockPort         | DS1307 RTC (I2C)                 |
//! |            | ThermometerPort   | DS18B20 probe (1-Wire)           |
//! |            | AnalogPort        | ESP32 ADC1 (fuel, battery)       |
//! |            | TachPort          | Tach edge timer (GPIO ISR)       |
//! |            | DisplayPort       | HD44780 20×4 LCD                 |
//! |            | BuzzerPort        | Piezo on GPIO                    |
//! | `log_sink` | EventSink         | Serial log output                |
//! | `time`     | —                 | ESP32 system timer               |

pub mod hardware;
pub mod log_sink;
pub mod time;
