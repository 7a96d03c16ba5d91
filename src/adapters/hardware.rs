//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! The bus drivers implement their port directly; [`HardwareAdapter`]
//! bundles them with the ADC and the tach edge timer so the service gets a
//! single [`TripHardware`](crate::app::ports::TripHardware) value. On
//! non-espidf targets the ADC reads come from the simulation stubs in
//! [`hw_init`](crate::drivers::hw_init).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::ports::{
    AnalogPort, BuzzerPort, ClockPort, ClockTime, DisplayPort, TachPort, ThermometerPort,
};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::ds1307::Ds1307;
use crate::drivers::ds18b20::Ds18b20;
use crate::drivers::hd44780::Hd44780;
use crate::drivers::hw_init::{self, ADC1_CH_BATTERY, ADC1_CH_FUEL};
use crate::error::SensorError;
use crate::sensors::analog::AnalogChannel;
use crate::sensors::tach::TACH_EDGES;

use super::time::UptimeClock;

// ── Driver → port bindings ────────────────────────────────────

impl<I: I2c> ClockPort for Ds1307<I> {
    fn read_time(&mut self) -> Result<ClockTime, SensorError> {
        Ds1307::read_time(self)
    }
}

impl<P, D> ThermometerPort for Ds18b20<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        Ds18b20::read_celsius(self)
    }
}

impl<P: OutputPin, D: DelayNs> DisplayPort for Hd44780<P, D> {
    fn write(&mut self, row: u8, col: u8, text: &str) {
        if let Err(e) = self.write_at(row, col, text) {
            debug!("lcd: write at ({}, {}) failed: {:?}", row, col, e);
        }
    }
}

impl<P: OutputPin, D: DelayNs> BuzzerPort for Buzzer<P, D> {
    fn tone(&mut self, on_ms: u32, off_ms: u32, repeat: u8) {
        Buzzer::tone(self, on_ms, off_ms, repeat);
    }
}

// ── HardwareAdapter ───────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<C, T, L, B> {
    clock: C,
    thermometer: T,
    lcd: L,
    buzzer: B,
    uptime: UptimeClock,
    tach_timeout_us: u32,
}

impl<C, T, L, B> HardwareAdapter<C, T, L, B> {
    pub fn new(clock: C, thermometer: T, lcd: L, buzzer: B, tach_timeout_ms: u32) -> Self {
        Self {
            clock,
            thermometer,
            lcd,
            buzzer,
            uptime: UptimeClock::new(),
            tach_timeout_us: tach_timeout_ms.saturating_mul(1_000),
        }
    }
}

impl<C: ClockPort, T, L, B> ClockPort for HardwareAdapter<C, T, L, B> {
    fn read_time(&mut self) -> Result<ClockTime, SensorError> {
        self.clock.read_time()
    }
}

impl<C, T: ThermometerPort, L, B> ThermometerPort for HardwareAdapter<C, T, L, B> {
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.thermometer.read_celsius()
    }
}

impl<C, T, L, B> AnalogPort for HardwareAdapter<C, T, L, B> {
    fn read(&mut self, channel: AnalogChannel) -> u16 {
        let adc_channel = match channel {
            AnalogChannel::FuelLevel => ADC1_CH_FUEL,
            AnalogChannel::BatteryVoltage => ADC1_CH_BATTERY,
        };
        hw_init::adc1_read(adc_channel)
    }
}

impl<C, T, L, B> TachPort for HardwareAdapter<C, T, L, B> {
    fn read_pulse_width_us(&mut self) -> Option<u32> {
        TACH_EDGES.pulse_width_us(self.uptime.uptime_us_wrapping(), self.tach_timeout_us)
    }
}

impl<C, T, L: DisplayPort, B> DisplayPort for HardwareAdapter<C, T, L, B> {
    fn write(&mut self, row: u8, col: u8, text: &str) {
        self.lcd.write(row, col, text);
    }
}

impl<C, T, L, B: BuzzerPort> BuzzerPort for HardwareAdapter<C, T, L, B> {
    fn tone(&mut self, on_ms: u32, off_ms: u32, repeat: u8) {
        self.buzzer.tone(on_ms, off_ms, repeat);
    }
}
