//! Trip Computer Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                     LogEventSink  UptimeClock │
//! │  (DS1307 · DS18B20 · ADC · tach      (EventSink)               │
//! │   · HD44780 · buzzer)                                          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              TripComputer (pure logic)                 │    │
//! │  │  Scheduler · Consumption · Low-fuel alarm              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISRs ──▶ PulseCounters / tach EdgeTimer (shared state)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{OutputPin as _, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use tripcomputer::adapters::hardware::HardwareAdapter;
use tripcomputer::adapters::log_sink::LogEventSink;
use tripcomputer::adapters::time::UptimeClock;
use tripcomputer::app::service::TripComputer;
use tripcomputer::config::TripConfig;
use tripcomputer::drivers::buzzer::Buzzer;
use tripcomputer::drivers::ds1307::Ds1307;
use tripcomputer::drivers::ds18b20::Ds18b20;
use tripcomputer::drivers::hd44780::Hd44780;
use tripcomputer::drivers::hw_init;
use tripcomputer::pins;
use tripcomputer::sensors::pulses::PULSE_COUNTERS;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TripComputer v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = TripConfig::with_override(option_env!("TRIP_CONFIG_JSON"));
    info!(
        "Config: tank={}L alarm={}L wheel={}m ppl={} threshold={}m window={}s",
        config.calibration.tank_capacity_l,
        config.calibration.alarm_level_l,
        config.calibration.wheel_circumference_m,
        config.calibration.pulses_per_liter,
        config.calibration.distance_threshold_m,
        config.calibration.window_secs,
    );

    // ── 3. Raw peripherals: ADC + pulse ISRs ──────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the pulse inputs there is nothing to compute.
        error!("HAL init failed: {} — halting", e);
        return Err(e.into());
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {} — halting", e);
        return Err(e.into());
    }

    // ── 4. Bus drivers ────────────────────────────────────────
    let p = Peripherals::take()?;

    let mut lcd = Hd44780::new(
        PinDriver::output(p.pins.gpio10.downgrade_output())?,
        PinDriver::output(p.pins.gpio11.downgrade_output())?,
        [
            PinDriver::output(p.pins.gpio12.downgrade_output())?,
            PinDriver::output(p.pins.gpio13.downgrade_output())?,
            PinDriver::output(p.pins.gpio14.downgrade_output())?,
            PinDriver::output(p.pins.gpio21.downgrade_output())?,
        ],
        Ets,
    );
    lcd.init()?;
    info!(
        "LCD ready (RS={} EN={} D4..D7={},{},{},{})",
        pins::LCD_RS_GPIO,
        pins::LCD_EN_GPIO,
        pins::LCD_D4_GPIO,
        pins::LCD_D5_GPIO,
        pins::LCD_D6_GPIO,
        pins::LCD_D7_GPIO,
    );

    let onewire = PinDriver::input_output_od(p.pins.gpio15)?;
    let thermometer = Ds18b20::new(onewire, Ets);

    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio8,
        p.pins.gpio9,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let rtc = Ds1307::new(i2c);

    let buzzer = Buzzer::new(PinDriver::output(p.pins.gpio16)?, FreeRtos);

    let mut hw = HardwareAdapter::new(rtc, thermometer, lcd, buzzer, config.tach_timeout_ms);
    let mut log_sink = LogEventSink::new();
    let uptime = UptimeClock::new();

    // ── 5. Trip computer ──────────────────────────────────────
    let loop_interval_ms = config.loop_interval_ms;
    let mut trip = TripComputer::new(config, &PULSE_COUNTERS);
    trip.start(uptime.uptime_ms(), &mut hw, &mut log_sink);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        trip.tick(uptime.uptime_ms(), &mut hw, &mut log_sink);
        FreeRtos::delay_ms(loop_interval_ms);
    }
}
