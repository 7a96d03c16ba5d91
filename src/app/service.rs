//! Trip computer service — the hexagonal core.
//!
//! [`TripComputer`] owns the scheduler, the low-fuel alarm latch and the
//! last good value of every reading. All I/O flows through port traits
//! injected at call sites, so the whole service runs against mocks.
//!
//! ```text
//!  ClockPort ────┐
//!  Thermometer ──┤   ┌──────────────────────────┐ ──▶ DisplayPort
//!  AnalogPort ───┼─▶ │       TripComputer       │ ──▶ BuzzerPort
//!  TachPort ─────┤   │ Scheduler · Alarm · Calc │ ──▶ EventSink
//!  PulseCounters ┘   └──────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::alarm::{AlarmAction, AlarmPolicy, AlarmState};
use crate::config::TripConfig;
use crate::consumption::{Consumption, compute_consumption};
use crate::display::{self, Field};
use crate::error::SensorError;
use crate::scheduler::{CadenceKind, Scheduler};
use crate::sensors::analog::{self, AnalogChannel};
use crate::sensors::pulses::PulseCounters;
use crate::sensors::tach;

use super::events::{SensorKind, TripEvent};
use super::ports::{CadenceDelegate, ClockTime, EventSink, TripHardware};

// ───────────────────────────────────────────────────────────────
// Readings
// ───────────────────────────────────────────────────────────────

/// Last good value of everything on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub time: Option<ClockTime>,
    pub temperature_c: Option<i16>,
    pub battery_v: f32,
    pub rpm: Option<u32>,
    pub fuel_percent: f32,
    pub consumption: Option<Consumption>,
}

/// Cadences that fired during one scheduler poll.
#[derive(Default)]
struct DueSet {
    fast: bool,
    slow: bool,
    snapshot: Option<CadenceKind>,
}

impl CadenceDelegate for DueSet {
    fn on_cadence(&mut self, kind: CadenceKind) {
        match kind {
            CadenceKind::Fast => self.fast = true,
            CadenceKind::Slow => self.slow = true,
            CadenceKind::Distance | CadenceKind::Window => self.snapshot = Some(kind),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// TripComputer
// ───────────────────────────────────────────────────────────────

/// The trip computer orchestrates every periodic task.
pub struct TripComputer<'a> {
    config: TripConfig,
    pulses: &'a PulseCounters,
    scheduler: Scheduler,
    alarm: AlarmPolicy,
    readings: Readings,
    snapshots: u32,
}

impl<'a> TripComputer<'a> {
    /// Construct the service. Call [`start`](Self::start) before the first
    /// [`tick`](Self::tick).
    pub fn new(config: TripConfig, pulses: &'a PulseCounters) -> Self {
        let scheduler = Scheduler::new(&config);
        let alarm = AlarmPolicy::new(&config);
        Self {
            config,
            pulses,
            scheduler,
            alarm,
            readings: Readings::default(),
            snapshots: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Zero the counters, draw every field once and restart all cadences
    /// from `now_ms`.
    pub fn start(
        &mut self,
        now_ms: u64,
        hw: &mut impl TripHardware,
        sink: &mut impl EventSink,
    ) {
        let discarded = self.pulses.take_raw_and_reset();
        if discarded.distance > 0 || discarded.flow_in > 0 || discarded.flow_out > 0 {
            debug!("Discarded pre-start pulses: {:?}", discarded);
        }

        self.refresh_fast(hw, sink);
        self.refresh_slow(hw, sink);
        self.draw(hw, Field::Consumption);

        self.scheduler.restart(now_ms);
        sink.emit(&TripEvent::Started);
        info!(
            "Trip computer started (tank {} L, alarm at {:.0}%)",
            self.config.calibration.tank_capacity_l,
            self.alarm.low_percent()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one main-loop iteration: poll the scheduler, then do whatever
    /// work fell due, in fast → slow → snapshot order.
    ///
    /// `hw` satisfies every hardware port at once to avoid double mutable
    /// borrows.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut impl TripHardware,
        sink: &mut impl EventSink,
    ) {
        let mut due = DueSet::default();
        let distance = self.pulses.distance_pulses();
        self.scheduler.tick(now_ms, distance, &mut due);

        if due.fast {
            self.refresh_fast(hw, sink);
        }
        if due.slow {
            self.refresh_slow(hw, sink);
        }
        if let Some(trigger) = due.snapshot {
            self.update_consumption(trigger, hw, sink);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn alarm_state(&self) -> AlarmState {
        self.alarm.state()
    }

    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    /// Number of consumption computations since start.
    pub fn snapshot_count(&self) -> u32 {
        self.snapshots
    }

    // ── Internal ──────────────────────────────────────────────

    /// Temperature, battery voltage, engine speed.
    fn refresh_fast(&mut self, hw: &mut impl TripHardware, sink: &mut impl EventSink) {
        match hw.read_celsius() {
            Ok(c) => {
                self.readings.temperature_c = Some(c);
                self.draw(hw, Field::Temperature);
            }
            // The first pipelined conversion is still running.
            Err(SensorError::NotReady) => {}
            Err(e) => self.sensor_fault(SensorKind::Thermometer, e, sink),
        }

        let raw = hw.read(AnalogChannel::BatteryVoltage);
        self.readings.battery_v = analog::battery_volts(
            raw,
            self.config.adc_full_scale,
            self.config.voltage_ref_v,
            self.config.voltage_divider,
        );
        self.draw(hw, Field::Voltage);

        self.readings.rpm = hw
            .read_pulse_width_us()
            .and_then(|w| tach::rpm_from_pulse_width(w, self.config.tach_pulses_per_rev));
        self.draw(hw, Field::Rpm);
    }

    /// Clock and fuel level; the fuel reading drives the alarm latch.
    fn refresh_slow(&mut self, hw: &mut impl TripHardware, sink: &mut impl EventSink) {
        match hw.read_time() {
            Ok(t) => {
                self.readings.time = Some(t);
                self.draw(hw, Field::Clock);
            }
            Err(e) => self.sensor_fault(SensorKind::Clock, e, sink),
        }

        let raw = hw.read(AnalogChannel::FuelLevel);
        let pct = analog::fuel_percent(raw, self.config.adc_full_scale, self.config.fuel_scale);
        self.readings.fuel_percent = pct;
        self.draw(hw, Field::Fuel);

        match self.alarm.evaluate(pct) {
            AlarmAction::Sound => {
                let tone = self.config.alarm_tone;
                hw.tone(tone.on_ms, tone.off_ms, tone.repeat);
                sink.emit(&TripEvent::LowFuelAlarm { fuel_percent: pct });
            }
            AlarmAction::Rearmed => {
                sink.emit(&TripEvent::AlarmRearmed { fuel_percent: pct });
            }
            AlarmAction::None => {}
        }
    }

    /// Snapshot the counters and recompute consumption.
    fn update_consumption(
        &mut self,
        trigger: CadenceKind,
        hw: &mut impl TripHardware,
        sink: &mut impl EventSink,
    ) {
        let raw = self.pulses.take_raw_and_reset();
        let consumption = compute_consumption(&raw.into(), &self.config.calibration);
        self.snapshots = self.snapshots.wrapping_add(1);
        self.readings.consumption = Some(consumption);
        self.draw(hw, Field::Consumption);

        debug!("{:?} snapshot {:?} -> {}", trigger, raw, consumption);
        sink.emit(&TripEvent::ConsumptionUpdated {
            trigger,
            pulses: raw,
            consumption,
        });
    }

    fn sensor_fault(&self, sensor: SensorKind, error: SensorError, sink: &mut impl EventSink) {
        warn!("{:?} read failed: {}; keeping last value", sensor, error);
        sink.emit(&TripEvent::SensorFault { sensor, error });
    }

    /// Render one field from the stored readings.
    fn draw(&self, hw: &mut impl TripHardware, field: Field) {
        let r = &self.readings;
        let text = match field {
            Field::Consumption => display::format_consumption(r.consumption.as_ref()),
            Field::Clock => match r.time {
                Some(t) => display::format_clock(t),
                None => return,
            },
            Field::Temperature => match r.temperature_c {
                Some(c) => display::format_temperature(c),
                None => return,
            },
            Field::Voltage => display::format_voltage(r.battery_v),
            Field::Rpm => display::format_rpm(r.rpm),
            Field::Fuel => display::format_fuel(r.fuel_percent),
        };
        let (row, col) = field.position();
        hw.write(row, col, &text);
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
