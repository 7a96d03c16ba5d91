//! Integration tests for the TripComputer → ports pipeline.
//!
//! Pulses are injected straight into a local `PulseCounters`, time is
//! driven by hand, and assertions are made on the mock screen, the tone
//! record and the emitted events.

use crate::mock_hw::{MockHardware, RecordingSink, Tone, fuel_raw};

use tripcomputer::alarm::AlarmState;
use tripcomputer::app::events::{SensorKind, TripEvent};
use tripcomputer::app::service::TripComputer;
use tripcomputer::config::TripConfig;
use tripcomputer::consumption::ConsumptionUnit;
use tripcomputer::error::SensorError;
use tripcomputer::scheduler::CadenceKind;
use tripcomputer::sensors::pulses::{PulseChannel, PulseCounters, RawCounts};

fn pulses(counters: &PulseCounters, flow_in: u32, flow_out: u32, distance: u32) {
    for _ in 0..flow_in {
        counters.record(PulseChannel::FlowIn);
    }
    for _ in 0..flow_out {
        counters.record(PulseChannel::FlowOut);
    }
    for _ in 0..distance {
        counters.record(PulseChannel::Distance);
    }
}

fn boot(counters: &PulseCounters) -> (TripComputer<'_>, MockHardware, RecordingSink) {
    let mut trip = TripComputer::new(TripConfig::default(), counters);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    trip.start(0, &mut hw, &mut sink);
    (trip, hw, sink)
}

fn consumption_events(sink: &RecordingSink) -> Vec<(CadenceKind, RawCounts, ConsumptionUnit, f32)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            TripEvent::ConsumptionUpdated {
                trigger,
                pulses,
                consumption,
            } => Some((*trigger, *pulses, consumption.unit, consumption.value)),
            _ => None,
        })
        .collect()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_draws_every_field() {
    let counters = PulseCounters::new();
    pulses(&counters, 10, 5, 3);
    let (trip, hw, sink) = boot(&counters);

    assert_eq!(counters.peek(), RawCounts::ZERO, "stale pulses cleared");
    assert_eq!(hw.field(0, 0, 11), " --.--     ");
    assert_eq!(hw.field(0, 15, 5), "12:00");
    assert_eq!(hw.field(1, 0, 6), "T  20C");
    assert_eq!(hw.field(2, 0, 9), "RPM  ----");
    assert_eq!(hw.field(3, 0, 16), "F 90% #########.");
    assert_eq!(sink.events, vec![TripEvent::Started]);
    assert_eq!(trip.alarm_state(), AlarmState::Armed);
    assert!(hw.tones.is_empty());
}

// ── Consumption ───────────────────────────────────────────────

#[test]
fn window_snapshot_of_moving_vehicle_reports_per_100km() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    // 261 × 1.915 m ≈ 499.8 m: under the distance threshold, so the
    // window is what triggers the snapshot.
    pulses(&counters, 900, 450, 261);
    trip.tick(59_980, &mut hw, &mut sink);
    assert!(consumption_events(&sink).is_empty());

    trip.tick(60_000, &mut hw, &mut sink);

    let updates = consumption_events(&sink);
    assert_eq!(updates.len(), 1);
    let (trigger, raw, unit, value) = updates[0];
    assert_eq!(trigger, CadenceKind::Window);
    assert_eq!(
        raw,
        RawCounts {
            flow_in: 900,
            flow_out: 450,
            distance: 261,
        }
    );
    assert_eq!(unit, ConsumptionUnit::LitersPer100Km);
    assert!((value - 200.074).abs() < 0.01, "got {value}");
    assert_eq!(hw.field(0, 0, 11), "200.07L/100");
    assert_eq!(counters.peek(), RawCounts::ZERO);
}

#[test]
fn distance_threshold_triggers_immediately() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    pulses(&counters, 900, 450, 262);
    trip.tick(20, &mut hw, &mut sink);

    let updates = consumption_events(&sink);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, CadenceKind::Distance);
    assert_eq!(trip.snapshot_count(), 1);

    // Counter was reset, so the next poll is quiet.
    trip.tick(40, &mut hw, &mut sink);
    assert_eq!(consumption_events(&sink).len(), 1);
}

#[test]
fn stationary_without_flow_shows_zero_per_minute() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    trip.tick(60_000, &mut hw, &mut sink);

    let c = trip.readings().consumption.expect("computed");
    assert_eq!(c.unit, ConsumptionUnit::LitersPerMinute);
    assert_eq!(c.value, 0.0);
    assert_eq!(hw.field(0, 0, 11), "  0.00L/min");
}

#[test]
fn idle_burn_is_per_minute_over_window() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    pulses(&counters, 450, 225, 0);
    trip.tick(60_000, &mut hw, &mut sink);

    assert_eq!(hw.field(0, 0, 11), "  0.50L/min");
}

#[test]
fn pulses_after_a_snapshot_belong_to_the_next_one() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    pulses(&counters, 100, 0, 0);
    trip.tick(60_000, &mut hw, &mut sink);
    pulses(&counters, 40, 0, 0);
    trip.tick(120_000, &mut hw, &mut sink);

    let flows: Vec<u32> = consumption_events(&sink)
        .iter()
        .map(|(_, raw, _, _)| raw.flow_in)
        .collect();
    assert_eq!(flows, vec![100, 40]);
}

#[test]
fn one_snapshot_per_tick_even_when_both_are_due() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    pulses(&counters, 900, 450, 600);
    trip.tick(60_000, &mut hw, &mut sink);

    let updates = consumption_events(&sink);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, CadenceKind::Distance);
}

// ── Fast / slow refresh ───────────────────────────────────────

#[test]
fn fast_cadence_refreshes_temperature_voltage_rpm() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    hw.celsius = Ok(-7);
    hw.tach_width_us = Some(20_000);
    trip.tick(999, &mut hw, &mut sink);
    assert_eq!(hw.field(1, 0, 6), "T  20C", "not due yet");

    trip.tick(1_000, &mut hw, &mut sink);
    assert_eq!(hw.field(1, 0, 6), "T  -7C");
    assert_eq!(hw.field(2, 0, 9), "RPM  3000");
    assert_eq!(trip.readings().rpm, Some(3_000));

    hw.tach_width_us = None;
    trip.tick(2_000, &mut hw, &mut sink);
    assert_eq!(hw.field(2, 0, 9), "RPM  ----");
}

#[test]
fn clock_fault_keeps_last_time_on_screen() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    hw.time = Err(SensorError::NoDevice);
    trip.tick(15_000, &mut hw, &mut sink);

    assert_eq!(hw.field(0, 15, 5), "12:00");
    assert_eq!(
        sink.count(|e| matches!(
            e,
            TripEvent::SensorFault {
                sensor: SensorKind::Clock,
                error: SensorError::NoDevice,
            }
        )),
        1
    );
}

#[test]
fn clock_updates_on_slow_cadence_only() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    hw.time = Ok(tripcomputer::app::ports::ClockTime {
        hours: 9,
        minutes: 41,
    });
    trip.tick(14_000, &mut hw, &mut sink);
    assert_eq!(hw.field(0, 15, 5), "12:00");
    trip.tick(15_000, &mut hw, &mut sink);
    assert_eq!(hw.field(0, 15, 5), "09:41");
}

// ── Low-fuel alarm ────────────────────────────────────────────

#[test]
fn fuel_falling_then_refilled_sounds_once_and_rearms() {
    let counters = PulseCounters::new();
    let (mut trip, mut hw, mut sink) = boot(&counters);

    for (i, pct) in [90, 50, 3, 50, 90].into_iter().enumerate() {
        hw.fuel_raw = fuel_raw(pct);
        trip.tick(15_000 * (i as u64 + 1), &mut hw, &mut sink);
    }

    assert_eq!(
        hw.tones,
        vec![Tone {
            on_ms: 500,
            off_ms: 250,
            repeat: 2,
        }]
    );
    assert_eq!(
        sink.count(|e| matches!(e, TripEvent::LowFuelAlarm { .. })),
        1
    );
    assert_eq!(
        sink.count(|e| matches!(e, TripEvent::AlarmRearmed { .. })),
        1
    );
    assert_eq!(trip.alarm_state(), AlarmState::Armed);
}

#[test]
fn low_fuel_at_boot_sounds_during_start() {
    let counters = PulseCounters::new();
    let mut trip = TripComputer::new(TripConfig::default(), &counters);
    let mut hw = MockHardware::new();
    hw.fuel_raw = fuel_raw(5);
    let mut sink = RecordingSink::new();

    trip.start(0, &mut hw, &mut sink);

    assert_eq!(hw.tones.len(), 1);
    assert_eq!(trip.alarm_state(), AlarmState::Disarmed);
    assert_eq!(hw.field(3, 0, 16), "F  5% ..........");
}
