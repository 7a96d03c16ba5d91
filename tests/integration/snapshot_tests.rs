//! Snapshot-and-reset under concurrent pulse injection.
//!
//! A producer thread plays the ISRs while the test thread takes snapshots.
//! The host `critical-section` implementation is a global lock, which gives
//! the same mutual exclusion the interrupt mask gives on the target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tripcomputer::sensors::pulses::{PulseChannel, PulseCounters, RawCounts};

const ROUNDS: u32 = 20_000;

fn add(total: &mut RawCounts, raw: RawCounts) {
    total.flow_in += raw.flow_in;
    total.flow_out += raw.flow_out;
    total.distance += raw.distance;
}

#[test]
fn no_pulse_is_lost_or_double_counted() {
    let counters = PulseCounters::new();
    let done = AtomicBool::new(false);
    let mut total = RawCounts::ZERO;
    let mut snapshots = 0u32;

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..ROUNDS {
                counters.record(PulseChannel::FlowIn);
                counters.record(PulseChannel::FlowOut);
                counters.record(PulseChannel::Distance);
            }
            done.store(true, Ordering::Release);
        });

        while !done.load(Ordering::Acquire) {
            add(&mut total, counters.take_raw_and_reset());
            snapshots += 1;
        }
    });
    add(&mut total, counters.take_raw_and_reset());

    assert!(snapshots > 0);
    assert_eq!(
        total,
        RawCounts {
            flow_in: ROUNDS,
            flow_out: ROUNDS,
            distance: ROUNDS,
        }
    );
}

#[test]
fn every_snapshot_sees_a_consistent_triple() {
    // The producer records in-then-out-then-distance, so a snapshot that
    // read and cleared all three atomically can never see the running
    // totals out of that order, nor more than one round apart.
    let counters = PulseCounters::new();
    let done = AtomicBool::new(false);
    let mut total = RawCounts::ZERO;

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..ROUNDS {
                counters.record(PulseChannel::FlowIn);
                counters.record(PulseChannel::FlowOut);
                counters.record(PulseChannel::Distance);
            }
            done.store(true, Ordering::Release);
        });

        while !done.load(Ordering::Acquire) {
            add(&mut total, counters.take_raw_and_reset());
            assert!(total.flow_in >= total.flow_out, "{total:?}");
            assert!(total.flow_out >= total.distance, "{total:?}");
            assert!(total.flow_in - total.distance <= 1, "{total:?}");
        }
    });
}

#[test]
fn float_snapshot_matches_raw_counts() {
    let counters = PulseCounters::new();
    for _ in 0..7 {
        counters.record(PulseChannel::FlowOut);
    }
    let snap = counters.take_snapshot_and_reset();
    assert_eq!(snap.flow_out, 7.0);
    assert_eq!(snap.flow_in, 0.0);
    assert_eq!(counters.take_snapshot_and_reset().flow_out, 0.0);
}
