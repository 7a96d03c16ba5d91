//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured trip events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::TripEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`TripEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &TripEvent) {
        match event {
            TripEvent::Started => {
                info!("START | trip computer running");
            }
            TripEvent::ConsumptionUpdated {
                trigger,
                pulses,
                consumption,
            } => {
                info!(
                    "CONS  | {:?} | in={} out={} dist={} | {}",
                    trigger, pulses.flow_in, pulses.flow_out, pulses.distance, consumption
                );
            }
            TripEvent::LowFuelAlarm { fuel_percent } => {
                warn!("ALARM | low fuel {:.0}%", fuel_percent);
            }
            TripEvent::AlarmRearmed { fuel_percent } => {
                info!("ALARM | re-armed at {:.0}%", fuel_percent);
            }
            TripEvent::SensorFault { sensor, error } => {
                warn!("FAULT | {:?}: {}", sensor, error);
            }
        }
    }
}
