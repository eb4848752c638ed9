//! Log-based sinks.
//!
//! [`LogEventSink`] writes structured panel events to the logger;
//! [`JsonStatusSink`] serializes status snapshots to JSON lines. A GUI or
//! socket adapter would implement the same traits.

use log::{info, warn};

use crate::events::PanelEvent;
use crate::ports::{EventSink, StatusSink};
use crate::publisher::StatusReport;

/// Adapter that logs every [`PanelEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::Transition { channel, from, to } => {
                info!("IN   | {} {} -> {}", channel, state(*from), state(*to));
            }
            PanelEvent::LatchChanged { channel, engaged } => {
                info!(
                    "LATCH| {} {}",
                    channel,
                    if *engaged { "engaged" } else { "released" }
                );
            }
            PanelEvent::PulseStarted {
                actuator,
                duration_ms,
            } => {
                info!("PULSE| {} started, reverses in {}ms", actuator, duration_ms);
            }
            PanelEvent::PulseEnded { actuator } => {
                info!("PULSE| {} ended", actuator);
            }
            PanelEvent::CycleStarted { actuator } => {
                info!("CYCLE| {} started", actuator);
            }
            PanelEvent::CyclePhaseChanged { actuator, phase } => {
                info!("CYCLE| {} -> {:?}", actuator, phase);
            }
            PanelEvent::CycleStopped { actuator } => {
                info!("CYCLE| {} stopped", actuator);
            }
            PanelEvent::OutputFault { actuator, error } => {
                warn!("FAULT| {} write failed: {}", actuator, error);
            }
        }
    }
}

fn state(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "idle"
    }
}

/// Adapter that emits each status snapshot as one JSON line.
pub struct JsonStatusSink;

impl JsonStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonStatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for JsonStatusSink {
    fn publish(&mut self, report: &StatusReport) {
        match serde_json::to_string(report) {
            Ok(json) => info!("STAT | {json}"),
            Err(e) => warn!("STAT | serialization failed: {e}"),
        }
    }
}
