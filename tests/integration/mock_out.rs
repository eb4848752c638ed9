//! Mock adapters for integration tests.
//!
//! Records every output write and every emitted event so tests can assert
//! on the full command history without touching real GPIO/PWM registers.

use iopanel::actuator::Level;
use iopanel::config::ActuatorId;
use iopanel::error::OutputError;
use iopanel::events::PanelEvent;
use iopanel::ports::{EventSink, OutputPort, StatusSink};
use iopanel::publisher::StatusReport;

// ── RecordingOutput ───────────────────────────────────────────

pub struct RecordingOutput {
    pub writes: Vec<(ActuatorId, Level)>,
    pub fail_next: bool,
}

#[allow(dead_code)]
impl RecordingOutput {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            fail_next: false,
        }
    }

    /// Last level written to `actuator`, if any.
    pub fn last_level(&self, actuator: ActuatorId) -> Option<Level> {
        self.writes
            .iter()
            .rev()
            .find(|(id, _)| *id == actuator)
            .map(|(_, level)| *level)
    }

    /// Number of writes that hit `actuator`.
    pub fn write_count(&self, actuator: ActuatorId) -> usize {
        self.writes.iter().filter(|(id, _)| *id == actuator).count()
    }
}

impl Default for RecordingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for RecordingOutput {
    fn write(&mut self, actuator: ActuatorId, level: Level) -> Result<(), OutputError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(OutputError::GpioWriteFailed);
        }
        self.writes.push((actuator, level));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<PanelEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&PanelEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.events.push(*event);
    }
}

// ── RecordingStatus ───────────────────────────────────────────

pub struct RecordingStatus {
    pub reports: Vec<StatusReport>,
}

#[allow(dead_code)]
impl RecordingStatus {
    pub fn new() -> Self {
        Self { reports: Vec::new() }
    }
}

impl Default for RecordingStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for RecordingStatus {
    fn publish(&mut self, report: &StatusReport) {
        self.reports.push(report.clone());
    }
}
