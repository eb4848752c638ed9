//! Periodic status publisher.
//!
//! Samples every actuator's current level on a fixed period — much coarser
//! than any actuation timing — and hands the snapshot to a
//! [`StatusSink`](crate::ports::StatusSink). Reads are plain snapshot reads
//! on the engine's owner context: the publisher never blocks actuation and
//! may miss brief intermediate states, which is a presentation concern, not
//! a correctness one.

use serde::Serialize;

use crate::actuator::Level;
use crate::config::MAX_ACTUATORS;
use crate::engine::SequenceEngine;
use crate::ports::StatusSink;

/// One actuator's sampled level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActuatorStatus {
    pub name: &'static str,
    pub level: Level,
}

/// A point-in-time snapshot of every actuator.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Monotonic sample time in milliseconds.
    pub at_ms: u64,
    pub actuators: heapless::Vec<ActuatorStatus, MAX_ACTUATORS>,
}

/// Fixed-period snapshot sampler.
pub struct StatusPublisher {
    period_ms: u64,
    last_published_ms: Option<u64>,
}

impl StatusPublisher {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_published_ms: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Publish a snapshot if a full period elapsed since the last one.
    /// Returns `true` when a report was emitted.
    pub fn tick(
        &mut self,
        now_ms: u64,
        engine: &SequenceEngine,
        sink: &mut impl StatusSink,
    ) -> bool {
        let due = match self.last_published_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.period_ms,
        };
        if !due {
            return false;
        }
        self.last_published_ms = Some(now_ms);

        let mut actuators = heapless::Vec::new();
        for a in engine.actuators() {
            let _ = actuators.push(ActuatorStatus {
                name: a.name(),
                level: a.level(),
            });
        }
        sink.publish(&StatusReport { at_ms: now_ms, actuators });
        true
    }
}
