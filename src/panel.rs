//! Panel facade — the name-based external API over the id-based engine.
//!
//! [`Panel`] is what the presentation / hardware-binding layer talks to:
//!
//! - [`Panel::on_input_transition`] — the sole inbound event entry point.
//! - [`Panel::tick`] — advance time: dispatch due timers, then let the
//!   status publisher sample.
//! - [`Panel::read_actuator`] — snapshot reads for display polling.
//!
//! All I/O flows through port traits injected at call sites, so the whole
//! panel runs against mock adapters in tests.

use log::warn;

use crate::actuator::Level;
use crate::config::{ActuatorId, ChannelId, PanelConfig};
use crate::engine::sequence::CyclePhase;
use crate::engine::SequenceEngine;
use crate::error::{ConfigError, Error, Result};
use crate::ports::{EventSink, OutputPort, StatusSink};
use crate::publisher::StatusPublisher;

/// The assembled control panel: rule engine plus status publisher.
pub struct Panel {
    engine: SequenceEngine,
    publisher: StatusPublisher,
}

impl Panel {
    /// Validate `config` and build the panel. An invalid configuration is
    /// rejected here; the running panel has no configuration error paths.
    pub fn new(config: &PanelConfig) -> core::result::Result<Self, ConfigError> {
        let resolved = config.validate()?;
        let publisher = StatusPublisher::new(resolved.status_period_ms);
        Ok(Self {
            engine: SequenceEngine::new(resolved),
            publisher,
        })
    }

    /// Deliver one press (`active = true`) or release edge for the named
    /// channel. Duplicate edges are dropped (idempotent).
    pub fn on_input_transition(
        &mut self,
        channel: &str,
        active: bool,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some(id) = self.engine.channel_id(channel) else {
            warn!("input event for unknown channel '{channel}' dropped");
            return Err(Error::NoSuchChannel);
        };
        self.engine.on_input_transition(id, active, now_ms, out, sink)
    }

    /// Id-based variant of [`Panel::on_input_transition`], for callers that
    /// resolved channel names up front (e.g. the inbound queue's producer).
    pub fn on_input_edge(
        &mut self,
        channel: ChannelId,
        active: bool,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.engine.on_input_transition(channel, active, now_ms, out, sink)
    }

    /// Advance to `now_ms`: dispatch every due timer in deadline order,
    /// then publish a status snapshot if the publisher's period elapsed.
    pub fn tick(
        &mut self,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
        status: &mut impl StatusSink,
    ) -> Result<()> {
        let result = self.engine.poll_timers(now_ms, out, sink);
        // Status sampling happens even after an output fault: the snapshot
        // shows whatever the actuators actually hold.
        self.publisher.tick(now_ms, &self.engine, status);
        result
    }

    /// Snapshot of the named actuator's current level.
    pub fn read_actuator(&self, name: &str) -> Option<Level> {
        self.engine
            .actuator_id(name)
            .map(|id| self.engine.actuator_level(id))
    }

    /// Current cycle phase of the named actuator.
    pub fn cycle_phase(&self, name: &str) -> Option<CyclePhase> {
        self.engine.actuator_id(name).map(|id| self.engine.cycle_phase(id))
    }

    pub fn channel_id(&self, name: &str) -> Option<ChannelId> {
        self.engine.channel_id(name)
    }

    pub fn actuator_id(&self, name: &str) -> Option<ActuatorId> {
        self.engine.actuator_id(name)
    }

    /// Earliest pending timer deadline, for the owner loop's sleep.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.engine.next_deadline_ms()
    }

    /// Read access to the engine for diagnostics and tests.
    pub fn engine(&self) -> &SequenceEngine {
        &self.engine
    }
}
