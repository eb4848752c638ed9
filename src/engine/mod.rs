//! Sequence rule engine — the core state machine.
//!
//! Owns every channel, actuator, sequence, and pending reversal, and is the
//! only writer of actuator state. Two things make it tick:
//!
//! 1. [`SequenceEngine::on_input_transition`] — a press/release edge from
//!    the event-delivery context.
//! 2. [`SequenceEngine::poll_timers`] — due timers from the timer table
//!    (pulse reversals and cycle phase flips).
//!
//! Both run on the same owner context, so a cycle's phase flip and a
//! concurrent stop request are serialized by construction and can never
//! leave an actuator off physically but "active" logically.
//!
//! ## Timing invariants
//!
//! - At most one armed timer per actuator: starting a pulse or cycle on an
//!   actuator first cancels whatever reversal/flip was pending.
//! - Re-activating a pulse input while its reversal is pending cancels the
//!   stale reversal and re-arms with the freshly selected branch duration
//!   (never two independent reversals racing for one output).
//! - Releasing a momentary switch resets only that channel's own state; it
//!   never cancels a timed commitment already in progress.

pub mod sequence;

use log::{debug, error, info};

use crate::actuator::{Actuator, Level};
use crate::channel::InputChannel;
use crate::config::{
    ActuatorId, ChannelId, ResolvedConfig, Rule, RuleKind, MAX_ACTUATORS, MAX_CHANNELS, MAX_RULES,
};
use crate::error::{Error, Result};
use crate::events::PanelEvent;
use crate::ports::{EventSink, OutputPort};
use crate::timer::{TimerHandle, TimerService};
use sequence::{CyclePhase, Sequence};

struct ChannelSlot {
    input: InputChannel,
    /// Persistent guard flag, meaningful only for latch-ruled channels.
    latched: bool,
}

struct ActuatorSlot {
    actuator: Actuator,
    /// The one timer allowed to be armed for this actuator.
    pending: Option<TimerHandle>,
    seq: Sequence,
}

/// The rule engine. Construct via [`Panel`](crate::panel::Panel) or from a
/// validated configuration.
pub struct SequenceEngine {
    channels: heapless::Vec<ChannelSlot, MAX_CHANNELS>,
    actuators: heapless::Vec<ActuatorSlot, MAX_ACTUATORS>,
    rules: heapless::Vec<Rule, MAX_RULES>,
    rule_by_channel: [Option<u8>; MAX_CHANNELS],
    rule_by_actuator: [Option<u8>; MAX_ACTUATORS],
    timers: TimerService<ActuatorId, MAX_ACTUATORS>,
}

impl SequenceEngine {
    pub(crate) fn new(resolved: ResolvedConfig) -> Self {
        let mut channels = heapless::Vec::new();
        for spec in &resolved.channels {
            let _ = channels.push(ChannelSlot {
                input: InputChannel::new(spec.name),
                latched: false,
            });
        }
        let mut actuators = heapless::Vec::new();
        for spec in &resolved.actuators {
            let _ = actuators.push(ActuatorSlot {
                actuator: Actuator::new(spec.name, spec.kind),
                pending: None,
                seq: Sequence::new(),
            });
        }

        let mut rule_by_channel = [None; MAX_CHANNELS];
        let mut rule_by_actuator = [None; MAX_ACTUATORS];
        for (i, rule) in resolved.rules.iter().enumerate() {
            rule_by_channel[rule.channel.0] = Some(i as u8);
            match rule.kind {
                RuleKind::Pulse { actuator, .. } | RuleKind::Cycle { actuator, .. } => {
                    rule_by_actuator[actuator.0] = Some(i as u8);
                }
                RuleKind::Latch => {}
            }
        }

        info!(
            "engine up: {} channels, {} actuators, {} rules",
            channels.len(),
            actuators.len(),
            resolved.rules.len()
        );

        Self {
            channels,
            actuators,
            rules: resolved.rules,
            rule_by_channel,
            rule_by_actuator,
            timers: TimerService::new(),
        }
    }

    // ── Event entry points ────────────────────────────────────

    /// Apply one press/release edge. Idempotent re-assertions are dropped
    /// before any rule evaluates.
    pub fn on_input_transition(
        &mut self,
        channel: ChannelId,
        active: bool,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let slot = &mut self.channels[channel.0];
        let Some(transition) = slot.input.set_state(active, now_ms) else {
            debug!("'{}' already {}", slot.input.name(), if active { "active" } else { "idle" });
            return Ok(());
        };
        let name = slot.input.name();
        sink.emit(&PanelEvent::Transition {
            channel: name,
            from: transition.from,
            to: transition.to,
        });

        // Release resets only the input's own logical state. In-flight
        // pulses and running cycles are governed by their own timers.
        if !active {
            return Ok(());
        }

        let Some(rule_idx) = self.rule_by_channel[channel.0] else {
            return Ok(());
        };
        let rule = self.rules[rule_idx as usize];

        match rule.kind {
            RuleKind::Latch => {
                let slot = &mut self.channels[channel.0];
                slot.latched = !slot.latched;
                let engaged = slot.latched;
                info!("latch '{}' {}", name, if engaged { "engaged" } else { "released" });
                sink.emit(&PanelEvent::LatchChanged {
                    channel: name,
                    engaged,
                });
                Ok(())
            }

            RuleKind::Pulse {
                actuator,
                guard,
                when_guarded,
                when_unguarded,
                idle: _,
            } => {
                let guarded = guard.is_some_and(|g| self.guard_state(g));
                let branch = if guarded { when_guarded } else { when_unguarded };

                // A re-trigger cancels the stale reversal and re-arms with
                // the freshly selected branch.
                if let Some(handle) = self.actuators[actuator.0].pending.take() {
                    self.timers.cancel(handle);
                }
                self.drive(actuator, branch.level, out, sink)?;
                self.arm(actuator, branch.duration_ms, now_ms);
                sink.emit(&PanelEvent::PulseStarted {
                    actuator: self.actuators[actuator.0].actuator.name(),
                    duration_ms: branch.duration_ms,
                });
                Ok(())
            }

            RuleKind::Cycle {
                actuator,
                active: active_level,
                idle,
                on_ms,
                off_ms: _,
            } => {
                let actuator_name = self.actuators[actuator.0].actuator.name();
                if self.actuators[actuator.0].seq.is_active() {
                    // Stop: cancel the flip timer before touching the output
                    // so no further phase change can dispatch.
                    if let Some(handle) = self.actuators[actuator.0].pending.take() {
                        self.timers.cancel(handle);
                    }
                    self.actuators[actuator.0].seq.stop();
                    self.drive(actuator, idle, out, sink)?;
                    sink.emit(&PanelEvent::CycleStopped {
                        actuator: actuator_name,
                    });
                } else {
                    self.actuators[actuator.0].seq.start();
                    self.drive(actuator, active_level, out, sink)?;
                    self.arm(actuator, on_ms, now_ms);
                    sink.emit(&PanelEvent::CycleStarted {
                        actuator: actuator_name,
                    });
                }
                Ok(())
            }
        }
    }

    /// Dispatch every timer due at `now_ms`, serially, in deadline order.
    ///
    /// An output failure abandons the sequence on that actuator; remaining
    /// due timers (other actuators) are still dispatched and the first
    /// failure is reported.
    pub fn poll_timers(
        &mut self,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let fired = self.timers.poll(now_ms);
        let mut first_err = None;
        for actuator in fired {
            if let Err(e) = self.on_timer_fired(actuator, now_ms, out, sink) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn on_timer_fired(
        &mut self,
        actuator: ActuatorId,
        now_ms: u64,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some(rule_idx) = self.rule_by_actuator[actuator.0] else {
            return Ok(());
        };
        let rule = self.rules[rule_idx as usize];
        let name = self.actuators[actuator.0].actuator.name();
        self.actuators[actuator.0].pending = None;

        match rule.kind {
            RuleKind::Pulse { idle, .. } => {
                self.drive(actuator, idle, out, sink)?;
                sink.emit(&PanelEvent::PulseEnded { actuator: name });
                Ok(())
            }
            RuleKind::Cycle {
                active,
                idle,
                on_ms,
                off_ms,
                ..
            } => {
                let Some(phase) = self.actuators[actuator.0].seq.flip() else {
                    debug!("stale cycle fire for '{}' ignored", name);
                    return Ok(());
                };
                let (level, next_ms) = match phase {
                    CyclePhase::On => (active, on_ms),
                    CyclePhase::Off => (idle, off_ms),
                    CyclePhase::Stopped => return Ok(()),
                };
                self.drive(actuator, level, out, sink)?;
                self.arm(actuator, next_ms, now_ms);
                sink.emit(&PanelEvent::CyclePhaseChanged {
                    actuator: name,
                    phase,
                });
                Ok(())
            }
            RuleKind::Latch => Ok(()),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn channel_id(&self, name: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|c| c.input.name() == name)
            .map(ChannelId)
    }

    pub fn actuator_id(&self, name: &str) -> Option<ActuatorId> {
        self.actuators
            .iter()
            .position(|a| a.actuator.name() == name)
            .map(ActuatorId)
    }

    /// Snapshot of an actuator's current level.
    pub fn actuator_level(&self, id: ActuatorId) -> Level {
        self.actuators[id.0].actuator.level()
    }

    /// All actuators, for the status publisher's snapshot pass.
    pub fn actuators(&self) -> impl Iterator<Item = &Actuator> {
        self.actuators.iter().map(|slot| &slot.actuator)
    }

    /// Current cycle phase for an actuator (`Stopped` if it has no cycle).
    pub fn cycle_phase(&self, id: ActuatorId) -> CyclePhase {
        self.actuators[id.0].seq.phase()
    }

    /// Snapshot of a channel's momentary state.
    pub fn channel_state(&self, id: ChannelId) -> bool {
        self.channels[id.0].input.current_state()
    }

    /// Whether a latch channel's persistent flag is engaged.
    pub fn latched(&self, id: ChannelId) -> bool {
        self.channels[id.0].latched
    }

    /// Number of armed timers for an actuator. Invariant: at most 1.
    pub fn armed_timers(&self, id: ActuatorId) -> usize {
        self.timers.armed_count(id)
    }

    /// Earliest pending timer deadline, for the owner loop's sleep.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timers.next_deadline_ms()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Guard semantics: a latch channel contributes its persistent flag,
    /// any other channel its live momentary state.
    fn guard_state(&self, id: ChannelId) -> bool {
        match self.rule_by_channel[id.0] {
            Some(idx) if matches!(self.rules[idx as usize].kind, RuleKind::Latch) => {
                self.channels[id.0].latched
            }
            _ => self.channels[id.0].input.current_state(),
        }
    }

    /// Write a level through the output port and mirror it on success. On
    /// failure, abandon whatever pulse/cycle is in flight on the actuator,
    /// emit a fault event, and propagate the error.
    fn drive(
        &mut self,
        id: ActuatorId,
        level: Level,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let name = self.actuators[id.0].actuator.name();
        match out.write(id, level) {
            Ok(()) => {
                self.actuators[id.0].actuator.set(level);
                debug!("'{}' <- {:?}", name, level);
                Ok(())
            }
            Err(e) => {
                error!("output write to '{}' failed: {e} — abandoning sequence", name);
                self.abandon(id);
                sink.emit(&PanelEvent::OutputFault {
                    actuator: name,
                    error: e,
                });
                Err(Error::Output(e))
            }
        }
    }

    fn abandon(&mut self, id: ActuatorId) {
        let slot = &mut self.actuators[id.0];
        if let Some(handle) = slot.pending.take() {
            self.timers.cancel(handle);
        }
        slot.seq.stop();
    }

    fn arm(&mut self, id: ActuatorId, delay_ms: u64, now_ms: u64) {
        match self.timers.schedule_once(id, delay_ms, now_ms) {
            Some(handle) => self.actuators[id.0].pending = Some(handle),
            // Unreachable with the table sized to the actuator count and
            // at most one timer per actuator.
            None => error!(
                "timer table full — reversal for '{}' not armed",
                self.actuators[id.0].actuator.name()
            ),
        }
    }
}
