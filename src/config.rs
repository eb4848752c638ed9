//! Static panel configuration.
//!
//! The set of input channels, actuators, and rules is fixed at startup —
//! there is no runtime discovery and no file or network surface. A
//! [`PanelConfig`] is plain data; [`PanelConfig::validate`] resolves every
//! name to a dense index and rejects anything malformed, so the running
//! engine is total over well-formed ids and never fails on lookups.

use crate::actuator::{ActuatorKind, Level};
use crate::error::ConfigError;

/// Capacity of the channel table.
pub const MAX_CHANNELS: usize = 8;
/// Capacity of the actuator table (also sizes the timer table).
pub const MAX_ACTUATORS: usize = 8;
/// Capacity of the rule table.
pub const MAX_RULES: usize = 8;

// ---------------------------------------------------------------------------
// Ids (assigned by validation, dense per table)
// ---------------------------------------------------------------------------

/// Index of a declared input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId(pub(crate) usize);

impl ChannelId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a declared actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorId(pub(crate) usize);

impl ActuatorId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// One declared input channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub name: &'static str,
}

/// One declared actuator.
#[derive(Debug, Clone, Copy)]
pub struct ActuatorSpec {
    pub name: &'static str,
    pub kind: ActuatorKind,
}

/// One branch of a bounded pulse: the level to drive and how long to hold
/// it before the reversal fires.
#[derive(Debug, Clone, Copy)]
pub struct PulseBranch {
    pub level: Level,
    pub duration_ms: u64,
}

/// Declarative rule binding one channel to a behavior.
///
/// The two near-duplicate wiring variants of the original panel collapse
/// into this one shape: guard channel (or none), behavior kind, durations.
#[derive(Debug, Clone, Copy)]
pub enum RuleSpec {
    /// On activation, drive the actuator per the guard branch, then revert
    /// to `idle` after the branch duration. The guard deliberately selects
    /// both the drive level and the duration (guarded = short/strong pulse,
    /// unguarded = long/half pulse on the reference panel).
    Pulse {
        channel: &'static str,
        actuator: &'static str,
        guard: Option<&'static str>,
        when_guarded: PulseBranch,
        when_unguarded: PulseBranch,
        idle: Level,
    },
    /// On activation, toggle a self-repeating on/off cycle: start it if
    /// stopped, stop it (and drive `idle`) if running.
    Cycle {
        channel: &'static str,
        actuator: &'static str,
        active: Level,
        idle: Level,
        on_ms: u64,
        off_ms: u64,
    },
    /// Each activation flips a persistent boolean read as a guard by other
    /// rules. Drives no actuator.
    Latch { channel: &'static str },
}

impl RuleSpec {
    fn channel(&self) -> &'static str {
        match self {
            Self::Pulse { channel, .. }
            | Self::Cycle { channel, .. }
            | Self::Latch { channel } => channel,
        }
    }
}

/// The complete startup configuration.
#[derive(Debug, Clone, Copy)]
pub struct PanelConfig {
    pub channels: &'static [ChannelSpec],
    pub actuators: &'static [ActuatorSpec],
    pub rules: &'static [RuleSpec],
    /// Period of the status publisher's snapshot sampling.
    pub status_period_ms: u64,
}

// ---------------------------------------------------------------------------
// Resolved form (ids instead of names)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleKind {
    Pulse {
        actuator: ActuatorId,
        guard: Option<ChannelId>,
        when_guarded: PulseBranch,
        when_unguarded: PulseBranch,
        idle: Level,
    },
    Cycle {
        actuator: ActuatorId,
        active: Level,
        idle: Level,
        on_ms: u64,
        off_ms: u64,
    },
    Latch,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) channel: ChannelId,
    pub(crate) kind: RuleKind,
}

/// Validated configuration, consumed by the engine.
#[derive(Debug)]
pub(crate) struct ResolvedConfig {
    pub(crate) channels: heapless::Vec<ChannelSpec, MAX_CHANNELS>,
    pub(crate) actuators: heapless::Vec<ActuatorSpec, MAX_ACTUATORS>,
    pub(crate) rules: heapless::Vec<Rule, MAX_RULES>,
    pub(crate) status_period_ms: u64,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl PanelConfig {
    /// Resolve names to ids and reject malformed configurations.
    ///
    /// Checks: unique names, known references, no self-guards, at most one
    /// rule per channel, at most one timed rule per actuator, level kinds
    /// and bounds, and non-zero durations.
    pub(crate) fn validate(&self) -> Result<ResolvedConfig, ConfigError> {
        let mut channels: heapless::Vec<ChannelSpec, MAX_CHANNELS> = heapless::Vec::new();
        for spec in self.channels {
            if channels.iter().any(|c| c.name == spec.name) {
                return Err(ConfigError::DuplicateName(spec.name));
            }
            channels
                .push(*spec)
                .map_err(|_| ConfigError::TableFull("channel"))?;
        }

        let mut actuators: heapless::Vec<ActuatorSpec, MAX_ACTUATORS> = heapless::Vec::new();
        for spec in self.actuators {
            if actuators.iter().any(|a| a.name == spec.name) {
                return Err(ConfigError::DuplicateName(spec.name));
            }
            actuators
                .push(*spec)
                .map_err(|_| ConfigError::TableFull("actuator"))?;
        }

        let channel_id = |name: &'static str| -> Result<ChannelId, ConfigError> {
            channels
                .iter()
                .position(|c| c.name == name)
                .map(ChannelId)
                .ok_or(ConfigError::UnknownChannel(name))
        };
        let actuator_id = |name: &'static str| -> Result<ActuatorId, ConfigError> {
            actuators
                .iter()
                .position(|a| a.name == name)
                .map(ActuatorId)
                .ok_or(ConfigError::UnknownActuator(name))
        };

        let mut rules: heapless::Vec<Rule, MAX_RULES> = heapless::Vec::new();
        let mut channel_has_rule = [false; MAX_CHANNELS];
        let mut actuator_bound = [false; MAX_ACTUATORS];

        for spec in self.rules {
            let channel = channel_id(spec.channel())?;
            if channel_has_rule[channel.0] {
                return Err(ConfigError::DuplicateRule(spec.channel()));
            }
            channel_has_rule[channel.0] = true;

            let kind = match *spec {
                RuleSpec::Pulse {
                    channel: ch_name,
                    actuator,
                    guard,
                    when_guarded,
                    when_unguarded,
                    idle,
                } => {
                    let actuator_id = actuator_id(actuator)?;
                    let guard = match guard {
                        Some(g) => {
                            let gid = channel_id(g)?;
                            if gid == channel {
                                return Err(ConfigError::SelfGuard(ch_name));
                            }
                            Some(gid)
                        }
                        None => None,
                    };
                    let kind = actuators[actuator_id.0].kind;
                    check_level(kind, when_guarded.level, actuator)?;
                    check_level(kind, when_unguarded.level, actuator)?;
                    check_level(kind, idle, actuator)?;
                    if when_guarded.duration_ms == 0 || when_unguarded.duration_ms == 0 {
                        return Err(ConfigError::ZeroDuration(ch_name));
                    }
                    bind_actuator(&mut actuator_bound, actuator_id, actuator)?;
                    RuleKind::Pulse {
                        actuator: actuator_id,
                        guard,
                        when_guarded,
                        when_unguarded,
                        idle,
                    }
                }
                RuleSpec::Cycle {
                    channel: ch_name,
                    actuator,
                    active,
                    idle,
                    on_ms,
                    off_ms,
                } => {
                    let actuator_id = actuator_id(actuator)?;
                    let kind = actuators[actuator_id.0].kind;
                    check_level(kind, active, actuator)?;
                    check_level(kind, idle, actuator)?;
                    if on_ms == 0 || off_ms == 0 {
                        return Err(ConfigError::ZeroDuration(ch_name));
                    }
                    bind_actuator(&mut actuator_bound, actuator_id, actuator)?;
                    RuleKind::Cycle {
                        actuator: actuator_id,
                        active,
                        idle,
                        on_ms,
                        off_ms,
                    }
                }
                RuleSpec::Latch { .. } => RuleKind::Latch,
            };

            rules
                .push(Rule { channel, kind })
                .map_err(|_| ConfigError::TableFull("rule"))?;
        }

        if self.status_period_ms == 0 {
            return Err(ConfigError::ZeroDuration("status-publisher"));
        }

        Ok(ResolvedConfig {
            channels,
            actuators,
            rules,
            status_period_ms: self.status_period_ms,
        })
    }
}

fn check_level(
    kind: ActuatorKind,
    level: Level,
    actuator: &'static str,
) -> Result<(), ConfigError> {
    match (kind, level) {
        (ActuatorKind::Binary, Level::Scalar(_))
        | (ActuatorKind::Continuous { .. }, Level::Bit(_)) => {
            Err(ConfigError::KindMismatch(actuator))
        }
        _ if !kind.admits(level) => Err(ConfigError::LevelOutOfBounds(actuator)),
        _ => Ok(()),
    }
}

fn bind_actuator(
    bound: &mut [bool; MAX_ACTUATORS],
    id: ActuatorId,
    name: &'static str,
) -> Result<(), ConfigError> {
    if bound[id.0] {
        return Err(ConfigError::ActuatorAlreadyBound(name));
    }
    bound[id.0] = true;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference panel
// ---------------------------------------------------------------------------

/// The reference control panel: two hand switches and a latch driving a
/// servo and a pilot lamp.
///
/// - `hs-01`: momentary; pulses the `pl-01` servo — full throw for 5 s when
///   the `hs-03` latch is engaged, half throw for 10 s otherwise.
/// - `hs-02`: toggles a 3 s on / 1 s off cycle on the `pl-02` lamp.
/// - `hs-03`: pure latch, guard only.
pub fn default_panel() -> PanelConfig {
    const CHANNELS: &[ChannelSpec] = &[
        ChannelSpec { name: "hs-01" },
        ChannelSpec { name: "hs-02" },
        ChannelSpec { name: "hs-03" },
    ];
    const ACTUATORS: &[ActuatorSpec] = &[
        ActuatorSpec {
            name: "pl-01",
            kind: ActuatorKind::Continuous {
                min: -1.0,
                max: 1.0,
            },
        },
        ActuatorSpec {
            name: "pl-02",
            kind: ActuatorKind::Binary,
        },
    ];
    const RULES: &[RuleSpec] = &[
        RuleSpec::Pulse {
            channel: "hs-01",
            actuator: "pl-01",
            guard: Some("hs-03"),
            when_guarded: PulseBranch {
                level: Level::Scalar(1.0),
                duration_ms: 5_000,
            },
            when_unguarded: PulseBranch {
                level: Level::Scalar(0.5),
                duration_ms: 10_000,
            },
            idle: Level::Scalar(-1.0),
        },
        RuleSpec::Cycle {
            channel: "hs-02",
            actuator: "pl-02",
            active: Level::ON,
            idle: Level::OFF,
            on_ms: 3_000,
            off_ms: 1_000,
        },
        RuleSpec::Latch { channel: "hs-03" },
    ];
    PanelConfig {
        channels: CHANNELS,
        actuators: ACTUATORS,
        rules: RULES,
        status_period_ms: 100,
    }
}
