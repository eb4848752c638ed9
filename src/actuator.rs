//! Controllable outputs: pilot lamps (binary) and servos (continuous).
//!
//! An [`Actuator`] mirrors the last level successfully written to the
//! hardware. It is mutated only by the rule engine's owner context —
//! `set` is crate-private — so its value is always the result of the most
//! recently applied command or cycle tick. The presentation layer reads
//! snapshots through [`Actuator::level`].

use serde::Serialize;

/// A drive level for an actuator.
///
/// `Bit` levels go to binary outputs (lamps, relays); `Scalar` levels go to
/// continuous outputs (servo position, dimmer). Which variant an actuator
/// accepts is fixed by its [`ActuatorKind`] and checked at configuration
/// validation, never at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Bit(bool),
    Scalar(f32),
}

impl Level {
    /// Shorthand for the binary "on" level.
    pub const ON: Level = Level::Bit(true);
    /// Shorthand for the binary "off" level.
    pub const OFF: Level = Level::Bit(false);
}

/// The physical class of an output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorKind {
    /// On/off output (lamp, relay, LED).
    Binary,
    /// Bounded scalar output (servo, dimmer). Bounds are inclusive.
    Continuous { min: f32, max: f32 },
}

impl ActuatorKind {
    /// Whether `level` is a well-formed drive value for this kind.
    pub fn admits(&self, level: Level) -> bool {
        match (self, level) {
            (Self::Binary, Level::Bit(_)) => true,
            (Self::Continuous { min, max }, Level::Scalar(v)) => {
                v.is_finite() && v >= *min && v <= *max
            }
            _ => false,
        }
    }

    /// The level an actuator of this kind rests at before any command.
    pub fn resting_level(&self) -> Level {
        match self {
            Self::Binary => Level::OFF,
            Self::Continuous { min, .. } => Level::Scalar(*min),
        }
    }
}

/// One controllable output with its logical mirror value.
#[derive(Debug, Clone)]
pub struct Actuator {
    name: &'static str,
    kind: ActuatorKind,
    level: Level,
}

impl Actuator {
    pub fn new(name: &'static str, kind: ActuatorKind) -> Self {
        Self {
            name,
            kind,
            level: kind.resting_level(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    /// Snapshot of the last level applied. Brief intermediate states between
    /// reads may be missed by pollers; that is accepted.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Record a successfully applied level. Engine-internal: the level has
    /// already passed kind/bounds validation at setup time.
    pub(crate) fn set(&mut self, level: Level) {
        debug_assert!(
            self.kind.admits(level),
            "level {:?} rejected by '{}' ({:?})",
            level,
            self.name,
            self.kind
        );
        self.level = level;
    }
}
