//! Unified error types for the panel sequencer.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply passed through the rule engine without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the sequencer funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The static configuration failed validation at setup time.
    Config(ConfigError),
    /// A hardware output write failed at runtime.
    Output(OutputError),
    /// An input event referenced a channel name not present in the
    /// configuration.
    NoSuchChannel,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Output(e) => write!(f, "output: {e}"),
            Self::NoSuchChannel => write!(f, "no such input channel"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors (setup time only)
// ---------------------------------------------------------------------------

/// Rejections raised while validating a [`PanelConfig`](crate::config::PanelConfig).
///
/// The process must not start with an invalid configuration, so none of
/// these can occur once the engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Two channels or two actuators share a name.
    DuplicateName(&'static str),
    /// A rule or guard references a channel that was never declared.
    UnknownChannel(&'static str),
    /// A rule references an actuator that was never declared.
    UnknownActuator(&'static str),
    /// More than one rule is bound to the same input channel.
    DuplicateRule(&'static str),
    /// Two timed rules would drive the same actuator.
    ActuatorAlreadyBound(&'static str),
    /// A rule uses its own channel as a guard condition.
    SelfGuard(&'static str),
    /// A drive level does not match the actuator's kind.
    KindMismatch(&'static str),
    /// A continuous drive level lies outside the actuator's bounds.
    LevelOutOfBounds(&'static str),
    /// A pulse or cycle phase duration is zero.
    ZeroDuration(&'static str),
    /// A fixed-capacity table cannot hold the declared entries.
    TableFull(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(n) => write!(f, "duplicate name '{n}'"),
            Self::UnknownChannel(n) => write!(f, "unknown channel '{n}'"),
            Self::UnknownActuator(n) => write!(f, "unknown actuator '{n}'"),
            Self::DuplicateRule(n) => write!(f, "channel '{n}' has more than one rule"),
            Self::ActuatorAlreadyBound(n) => {
                write!(f, "actuator '{n}' is driven by more than one timed rule")
            }
            Self::SelfGuard(n) => write!(f, "channel '{n}' guards on itself"),
            Self::KindMismatch(n) => write!(f, "level kind mismatch for actuator '{n}'"),
            Self::LevelOutOfBounds(n) => write!(f, "level out of bounds for actuator '{n}'"),
            Self::ZeroDuration(n) => write!(f, "zero duration in rule for channel '{n}'"),
            Self::TableFull(what) => write!(f, "{what} table full"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Output errors (hardware write failures)
// ---------------------------------------------------------------------------

/// Failure surfaced by an [`OutputPort`](crate::ports::OutputPort)
/// implementation. The engine abandons the in-flight pulse or cycle for the
/// affected actuator and reports the error upward — it never retries and
/// never silently no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OutputError {
    /// PWM duty-cycle write failed (continuous actuators).
    PwmWriteFailed,
    /// GPIO set failed (binary actuators).
    GpioWriteFailed,
    /// The output device is not reachable at all.
    Disconnected,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::Disconnected => write!(f, "output device disconnected"),
        }
    }
}

impl From<OutputError> for Error {
    fn from(e: OutputError) -> Self {
        Self::Output(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
