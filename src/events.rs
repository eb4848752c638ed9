//! Outbound panel events.
//!
//! The engine emits these through the [`EventSink`](crate::ports::EventSink)
//! port. Adapters on the other side decide what to do with them — log to the
//! console, feed a GUI, publish over a socket.

use serde::Serialize;

use crate::engine::sequence::CyclePhase;
use crate::error::OutputError;

/// Structured events emitted by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PanelEvent {
    /// An input channel genuinely changed state.
    Transition {
        channel: &'static str,
        from: bool,
        to: bool,
    },

    /// A latch channel flipped its persistent guard flag.
    LatchChanged {
        channel: &'static str,
        engaged: bool,
    },

    /// A bounded pulse began; the reversal fires after `duration_ms`.
    PulseStarted {
        actuator: &'static str,
        duration_ms: u64,
    },

    /// A bounded pulse's reversal drove the actuator back to idle.
    PulseEnded { actuator: &'static str },

    /// A cycle was started by its toggle channel.
    CycleStarted { actuator: &'static str },

    /// A running cycle flipped phase on timer expiry.
    CyclePhaseChanged {
        actuator: &'static str,
        phase: CyclePhase,
    },

    /// A cycle was stopped by its toggle channel.
    CycleStopped { actuator: &'static str },

    /// A hardware write failed; the pulse/cycle on this actuator was
    /// abandoned.
    OutputFault {
        actuator: &'static str,
        error: OutputError,
    },
}
