//! Cycle phase state machine.
//!
//! ```text
//!            start              timer
//!  Stopped ────────▶ On ◀──────────────▶ Off
//!     ▲              │        timer       │
//!     └──── stop ────┴─────── stop ───────┘
//! ```
//!
//! Initial state is `Stopped`; there is no terminal state. The engine owns
//! one [`Sequence`] per cycle-ruled actuator and drives it from the single
//! owner context, so phase flips and stop requests can never interleave.

use serde::Serialize;

/// Phase of a self-repeating on/off sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Stopped,
    On,
    Off,
}

/// A live timed process bound to one actuator.
#[derive(Debug, Clone, Copy)]
pub struct Sequence {
    phase: CyclePhase,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            phase: CyclePhase::Stopped,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != CyclePhase::Stopped
    }

    /// `Stopped → On`. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = CyclePhase::On;
        true
    }

    /// Any phase `→ Stopped`. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = CyclePhase::Stopped;
        true
    }

    /// Timer expiry: `On ↔ Off`. Returns the new phase, or `None` if the
    /// sequence is stopped (a stale fire — ignored, no flip occurs).
    pub fn flip(&mut self) -> Option<CyclePhase> {
        self.phase = match self.phase {
            CyclePhase::Stopped => return None,
            CyclePhase::On => CyclePhase::Off,
            CyclePhase::Off => CyclePhase::On,
        };
        Some(self.phase)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}
