//! Logical input channels.
//!
//! An [`InputChannel`] holds the current press state of one switch or
//! virtual button. The presentation / hardware-binding layer delivers clean
//! press/release edges via [`InputChannel::set_state`]; electrical debounce
//! happens before events reach this type.
//!
//! `set_state` is idempotent: re-asserting the current state produces no
//! [`Transition`], so duplicate edge deliveries cannot double-fire rules.

/// A genuine state change on an input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: bool,
    pub to: bool,
}

/// One logical input with its current state and last-transition timestamp.
#[derive(Debug, Clone)]
pub struct InputChannel {
    name: &'static str,
    active: bool,
    last_transition_ms: u64,
}

impl InputChannel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            active: false,
            last_transition_ms: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply a press (`true`) or release (`false`) edge.
    ///
    /// Returns the [`Transition`] on genuine change, `None` if the channel
    /// was already in the requested state.
    pub fn set_state(&mut self, active: bool, now_ms: u64) -> Option<Transition> {
        if self.active == active {
            return None;
        }
        let transition = Transition {
            from: self.active,
            to: active,
        };
        self.active = active;
        self.last_transition_ms = now_ms;
        Some(transition)
    }

    /// Snapshot of the current state. Used as a guard condition by rules
    /// evaluating a different channel's transition.
    pub fn current_state(&self) -> bool {
        self.active
    }

    /// Monotonic timestamp of the most recent genuine transition.
    pub fn last_transition_ms(&self) -> u64 {
        self.last_transition_ms
    }
}
