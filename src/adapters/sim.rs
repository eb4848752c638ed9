//! Simulated output port.
//!
//! Tracks levels in memory and logs every write — stands in for the GPIO /
//! PWM adapter of a physical panel so the full sequencer can run on a
//! development host.

use log::info;

use crate::actuator::Level;
use crate::config::{ActuatorId, MAX_ACTUATORS};
use crate::error::OutputError;
use crate::ports::OutputPort;

/// In-memory output adapter.
pub struct SimOutput {
    levels: [Option<Level>; MAX_ACTUATORS],
}

impl SimOutput {
    pub fn new() -> Self {
        Self {
            levels: [None; MAX_ACTUATORS],
        }
    }

    /// Last level written to `actuator`, if any write happened.
    pub fn level(&self, actuator: ActuatorId) -> Option<Level> {
        self.levels[actuator.index()]
    }
}

impl Default for SimOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for SimOutput {
    fn write(&mut self, actuator: ActuatorId, level: Level) -> Result<(), OutputError> {
        self.levels[actuator.index()] = Some(level);
        match level {
            Level::Bit(on) => info!("OUT  | #{} <- {}", actuator.index(), if on { "on" } else { "off" }),
            Level::Scalar(v) => info!("OUT  | #{} <- {:+.2}", actuator.index(), v),
        }
        Ok(())
    }
}
