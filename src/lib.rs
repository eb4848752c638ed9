//! Timed I/O sequencer for panel switches and indicators.
//!
//! Maps discrete inputs (hand switches, virtual buttons) to timed actuator
//! outputs (pilot lamps, servos) under conditional and cyclic rules: guarded
//! bounded pulses, toggled on/off cycles, and pure latch guards. The core is
//! deterministic and hardware-agnostic — all I/O flows through port traits,
//! all time flows through `now_ms` parameters — so the entire engine runs
//! under test with mock adapters and explicit clocks.

#![deny(unused_must_use)]

pub mod actuator;
pub mod adapters;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod panel;
pub mod ports;
pub mod publisher;
pub mod queue;
pub mod timer;
