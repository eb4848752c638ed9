//! Adapters — concrete implementations of the port traits.
//!
//! The core never touches hardware or the console directly; these types
//! sit on the outside of the port boundary. A GPIO-backed output port for a
//! real panel would live here too and implement the same traits.

pub mod clock;
pub mod log_sink;
pub mod sim;
