//! Port traits — the boundary between the sequencer core and the outside.
//!
//! ```text
//!   input edges ──▶ Panel (engine) ──▶ OutputPort (hardware writes)
//!                        │
//!                        ├──▶ EventSink   (structured events)
//!                        └──▶ StatusSink  (periodic snapshots)
//! ```
//!
//! Adapters implement these traits; the core consumes them via generics at
//! call sites, so the domain logic never touches hardware directly and the
//! whole engine is testable with recording mocks.

use crate::actuator::Level;
use crate::config::ActuatorId;
use crate::error::OutputError;
use crate::events::PanelEvent;
use crate::publisher::StatusReport;

/// Write-side port: the engine calls this to command actuators.
///
/// Implementations must surface hardware failures as [`OutputError`] rather
/// than silently no-op; the engine responds by abandoning the in-flight
/// pulse or cycle and reporting the failure upward.
pub trait OutputPort {
    fn write(&mut self, actuator: ActuatorId, level: Level) -> Result<(), OutputError>;
}

/// The engine emits structured [`PanelEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &PanelEvent);
}

/// Receives the status publisher's periodic snapshots. Implementations must
/// not block: the publisher runs on the engine's owner context.
pub trait StatusSink {
    fn publish(&mut self, report: &StatusReport);
}
