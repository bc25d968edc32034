//! Port traits: the boundary between the components and their collaborators.
//!
//! ```text
//!   Producer ──▶ Handle (mailbox) ──▶ Component ──▶ Output port traits
//! ```
//!
//! Output adapters (event log, telemetry recorder, the peer component's
//! mailbox, parameter storage) implement these traits.  Each component is
//! generic over a single bundle type implementing every port it drives, so
//! one recording mock can stand in for the whole outside world in tests.

use crate::error::StorageError;
use crate::math::ArithmeticRequest;

use super::commands::CommandResponse;
use super::events::AppEvent;
use super::telemetry::Telemetry;

// ───────────────────────────────────────────────────────────────
// Event and telemetry sinks
// ───────────────────────────────────────────────────────────────

/// Receives every event a component decides to deliver.  Throttled events
/// never reach the sink.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Receives telemetry channel writes.
pub trait TelemetrySink {
    fn record(&mut self, telemetry: &Telemetry);
}

// ───────────────────────────────────────────────────────────────
// Data ports between components
// ───────────────────────────────────────────────────────────────

/// Outbound result port of the evaluator.
pub trait ResultPort {
    fn publish(&mut self, value: f32);
}

/// Outbound request port of the router.
pub trait ArithmeticPort {
    fn submit(&mut self, request: ArithmeticRequest);
}

/// Completion reports back to the command dispatcher.
pub trait CommandResponsePort {
    fn respond(&mut self, response: CommandResponse);
}

// ───────────────────────────────────────────────────────────────
// Storage port (parameter persistence)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for parameters.
///
/// Keys are namespaced per component.  Writes MUST be atomic: no partial
/// record may be observable after a power loss.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Port bundles
// ───────────────────────────────────────────────────────────────

/// Everything the evaluator drives.
pub trait EvaluatorPorts:
    EventSink + TelemetrySink + ResultPort + CommandResponsePort + StoragePort
{
}

impl<T> EvaluatorPorts for T where
    T: EventSink + TelemetrySink + ResultPort + CommandResponsePort + StoragePort
{
}

/// Everything the router drives.
pub trait RouterPorts: EventSink + TelemetrySink + ArithmeticPort + CommandResponsePort {}

impl<T> RouterPorts for T where T: EventSink + TelemetrySink + ArithmeticPort + CommandResponsePort {}
