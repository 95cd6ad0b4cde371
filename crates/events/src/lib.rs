#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for the launchcore installation core
//!
//! This crate provides two observation surfaces for one pipeline run:
//!
//! - **Lifecycle events**: fire-and-forget [`InstallEvent`] values pushed
//!   over an unbounded channel, with a tracing level per event.
//! - **Task tracking**: the ordered, observable [`TaskTracker`] collection
//!   of per-step [`TaskRecord`]s, which listeners consume as consistent
//!   point-in-time snapshots.
//!
//! Neither surface performs I/O; rendering is the caller's concern.

pub mod lifecycle;
pub mod tracker;

pub use lifecycle::InstallEvent;
pub use tracker::{TaskId, TaskRecord, TaskStatus, TaskTracker};

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the lifecycle event sender
pub type EventSender = UnboundedSender<InstallEvent>;

/// Type alias for the lifecycle event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<InstallEvent>;

/// Create a new lifecycle event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting lifecycle events
///
/// Implementors hold an optional [`EventSender`]; emission is best-effort
/// and never fails the emitting operation.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: InstallEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if the receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }
}
