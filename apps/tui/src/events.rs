//! Channel-based completion events from spawned backend tasks.
//!
//! Round trips and health checks run on their own tasks so the draw loop
//! never waits on the network; their results come back over this channel
//! and are applied to the session on the UI task.

use shellpilot_core::{BackendError, CommandOutcome, EntryId, HealthResponse};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Results sent from background tasks to the UI task.
#[derive(Debug)]
pub enum AppEvent {
    /// A dispatched command finished, successfully or not.
    CommandFinished {
        entry_id: EntryId,
        outcome: CommandOutcome,
    },
    /// A health check finished.
    HealthChecked(Result<HealthResponse, BackendError>),
}

/// Creates a new event channel pair (sender, receiver).
pub fn create_event_channel() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}
