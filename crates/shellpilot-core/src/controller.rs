//! Session execution controller.
//!
//! Owns the scrollback and the single-flight execution gate. A committed
//! input becomes a pending [`Entry`] with a fresh [`EntryId`]; the eventual
//! backend outcome is routed back to that entry by id, never by position.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::{BackendError, CommandOutcome, CommandResponse};
use crate::capability::Connectivity;
use crate::entry::{Entry, EntryId, Mode};

/// Output shown when the backend reports success without any output.
pub const DEFAULT_SUCCESS_OUTPUT: &str = "Command executed successfully";

/// Output shown when the backend reports failure without output or error text.
pub const DEFAULT_FAILURE_OUTPUT: &str = "Error: Command failed";

/// Why a submission was not accepted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("input is blank")]
    BlankInput,
    #[error("a command is already executing")]
    AlreadyExecuting,
}

/// Execution gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    /// One request is in flight for the given entry.
    Executing { entry_id: EntryId },
}

/// A request accepted by the controller and waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: EntryId,
    pub mode: Mode,
    /// Untrimmed input exactly as committed.
    pub input: String,
}

/// Scrollback owner and execution state machine.
#[derive(Debug, Default)]
pub struct ExecutionController {
    entries: Vec<Entry>,
    index: HashMap<EntryId, usize>,
    state: ExecutionState,
}

impl ExecutionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `input`, appends its pending entry and enters the executing state.
    pub fn begin(&mut self, input: &str, mode: Mode) -> Result<PendingRequest, SubmitRejection> {
        if input.trim().is_empty() {
            return Err(SubmitRejection::BlankInput);
        }
        if let ExecutionState::Executing { entry_id } = self.state {
            debug!(%entry_id, "Dropping submission while executing");
            return Err(SubmitRejection::AlreadyExecuting);
        }

        let id = EntryId::new();
        self.index.insert(id, self.entries.len());
        self.entries.push(Entry::pending(id, input, mode));
        self.state = ExecutionState::Executing { entry_id: id };

        debug!(entry_id = %id, mode = %mode, "Submitted input");
        Ok(PendingRequest { id, mode, input: input.to_string() })
    }

    /// Applies the outcome of the request for `id` to its entry.
    ///
    /// Returns what the outcome says about backend reachability. The
    /// executing state ends when the outcome belongs to the in-flight request,
    /// even if the scrollback was cleared in the meantime.
    pub fn reconcile(&mut self, id: EntryId, outcome: CommandOutcome) -> Connectivity {
        let connectivity = match &outcome {
            Ok(_) => Connectivity::Online,
            Err(e) if e.backend_answered() => Connectivity::Online,
            Err(_) => Connectivity::Offline,
        };

        match self.index.get(&id).and_then(|&pos| self.entries.get_mut(pos)) {
            Some(entry) => match outcome {
                Ok(response) => apply_response(entry, response),
                Err(BackendError::Rejected { status, message }) => {
                    debug!(entry_id = %id, status, "Backend rejected request");
                    entry.fail(format!("Error: {}", message));
                }
                Err(BackendError::Transport(cause)) => {
                    entry.fail(format!("Error: Failed to reach backend: {}", cause));
                }
            },
            None => warn!(entry_id = %id, "No scrollback entry for outcome; it was cleared"),
        }

        if self.state == (ExecutionState::Executing { entry_id: id }) {
            self.state = ExecutionState::Idle;
        } else {
            warn!(entry_id = %id, "Outcome does not belong to the in-flight request");
        }
        connectivity
    }

    /// Empties the scrollback. The execution gate is left as is.
    pub fn clear_scrollback(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.index.get(&id).and_then(|&pos| self.entries.get(pos))
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn is_executing(&self) -> bool {
        matches!(self.state, ExecutionState::Executing { .. })
    }
}

/// Overwrites the entry from a success body, keeping known values for
/// anything the backend left out.
fn apply_response(entry: &mut Entry, response: CommandResponse) {
    let mode = response.parsed_mode();
    if let Some(query) = response.original_query {
        entry.original_input = query;
    }
    if let Some(command) = response.command {
        entry.command = command;
    }
    if response.converted_command.is_some() {
        entry.converted_command = response.converted_command;
    }
    let mut stderr = response.error.filter(|e| !e.is_empty());
    entry.output = match response.output.filter(|output| !output.is_empty()) {
        Some(output) => output,
        None if response.success => DEFAULT_SUCCESS_OUTPUT.to_string(),
        // A failure without output reports its diagnostic as the output
        None => stderr
            .take()
            .map_or_else(|| DEFAULT_FAILURE_OUTPUT.to_string(), |e| format!("Error: {}", e)),
    };
    entry.is_error = !response.success;
    if let Some(mode) = mode {
        entry.mode = mode;
    }
    entry.return_code = response.return_code;
    entry.stderr = stderr;
}
