//! Explicit session handle.
//!
//! A [`Session`] owns every piece of per-session state (scrollback,
//! navigation history, capability flags and the prompt) and exposes only the
//! operations a front end needs. Multiple windows each hold their own
//! `Session`; nothing here is global.

use tracing::{debug, info};

use crate::backend::{Backend, BackendError, CommandOutcome, HealthResponse};
use crate::capability::{BackendInfo, CapabilityMonitor, Connectivity};
use crate::config::ShellConfig;
use crate::controller::{ExecutionController, PendingRequest, SubmitRejection};
use crate::entry::{Entry, EntryId, Mode};
use crate::error::ShellError;
use crate::history::NavigationHistory;
use crate::storage::{FileSessionStorage, MemoryStorage, SessionStorage};
use crate::surface::{InputSurface, ModeRejection};

/// Where a session keeps its navigation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryScope {
    /// Persisted under the given session identifier.
    Persistent(String),
    /// Kept in memory only.
    Ephemeral,
}

/// Everything a renderer needs to draw the session.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub scrollback: &'a [Entry],
    pub executing: bool,
    pub connectivity: Connectivity,
    pub natural_language_enabled: bool,
    pub mode: Mode,
    pub history_len: usize,
    pub input: &'a str,
    pub backend_info: Option<&'a BackendInfo>,
}

/// One interactive shell session.
#[derive(Debug)]
pub struct Session {
    controller: ExecutionController,
    history: NavigationHistory,
    monitor: CapabilityMonitor,
    surface: InputSurface,
}

impl Session {
    /// Creates a session in manual mode around a restored history.
    ///
    /// Natural-language mode becomes selectable once a health check reports
    /// the capability.
    pub fn new(history: NavigationHistory) -> Self {
        Self {
            controller: ExecutionController::new(),
            history,
            monitor: CapabilityMonitor::new(),
            surface: InputSurface::new(Mode::Manual),
        }
    }

    /// Opens a session using the history settings from `config`.
    pub fn open(config: &ShellConfig, scope: &HistoryScope) -> crate::error::Result<Self> {
        if config.history.max_items == 0 {
            return Err(ShellError::Config("history.max_items must be at least 1".to_string()));
        }

        let storage: Box<dyn SessionStorage> = match scope {
            HistoryScope::Ephemeral => Box::new(MemoryStorage::new()),
            HistoryScope::Persistent(session_id) => {
                let root = config
                    .history
                    .storage_root()
                    .map_err(|e| ShellError::Config(e.to_string()))?;
                Box::new(FileSessionStorage::open(&root, session_id)?)
            }
        };

        let history = NavigationHistory::restore_with_limit(storage, config.history.max_items);
        debug!(?scope, restored = history.len(), "Opened session");
        Ok(Self::new(history))
    }

    /// Commits the prompt's current input in the current mode.
    ///
    /// On success the prompt is cleared immediately; the returned request
    /// still has to be dispatched and its outcome fed to [`Self::complete`].
    pub fn commit(&mut self) -> Result<PendingRequest, SubmitRejection> {
        let input = self.surface.input().to_string();
        let pending = self.begin(&input, self.surface.mode())?;
        self.surface.clear_input();
        Ok(pending)
    }

    /// Accepts `input` in `mode` without going through the prompt.
    pub fn begin(&mut self, input: &str, mode: Mode) -> Result<PendingRequest, SubmitRejection> {
        let pending = self.controller.begin(input, mode)?;
        self.history.append(input);
        self.surface.reset_cursor();
        Ok(pending)
    }

    /// Routes a finished round trip back to its entry.
    pub fn complete(&mut self, id: EntryId, outcome: CommandOutcome) {
        let connectivity = self.controller.reconcile(id, outcome);
        self.monitor.record(connectivity);
    }

    /// Submits `input` and waits for the backend to answer.
    pub async fn submit(
        &mut self,
        input: &str,
        mode: Mode,
        backend: &dyn Backend,
    ) -> Result<EntryId, SubmitRejection> {
        let pending = self.begin(input, mode)?;
        let outcome = backend.dispatch(pending.mode, &pending.input).await;
        self.complete(pending.id, outcome);
        Ok(pending.id)
    }

    /// Runs one health check against `backend`.
    pub async fn check_health(&mut self, backend: &dyn Backend) -> Connectivity {
        let connectivity = self.monitor.check_health(backend).await;
        self.enforce_capability();
        connectivity
    }

    /// Applies a health check result obtained on another task.
    pub fn apply_health(&mut self, result: Result<HealthResponse, BackendError>) -> Connectivity {
        let connectivity = self.monitor.apply_health(result);
        self.enforce_capability();
        connectivity
    }

    fn enforce_capability(&mut self) {
        if self.surface.enforce_capability(self.monitor.natural_language_enabled()) {
            info!("Natural-language mode unavailable; switched to manual");
        }
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<(), ModeRejection> {
        self.surface
            .select_mode(mode, self.monitor.natural_language_enabled())
    }

    pub fn toggle_mode(&mut self) -> Result<Mode, ModeRejection> {
        self.surface.toggle_mode(self.monitor.natural_language_enabled())
    }

    pub fn recall_previous(&mut self) {
        self.surface.recall_previous(&self.history);
    }

    pub fn recall_next(&mut self) {
        self.surface.recall_next(&self.history);
    }

    pub fn push_char(&mut self, c: char) {
        self.surface.push_char(c);
    }

    pub fn pop_char(&mut self) {
        self.surface.pop_char();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.surface.set_input(input);
    }

    /// Empties the scrollback. History and flags are untouched.
    pub fn clear_scrollback(&mut self) {
        debug!(entries = self.controller.entries().len(), "Clearing scrollback");
        self.controller.clear_scrollback();
    }

    /// Empties the navigation history and its persisted copy.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.surface.reset_cursor();
    }

    pub fn can_commit(&self) -> bool {
        self.surface.can_commit(self.controller.is_executing())
    }

    pub fn is_executing(&self) -> bool {
        self.controller.is_executing()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.controller.entry(id)
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.surface.cursor()
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            scrollback: self.controller.entries(),
            executing: self.controller.is_executing(),
            connectivity: self.monitor.connectivity(),
            natural_language_enabled: self.monitor.natural_language_enabled(),
            mode: self.surface.mode(),
            history_len: self.history.len(),
            input: self.surface.input(),
            backend_info: self.monitor.info(),
        }
    }
}
