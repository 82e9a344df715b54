//! Application state and key handling.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use shellpilot_core::{Backend, Connectivity, Mode, Session, SubmitRejection};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::events::{AppEvent, create_event_channel};

/// Transient status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: true }
    }
}

/// Main application.
pub struct App {
    /// Session state
    pub session: Session,
    /// Label shown in the header
    pub session_label: String,
    /// Backend base URL shown in the header
    pub backend_url: String,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status line message, cleared on the next key press
    pub notice: Option<Notice>,
    /// Spinner frame counter
    pub tick: usize,
    backend: Arc<dyn Backend>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Mode to select once the first health check answers.
    preferred_mode: Option<Mode>,
}

impl App {
    pub fn new(
        session: Session,
        backend: Arc<dyn Backend>,
        session_label: impl Into<String>,
        backend_url: impl Into<String>,
        preferred_mode: Mode,
    ) -> Self {
        let (events_tx, events_rx) = create_event_channel();
        Self {
            session,
            session_label: session_label.into(),
            backend_url: backend_url.into(),
            should_quit: false,
            notice: None,
            tick: 0,
            backend,
            events_tx,
            events_rx,
            preferred_mode: (preferred_mode != Mode::Manual).then_some(preferred_mode),
        }
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        self.notice = None;

        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('c') | KeyCode::Char('d') => self.should_quit = true,
                KeyCode::Char('l') => self.session.clear_scrollback(),
                KeyCode::Char('k') => {
                    self.session.clear_history();
                    self.notice = Some(Notice::info("History cleared"));
                }
                KeyCode::Char('r') => {
                    self.request_health();
                    self.notice = Some(Notice::info("Checking backend..."));
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char(c) => self.session.push_char(c),
            KeyCode::Backspace => self.session.pop_char(),
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.session.recall_previous(),
            KeyCode::Down => self.session.recall_next(),
            KeyCode::Tab => {
                if let Err(rejection) = self.session.toggle_mode() {
                    self.notice = Some(Notice::error(rejection.to_string()));
                }
            }
            KeyCode::Esc => self.session.set_input(""),
            _ => {}
        }
    }

    /// Commits the prompt and dispatches it on a background task.
    pub fn submit(&mut self) {
        let pending = match self.session.commit() {
            Ok(pending) => pending,
            Err(SubmitRejection::BlankInput) => return,
            Err(rejection @ SubmitRejection::AlreadyExecuting) => {
                self.notice = Some(Notice::error(rejection.to_string()));
                return;
            }
        };

        debug!(entry_id = %pending.id, mode = %pending.mode, "Dispatching command");
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = backend.dispatch(pending.mode, &pending.input).await;
            let _ = tx.send(AppEvent::CommandFinished { entry_id: pending.id, outcome });
        });
    }

    /// Runs a health check on a background task.
    pub fn request_health(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::HealthChecked(backend.health().await));
        });
    }

    /// Re-checks health every `period` until the app is dropped.
    pub fn spawn_periodic_health(&self, period: Duration) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; startup already checked.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::HealthChecked(backend.health().await)).is_err() {
                    break;
                }
            }
        })
    }

    /// Applies every event that has already arrived. Returns how many.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next event and applies it.
    pub async fn wait_for_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CommandFinished { entry_id, outcome } => {
                self.session.complete(entry_id, outcome);
            }
            AppEvent::HealthChecked(result) => {
                let answered = result.is_ok();
                let connectivity = self.session.apply_health(result);
                info!(%connectivity, "Health check finished");
                if answered {
                    self.apply_preferred_mode();
                } else if connectivity == Connectivity::Offline {
                    warn!(url = %self.backend_url, "Backend unreachable");
                }
            }
        }
    }

    fn apply_preferred_mode(&mut self) {
        if let Some(mode) = self.preferred_mode.take() {
            if let Err(rejection) = self.session.select_mode(mode) {
                self.notice = Some(Notice::error(format!("{}; staying in manual mode", rejection)));
            }
        }
    }

    /// Advances the spinner.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}
