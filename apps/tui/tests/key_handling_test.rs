//! Key handling against an in-process backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyModifiers};
use shellpilot_core::{
    Backend, BackendError, CommandOutcome, CommandResponse, Connectivity, HealthResponse,
    MemoryStorage, Mode, NavigationHistory, Session,
};
use shellpilot_tui::app::App;

/// Echoes every command back and reports a fixed capability.
struct EchoBackend {
    natural_language: bool,
    health_checks: AtomicUsize,
}

impl EchoBackend {
    fn new(natural_language: bool) -> Arc<Self> {
        Arc::new(Self { natural_language, health_checks: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl Backend for EchoBackend {
    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        Ok(HealthResponse {
            gemini_configured: self.natural_language,
            status: Some("healthy".to_string()),
            working_directory: Some("/srv".to_string()),
        })
    }

    async fn execute(&self, cmd: &str) -> CommandOutcome {
        Ok(CommandResponse {
            success: true,
            command: Some(cmd.to_string()),
            output: Some(format!("ran {}", cmd)),
            mode: Some("manual".to_string()),
            ..Default::default()
        })
    }

    async fn natural_language(&self, query: &str) -> CommandOutcome {
        Ok(CommandResponse {
            success: true,
            original_query: Some(query.to_string()),
            command: Some("ls".to_string()),
            converted_command: Some("ls".to_string()),
            output: Some("a b".to_string()),
            mode: Some("natural_language".to_string()),
            ..Default::default()
        })
    }
}

/// Never answers a command.
struct SilentBackend;

#[async_trait]
impl Backend for SilentBackend {
    async fn health(&self) -> Result<HealthResponse, BackendError> {
        Err(BackendError::Transport("backend not reachable".to_string()))
    }

    async fn execute(&self, _cmd: &str) -> CommandOutcome {
        std::future::pending().await
    }

    async fn natural_language(&self, _query: &str) -> CommandOutcome {
        std::future::pending().await
    }
}

fn app_with(backend: Arc<dyn Backend>, preferred: Mode) -> App {
    let session = Session::new(NavigationHistory::restore(Box::new(MemoryStorage::new())));
    App::new(session, backend, "test", "http://localhost:5000", preferred)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
    }
}

#[tokio::test]
async fn test_enter_dispatches_and_reconciles() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    type_text(&mut app, "ls -la");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

    let view = app.session.view();
    assert!(view.executing);
    assert_eq!(view.input, "");
    assert!(view.scrollback[0].is_pending());

    assert!(app.wait_for_event().await);
    let view = app.session.view();
    assert!(!view.executing);
    assert_eq!(view.scrollback.len(), 1);
    assert_eq!(view.scrollback[0].output, "ran ls -la");
    assert_eq!(view.connectivity, Connectivity::Online);
}

#[tokio::test]
async fn test_enter_while_executing_shows_notice() {
    let mut app = app_with(Arc::new(SilentBackend), Mode::Manual);
    type_text(&mut app, "sleep 100");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

    type_text(&mut app, "pwd");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

    assert!(app.notice.as_ref().is_some_and(|notice| notice.is_error));
    assert_eq!(app.session.view().input, "pwd");
    assert_eq!(app.session.view().scrollback.len(), 1);
    assert_eq!(app.session.history().len(), 1);
}

#[tokio::test]
async fn test_blank_enter_is_ignored() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    type_text(&mut app, "   ");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

    assert!(app.notice.is_none());
    assert!(!app.session.is_executing());
    assert!(app.session.view().scrollback.is_empty());
}

#[tokio::test]
async fn test_tab_rejected_without_capability() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    app.request_health();
    app.wait_for_event().await;

    app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
    assert_eq!(app.session.view().mode, Mode::Manual);
    assert!(app.notice.as_ref().is_some_and(|notice| notice.is_error));
}

#[tokio::test]
async fn test_tab_toggles_with_capability() {
    let mut app = app_with(EchoBackend::new(true), Mode::Manual);
    app.request_health();
    app.wait_for_event().await;

    app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
    assert_eq!(app.session.view().mode, Mode::NaturalLanguage);

    type_text(&mut app, "list files");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
    app.wait_for_event().await;

    let entry = &app.session.view().scrollback[0];
    assert_eq!(entry.mode, Mode::NaturalLanguage);
    assert_eq!(entry.converted_command.as_deref(), Some("ls"));

    app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
    assert_eq!(app.session.view().mode, Mode::Manual);
}

#[tokio::test]
async fn test_preferred_mode_applies_after_first_health_check() {
    let mut app = app_with(EchoBackend::new(true), Mode::NaturalLanguage);
    assert_eq!(app.session.view().mode, Mode::Manual);

    app.request_health();
    app.wait_for_event().await;
    assert_eq!(app.session.view().mode, Mode::NaturalLanguage);
    let info = app.session.view().backend_info.cloned().unwrap();
    assert_eq!(info.working_directory.as_deref(), Some("/srv"));
}

#[tokio::test]
async fn test_preferred_mode_unavailable_stays_manual() {
    let mut app = app_with(EchoBackend::new(false), Mode::NaturalLanguage);
    app.request_health();
    app.wait_for_event().await;

    assert_eq!(app.session.view().mode, Mode::Manual);
    assert!(app.notice.as_ref().is_some_and(|notice| notice.is_error));
}

#[tokio::test]
async fn test_failed_health_marks_offline() {
    let mut app = app_with(Arc::new(SilentBackend), Mode::Manual);
    app.request_health();
    app.wait_for_event().await;
    assert_eq!(app.session.view().connectivity, Connectivity::Offline);
}

#[tokio::test]
async fn test_history_recall_keys() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    for cmd in ["first", "second"] {
        type_text(&mut app, cmd);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.wait_for_event().await;
    }

    app.handle_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "second");
    app.handle_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "first");
    app.handle_key(KeyCode::Up, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "first");
    app.handle_key(KeyCode::Down, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "second");
    app.handle_key(KeyCode::Down, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "");
}

#[tokio::test]
async fn test_editing_keys() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    type_text(&mut app, "lss");
    app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "ls");
    app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(app.session.view().input, "");
}

#[tokio::test]
async fn test_control_keys() {
    let mut app = app_with(EchoBackend::new(false), Mode::Manual);
    type_text(&mut app, "ls");
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
    app.wait_for_event().await;

    app.handle_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
    assert!(app.session.view().scrollback.is_empty());
    assert_eq!(app.session.history().len(), 1);

    app.handle_key(KeyCode::Char('k'), KeyModifiers::CONTROL);
    assert!(app.session.history().is_empty());
    // Ctrl+K does not type into the prompt
    assert_eq!(app.session.view().input, "");

    assert!(!app.should_quit);
    app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_ctrl_r_rechecks_health() {
    let backend = EchoBackend::new(true);
    let mut app = app_with(backend.clone(), Mode::Manual);
    app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL);
    app.wait_for_event().await;

    assert_eq!(backend.health_checks.load(Ordering::SeqCst), 1);
    assert!(app.session.view().natural_language_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_health_checks() {
    let backend = EchoBackend::new(false);
    let mut app = app_with(backend.clone(), Mode::Manual);
    let handle = app.spawn_periodic_health(std::time::Duration::from_secs(30));

    app.wait_for_event().await;
    app.wait_for_event().await;
    assert_eq!(backend.health_checks.load(Ordering::SeqCst), 2);
    handle.abort();
}
