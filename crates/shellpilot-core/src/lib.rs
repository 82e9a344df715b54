//! shellpilot core: the session state machine behind the terminal client.
//!
//! Input committed at the prompt becomes a uniquely identified scrollback
//! entry, is dispatched to the execution backend in manual or
//! natural-language mode, and is reconciled back onto that same entry when
//! the backend answers. A separate navigation history supports shell-style
//! recall and persists for the lifetime of the client session.

pub mod backend;
pub mod capability;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod history;
pub mod session;
pub mod storage;
pub mod surface;

pub use backend::{Backend, BackendError, CommandOutcome, CommandResponse, HealthResponse, HttpBackend};
pub use capability::{BackendInfo, CapabilityMonitor, Connectivity};
pub use config::ShellConfig;
pub use controller::{ExecutionController, ExecutionState, PendingRequest, SubmitRejection};
pub use entry::{Entry, EntryId, Mode};
pub use error::{Result, ShellError};
pub use history::{HISTORY_STORAGE_KEY, NavigationHistory};
pub use session::{HistoryScope, Session, SessionView};
pub use storage::{FileSessionStorage, MemoryStorage, SessionStorage};
pub use surface::{InputSurface, ModeRejection};
