//! Scrollback entry model.
//!
//! An [`Entry`] is one input/output record in the scrollback. It is created
//! as a pending placeholder when input is committed and resolved exactly once
//! when the backend answers (or fails to).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier correlating a pending entry with its eventual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh, unique identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the backend should interpret submitted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Input is a shell command, run as-is.
    #[default]
    Manual,
    /// Input is a plain-language request the backend translates first.
    NaturalLanguage,
}

impl Mode {
    /// Wire name used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::NaturalLanguage => "natural_language",
        }
    }

    /// Parses a wire name. Unknown values yield `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "natural_language" => Some(Self::NaturalLanguage),
            _ => None,
        }
    }

    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::NaturalLanguage => "ai",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scrollback record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Correlation key, fixed for the lifetime of the entry.
    pub id: EntryId,
    /// Raw text as typed, or the backend's restatement of it.
    pub original_input: String,
    /// Command that was (or will be) run.
    pub command: String,
    /// Set only when the backend translated the input into a command.
    pub converted_command: Option<String>,
    /// Result text. Empty while the request is in flight.
    pub output: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// True when the backend reported failure or the request itself failed.
    pub is_error: bool,
    pub mode: Mode,
    /// Process exit status, when the backend reports one.
    pub return_code: Option<i32>,
    /// Diagnostic text the backend reported alongside a result.
    pub stderr: Option<String>,
}

impl Entry {
    /// Creates the optimistic placeholder for a freshly committed input.
    pub fn pending(id: EntryId, input: impl Into<String>, mode: Mode) -> Self {
        let input = input.into();
        Self {
            id,
            command: input.clone(),
            original_input: input,
            converted_command: None,
            output: String::new(),
            timestamp: Utc::now(),
            is_error: false,
            mode,
            return_code: None,
            stderr: None,
        }
    }

    /// Whether the entry is still waiting for its result.
    pub fn is_pending(&self) -> bool {
        self.output.is_empty()
    }

    /// Marks the entry as failed with the given message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.output = message.into();
        self.is_error = true;
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entry {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_entry_mirrors_input() {
        let entry = Entry::pending(EntryId::new(), "ls -la", Mode::Manual);
        assert_eq!(entry.original_input, "ls -la");
        assert_eq!(entry.command, "ls -la");
        assert!(entry.converted_command.is_none());
        assert!(entry.is_pending());
        assert!(!entry.is_error);
    }

    #[test]
    fn test_equality_is_by_id() {
        let id = EntryId::new();
        let a = Entry::pending(id, "pwd", Mode::Manual);
        let mut b = Entry::pending(id, "whoami", Mode::NaturalLanguage);
        b.output = "done".to_string();
        assert_eq!(a, b);

        let c = Entry::pending(EntryId::new(), "pwd", Mode::Manual);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fail_resolves_entry() {
        let mut entry = Entry::pending(EntryId::new(), "pwd", Mode::Manual);
        entry.fail("Error: boom");
        assert!(!entry.is_pending());
        assert!(entry.is_error);
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(Mode::from_wire("manual"), Some(Mode::Manual));
        assert_eq!(Mode::from_wire("natural_language"), Some(Mode::NaturalLanguage));
        assert_eq!(Mode::from_wire("shell"), None);
        assert_eq!(
            serde_json::to_string(&Mode::NaturalLanguage).unwrap(),
            "\"natural_language\""
        );
    }
}
