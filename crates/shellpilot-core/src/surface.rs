//! Input line, selected mode and history cursor.

use thiserror::Error;
use tracing::debug;

use crate::entry::Mode;
use crate::history::NavigationHistory;

/// Why a mode change was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRejection {
    #[error("natural-language mode is not available on this backend")]
    NaturalLanguageUnavailable,
}

/// Editable prompt state.
#[derive(Debug, Clone, Default)]
pub struct InputSurface {
    input: String,
    mode: Mode,
    /// Position while browsing history; `None` when not browsing.
    cursor: Option<usize>,
}

impl InputSurface {
    pub fn new(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Selects `mode`. Natural language requires the backend capability.
    pub fn select_mode(
        &mut self,
        mode: Mode,
        natural_language_enabled: bool,
    ) -> Result<(), ModeRejection> {
        if mode == Mode::NaturalLanguage && !natural_language_enabled {
            debug!("Rejected natural-language mode selection");
            return Err(ModeRejection::NaturalLanguageUnavailable);
        }
        self.mode = mode;
        Ok(())
    }

    /// Switches to the other mode, subject to the same gate as [`Self::select_mode`].
    pub fn toggle_mode(&mut self, natural_language_enabled: bool) -> Result<Mode, ModeRejection> {
        let next = match self.mode {
            Mode::Manual => Mode::NaturalLanguage,
            Mode::NaturalLanguage => Mode::Manual,
        };
        self.select_mode(next, natural_language_enabled)?;
        Ok(next)
    }

    /// Drops back to manual mode when natural language stops being available.
    pub fn enforce_capability(&mut self, natural_language_enabled: bool) -> bool {
        if self.mode == Mode::NaturalLanguage && !natural_language_enabled {
            self.mode = Mode::Manual;
            return true;
        }
        false
    }

    /// Replaces the input with the previous history item, if any.
    pub fn recall_previous(&mut self, history: &NavigationHistory) {
        if let Some(recall) = history.recall_previous(self.cursor) {
            self.cursor = recall.cursor;
            self.input = recall.value;
        }
    }

    /// Replaces the input with the next history item, or clears it when
    /// browsing ends. Does nothing when not browsing.
    pub fn recall_next(&mut self, history: &NavigationHistory) {
        if let Some(recall) = history.recall_next(self.cursor) {
            self.cursor = recall.cursor;
            self.input = recall.value;
        }
    }

    /// Whether the current input may be committed.
    pub fn can_commit(&self, executing: bool) -> bool {
        !executing && !self.input.trim().is_empty()
    }
}
