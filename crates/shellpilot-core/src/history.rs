//! Navigation history for shell-style up/down recall.
//!
//! This is a separate list from the scrollback: it holds only the raw strings
//! that were submitted, capped to the most recent [`MAX_HISTORY_ITEMS`], and
//! is mirrored to session storage after every change. Persistence is best
//! effort. A failed write is logged and the in-memory list stays
//! authoritative; unreadable persisted data is treated as an empty history.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::storage::{SessionStorage, StorageError};

/// Fixed storage key the history is persisted under.
pub const HISTORY_STORAGE_KEY: &str = "shellpilot.command_history";

/// Default number of submissions kept for recall.
pub const MAX_HISTORY_ITEMS: usize = 100;

/// Result of a recall step: the new cursor and the text to place in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recall {
    /// Index into the history, or `None` once browsing has ended.
    pub cursor: Option<usize>,
    pub value: String,
}

/// Ordered, bounded list of submitted inputs.
pub struct NavigationHistory {
    items: VecDeque<String>,
    max_items: usize,
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for NavigationHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationHistory")
            .field("items", &self.items)
            .field("max_items", &self.max_items)
            .finish_non_exhaustive()
    }
}

impl NavigationHistory {
    /// Loads any history persisted in `storage`.
    pub fn restore(storage: Box<dyn SessionStorage>) -> Self {
        Self::restore_with_limit(storage, MAX_HISTORY_ITEMS)
    }

    /// Loads any history persisted in `storage`, keeping at most `max_items`.
    pub fn restore_with_limit(storage: Box<dyn SessionStorage>, max_items: usize) -> Self {
        let max_items = max_items.max(1);
        let mut items = match load_items(storage.as_ref()) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable command history");
                VecDeque::new()
            }
        };
        while items.len() > max_items {
            items.pop_front();
        }
        debug!(count = items.len(), "Restored command history");
        Self { items, max_items, storage }
    }

    /// Appends a submitted input, evicting the oldest item past the cap.
    pub fn append(&mut self, input: impl Into<String>) {
        self.items.push_back(input.into());
        while self.items.len() > self.max_items {
            self.items.pop_front();
        }
        self.persist();
    }

    /// Empties the history and removes the persisted copy.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.remove(HISTORY_STORAGE_KEY) {
            warn!(error = %e, "Failed to remove persisted command history");
        }
    }

    /// Steps toward older items.
    ///
    /// Starting outside browse mode jumps to the newest item; at the oldest
    /// item the cursor stays put. Returns `None` when there is nothing to
    /// recall.
    pub fn recall_previous(&self, cursor: Option<usize>) -> Option<Recall> {
        let last = self.items.len().checked_sub(1)?;
        let index = match cursor {
            None => last,
            Some(i) => i.min(last).saturating_sub(1),
        };
        Some(Recall { cursor: Some(index), value: self.items[index].clone() })
    }

    /// Steps toward newer items.
    ///
    /// Only meaningful while browsing. Stepping past the newest item ends
    /// browse mode with an empty value.
    pub fn recall_next(&self, cursor: Option<usize>) -> Option<Recall> {
        let current = cursor?;
        let next = current + 1;
        if next < self.items.len() {
            Some(Recall { cursor: Some(next), value: self.items[next].clone() })
        } else {
            Some(Recall { cursor: None, value: String::new() })
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Items from oldest to newest.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(HISTORY_STORAGE_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist command history");
        }
    }
}

fn load_items(storage: &dyn SessionStorage) -> Result<VecDeque<String>, StorageError> {
    match storage.get(HISTORY_STORAGE_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(VecDeque::new()),
    }
}
