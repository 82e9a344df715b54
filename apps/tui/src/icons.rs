//! Status icons and visual indicators for the TUI.

/// Status icons for visual feedback.
pub struct Icons;

impl Icons {
    /// Success
    pub const SUCCESS: &'static str = "✓";

    /// Error / Failed
    pub const ERROR: &'static str = "✗";

    /// Backend reachable
    pub const ONLINE: &'static str = "●";

    /// Backend unreachable or not yet contacted
    pub const OFFLINE: &'static str = "○";

    /// Translated command
    pub const TRANSLATED: &'static str = "→";

    /// Natural-language prompt
    pub const AI_PROMPT: &'static str = "✦";

    /// Manual prompt
    pub const SHELL_PROMPT: &'static str = "$";

    /// Spinner frames for pending entries
    pub const SPINNER: [&'static str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    /// Spinner frame for the given tick.
    pub fn spinner(tick: usize) -> &'static str {
        Self::SPINNER[tick % Self::SPINNER.len()]
    }
}
