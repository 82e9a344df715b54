//! Screen rendering.

mod header;
mod prompt;
mod scrollback;

pub use header::render_header;
pub use prompt::{render_help_line, render_prompt};
pub use scrollback::{entry_lines, render_scrollback};

use ratatui::prelude::*;

use crate::app::App;

/// Draws the whole screen.
pub fn render_app(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Scrollback
            Constraint::Length(3), // Input prompt
            Constraint::Length(1), // Help / notice line
        ])
        .split(frame.area());

    let view = app.session.view();
    render_header(frame, chunks[0], &view, &app.session_label, &app.backend_url);
    render_scrollback(frame, chunks[1], view.scrollback, app.tick);
    render_prompt(frame, chunks[2], &view);
    render_help_line(frame, chunks[3], app.notice.as_ref());
}
