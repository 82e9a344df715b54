//! Header line: session, mode, connectivity and backend directory.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use shellpilot_core::{Connectivity, Mode, SessionView};

use crate::icons::Icons;
use crate::theme::THEME;

/// Render the header.
pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    view: &SessionView<'_>,
    session_label: &str,
    backend_url: &str,
) {
    let mut parts = vec![
        Span::styled("shellpilot", THEME.title_style()),
        Span::raw(" | "),
        Span::styled(format!("session {}", session_label), THEME.muted_style()),
        Span::raw(" | "),
    ];

    let (mode_icon, mode_color) = match view.mode {
        Mode::Manual => (Icons::SHELL_PROMPT, THEME.text),
        Mode::NaturalLanguage => (Icons::AI_PROMPT, THEME.secondary),
    };
    parts.push(Span::styled(
        format!("{} {}", mode_icon, view.mode.label()),
        Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
    ));
    if !view.natural_language_enabled {
        parts.push(Span::styled(" (ai off)", Style::default().fg(THEME.text_dim)));
    }

    parts.push(Span::raw(" | "));
    let (status_icon, status_color) = match view.connectivity {
        Connectivity::Online => (Icons::ONLINE, THEME.success),
        Connectivity::Offline => (Icons::OFFLINE, THEME.error),
        Connectivity::Unknown => (Icons::OFFLINE, THEME.warning),
    };
    parts.push(Span::styled(
        format!("{} {} {}", status_icon, view.connectivity, backend_url),
        Style::default().fg(status_color),
    ));

    if let Some(dir) = view.backend_info.and_then(|info| info.working_directory.as_deref()) {
        parts.push(Span::raw(" | "));
        parts.push(Span::styled(dir.to_string(), Style::default().fg(THEME.info)));
    }

    let header = Paragraph::new(Line::from(parts)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(THEME.border)),
    );
    frame.render_widget(header, area);
}
