//! Scrollback rendering.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use shellpilot_core::{Entry, Mode};

use crate::icons::Icons;
use crate::theme::THEME;

/// Lines for one entry: the prompt line, an optional translation line,
/// then the output or a spinner while pending.
pub fn entry_lines(entry: &Entry, tick: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let time = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
    let (icon, color) = match entry.mode {
        Mode::Manual => (Icons::SHELL_PROMPT, THEME.primary),
        Mode::NaturalLanguage => (Icons::AI_PROMPT, THEME.secondary),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", time), Style::default().fg(THEME.text_dim)),
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::styled(entry.original_input.clone(), Style::default().fg(THEME.text)),
    ]));

    if let Some(converted) = &entry.converted_command {
        lines.push(Line::from(vec![
            Span::raw("         "),
            Span::styled(format!("{} ", Icons::TRANSLATED), Style::default().fg(THEME.secondary)),
            Span::styled(converted.clone(), Style::default().fg(THEME.info)),
        ]));
    }

    if entry.is_pending() {
        lines.push(Line::from(Span::styled(
            format!("{} running...", Icons::spinner(tick)),
            Style::default().fg(THEME.warning),
        )));
        return lines;
    }

    let output_style = if entry.is_error { THEME.error_style() } else { Style::default().fg(THEME.text) };
    for line in entry.output.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), output_style)));
    }
    if let Some(stderr) = &entry.stderr {
        for line in stderr.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), THEME.error_style())));
        }
    }
    if let Some(code) = entry.return_code.filter(|code| *code != 0) {
        lines.push(Line::from(Span::styled(
            format!("{} exit {}", Icons::ERROR, code),
            THEME.error_style(),
        )));
    }

    lines
}

/// Render the scrollback, pinned to its newest lines.
pub fn render_scrollback(frame: &mut Frame, area: Rect, entries: &[Entry], tick: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border));
    let visible = usize::from(block.inner(area).height);

    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from(Span::styled(
            "Type a command and press Enter.",
            THEME.muted_style(),
        ))]
    } else {
        entries.iter().flat_map(|entry| entry_lines(entry, tick)).collect()
    };
    let skip = lines.len().saturating_sub(visible);

    let widget = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>()).block(block);
    frame.render_widget(widget, area);
}
