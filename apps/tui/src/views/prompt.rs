//! Input prompt and help line.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use shellpilot_core::{Mode, SessionView};
use unicode_width::UnicodeWidthStr;

use crate::app::Notice;
use crate::icons::Icons;
use crate::theme::THEME;

/// Render the input prompt. Dimmed while a command is executing.
pub fn render_prompt(frame: &mut Frame, area: Rect, view: &SessionView<'_>) {
    let (icon, title) = match view.mode {
        Mode::Manual => (Icons::SHELL_PROMPT, " Command "),
        Mode::NaturalLanguage => (Icons::AI_PROMPT, " Ask "),
    };
    let (text_style, border_color) = if view.executing {
        (Style::default().fg(THEME.text_dim), THEME.border)
    } else {
        (Style::default().fg(THEME.text), THEME.border_active)
    };

    let prefix = format!("{} ", icon);
    let prompt = Paragraph::new(Line::from(vec![
        Span::styled(prefix.clone(), Style::default().fg(THEME.primary)),
        Span::styled(view.input.to_string(), text_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title),
    );
    frame.render_widget(prompt, area);

    if !view.executing {
        frame.set_cursor_position(cursor_position(area, &prefix, view.input));
    }
}

/// Cursor cell after the input, kept inside the prompt's border.
fn cursor_position(area: Rect, prefix: &str, input: &str) -> Position {
    let offset = u16::try_from(prefix.width() + input.width()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(1).saturating_add(offset);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    Position::new(x.min(max_x), area.y.saturating_add(1))
}

/// Render the help line, or the current notice when there is one.
pub fn render_help_line(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let line = match notice {
        Some(notice) if notice.is_error => {
            Line::from(Span::styled(format!("{} {}", Icons::ERROR, notice.message), THEME.error_style()))
        }
        Some(notice) => Line::from(Span::styled(
            format!("{} {}", Icons::SUCCESS, notice.message),
            Style::default().fg(THEME.info),
        )),
        None => Line::from(Span::styled(
            "Enter run | Tab mode | ↑↓ history | Ctrl+L clear | Ctrl+K forget history | Ctrl+R reconnect | Ctrl+C quit",
            THEME.muted_style(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_follows_input_width() {
        let area = Rect::new(0, 10, 40, 3);
        assert_eq!(cursor_position(area, "$ ", "ls"), Position::new(5, 11));
        // Wide characters take two cells
        assert_eq!(cursor_position(area, "$ ", "日本"), Position::new(7, 11));
    }

    #[test]
    fn test_cursor_clamped_for_very_wide_input() {
        let area = Rect::new(2, 0, 20, 3);
        let input = "x".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(cursor_position(area, "$ ", &input), Position::new(20, 1));
    }
}
