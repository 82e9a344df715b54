//! Color theme for the shellpilot TUI.

use ratatui::style::{Color, Modifier, Style};

/// Terminal color palette.
#[derive(Debug, Clone, Copy)]
pub struct ShellTheme {
    // Brand colors
    pub primary: Color,
    pub secondary: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Text colors
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Border colors
    pub border: Color,
    pub border_active: Color,
}

/// Default dark palette.
pub const THEME: ShellTheme = ShellTheme {
    primary: Color::Rgb(0, 217, 255),
    secondary: Color::Rgb(168, 85, 247),
    success: Color::Rgb(16, 185, 129),
    warning: Color::Rgb(245, 158, 11),
    error: Color::Rgb(239, 68, 68),
    info: Color::Rgb(6, 182, 212),
    text: Color::Rgb(238, 238, 238),
    text_muted: Color::Rgb(128, 128, 128),
    text_dim: Color::Rgb(96, 96, 96),
    border: Color::Rgb(72, 72, 72),
    border_active: Color::Rgb(0, 217, 255),
};

impl ShellTheme {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }
}
