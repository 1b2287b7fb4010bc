//! Colors for the dashboard.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub header: Color,
    pub header_selected: Color,
    pub unread: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    /// Neon on near-black.
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_highlight: Color::Rgb(42, 42, 42),
            header: Color::Rgb(136, 136, 136),
            header_selected: Color::Rgb(0, 255, 255),
            unread: Color::Rgb(255, 0, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    pub fn tab_style(&self, selected: bool, unread: bool) -> Style {
        let fg = match (selected, unread) {
            (true, _) => self.header_selected,
            (false, true) => self.unread,
            (false, false) => self.header,
        };
        let style = Style::default().fg(fg);
        if selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn cursor_style(&self) -> Style {
        Style::default()
            .bg(self.bg_highlight)
            .fg(self.border_focus)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::synthbrute()
    }
}
