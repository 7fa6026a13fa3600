//! Button widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// A bordered, centered label with an optional key hint
pub struct ButtonWidget<'a> {
    label: &'a str,
    key_hint: Option<&'a str>,
    color: Color,
    theme: &'a GameTheme,
    focused: bool,
    enabled: bool,
}

impl<'a> ButtonWidget<'a> {
    pub fn new(label: &'a str, theme: &'a GameTheme) -> Self {
        Self {
            label,
            key_hint: None,
            color: theme.foreground,
            theme,
            focused: false,
            enabled: true,
        }
    }

    pub fn key_hint(mut self, hint: &'a str) -> Self {
        self.key_hint = Some(hint);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Widget for ButtonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.enabled && self.focused {
            self.theme.border_focused
        } else if self.enabled {
            self.color
        } else {
            self.theme.border
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = vec![Span::styled(
            self.label,
            self.theme.button_style(self.color, self.focused, self.enabled),
        )];
        if let Some(hint) = self.key_hint {
            spans.push(Span::styled(format!(" [{hint}]"), self.theme.muted_style()));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
