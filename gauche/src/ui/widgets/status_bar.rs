//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// Status bar showing progress counters and the latest message
pub struct StatusBarWidget<'a> {
    seen: usize,
    answered: u32,
    loading: bool,
    theme: &'a GameTheme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(seen: usize, answered: u32, theme: &'a GameTheme) -> Self {
        Self {
            seen,
            answered,
            loading: false,
            theme,
            message: None,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" Vues: {}", self.seen),
                Style::default().fg(self.theme.foreground),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("Réponses: {}", self.answered),
                Style::default().fg(self.theme.foreground),
            ),
        ];

        if self.loading {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "Chargement...",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(msg) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, self.theme.muted_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
