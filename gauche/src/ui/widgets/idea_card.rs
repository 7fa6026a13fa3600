//! Idea card widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use gauche_core::{Idea, Phase};

use crate::ui::theme::GameTheme;

/// Width of each loading bar, as a fraction of the inner width
const BAR_WIDTHS: [u16; 3] = [80, 65, 50];

/// Widget for the idea panel: loading bars, empty state, or the idea itself
pub struct IdeaCardWidget<'a> {
    idea: Option<&'a Idea>,
    phase: Phase,
    theme: &'a GameTheme,
    frame: u8,
}

impl<'a> IdeaCardWidget<'a> {
    pub fn new(idea: Option<&'a Idea>, phase: Phase, theme: &'a GameTheme) -> Self {
        Self {
            idea,
            phase,
            theme,
            frame: 0,
        }
    }

    /// Animation frame, used to pulse the loading bars
    pub fn frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }

    fn loading_lines(&self, width: u16) -> Vec<Line<'static>> {
        // One bar is lit at a time, moving every few frames
        let lit = (self.frame / 3) as usize % BAR_WIDTHS.len();

        let mut lines = vec![Line::from("")];
        for (i, percent) in BAR_WIDTHS.iter().enumerate() {
            let len = (width as usize * *percent as usize / 100).max(1);
            lines.push(Line::from(Span::styled(
                "▆".repeat(len),
                self.theme.loading_style(i == lit),
            )));
            lines.push(Line::from(""));
        }
        lines
    }

    fn empty_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucune idée disponible.",
                self.theme.muted_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Toutes les idées ont été vues ou il y a un problème de connexion.",
                self.theme.muted_style(),
            )),
        ]
    }

    fn idea_lines(idea: &Idea, theme: &GameTheme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(idea.text.clone(), theme.idea_style())),
        ];

        if let Some(category) = &idea.category {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {category} "),
                theme.category_style(),
            )));
        }
        lines
    }
}

impl Widget for IdeaCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Idée ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.phase == Phase::ShowingIdea));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match (self.phase, self.idea) {
            (Phase::Loading, _) => self.loading_lines(inner.width),
            (Phase::ShowingIdea, Some(idea)) => Self::idea_lines(idea, self.theme),
            _ => self.empty_lines(),
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
