//! Banner shown above the idea card

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use gauche_core::Banner;

use crate::ui::theme::GameTheme;

/// Exhaustion or load-failure message with its action hint
pub struct BannerWidget<'a> {
    banner: Banner,
    theme: &'a GameTheme,
}

impl<'a> BannerWidget<'a> {
    pub fn new(banner: Banner, theme: &'a GameTheme) -> Self {
        Self { banner, theme }
    }
}

impl Widget for BannerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.banner_style(self.banner);

        let block = Block::default().borders(Borders::ALL).border_style(style);

        let line = Line::from(vec![
            Span::styled(self.banner.message(), style),
            Span::raw("  "),
            Span::styled(
                format!("[r] {}", self.banner.action_label()),
                style.add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(line)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
