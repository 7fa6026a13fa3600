//! Color theme and styling for the quiz

use ratatui::style::{Color, Modifier, Style};

use gauche_core::{Banner, Choice};

/// Quiz UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub muted: Color,

    // Choice colors
    pub left: Color,
    pub right: Color,

    // Banner colors
    pub warning: Color,
    pub error: Color,

    // Idea card
    pub idea_text: Color,
    pub category_fg: Color,
    pub category_bg: Color,
    pub loading: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            muted: Color::DarkGray,

            left: Color::LightRed,
            right: Color::LightBlue,

            warning: Color::Yellow,
            error: Color::Red,

            idea_text: Color::White,
            category_fg: Color::Black,
            category_bg: Color::Gray,
            loading: Color::Gray,
        }
    }
}

impl GameTheme {
    /// Get style for the main title
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for secondary text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Accent color of a choice
    pub fn choice_color(&self, choice: Choice) -> Color {
        match choice {
            Choice::Left => self.left,
            Choice::Right => self.right,
        }
    }

    /// Get style for a button label
    pub fn button_style(&self, color: Color, focused: bool, enabled: bool) -> Style {
        if !enabled {
            return Style::default()
                .fg(self.muted)
                .add_modifier(Modifier::DIM);
        }

        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    /// Get style for a banner
    pub fn banner_style(&self, banner: Banner) -> Style {
        let color = match banner {
            Banner::Exhausted => self.warning,
            Banner::LoadFailed => self.error,
        };
        Style::default().fg(color)
    }

    /// Get style for the idea text
    pub fn idea_style(&self) -> Style {
        Style::default()
            .fg(self.idea_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for the category badge
    pub fn category_style(&self) -> Style {
        Style::default().fg(self.category_fg).bg(self.category_bg)
    }

    /// Get style for one loading bar; `lit` bars are drawn brighter
    pub fn loading_style(&self, lit: bool) -> Style {
        let style = Style::default().fg(self.loading);
        if lit {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        }
    }
}
