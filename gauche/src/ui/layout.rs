//! Layout calculations for the quiz screen

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Width of each choice button
const BUTTON_WIDTH: u16 = 20;
/// Width of the reset control
const RESET_WIDTH: u16 = 40;

/// The quiz screen, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title_area: Rect,
    pub banner_area: Rect,
    pub idea_area: Rect,
    pub left_button: Rect,
    pub right_button: Rect,
    pub reset_button: Rect,
    pub instructions_area: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    /// Calculate layout based on terminal size. The banner row collapses
    /// when there is no banner.
    pub fn calculate(area: Rect, show_banner: bool) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),                             // Title + subtitle
                Constraint::Length(if show_banner { 3 } else { 0 }), // Banner
                Constraint::Min(5),                                // Idea card
                Constraint::Length(3),                             // Choice buttons
                Constraint::Length(3),                             // Reset
                Constraint::Length(1),                             // Instructions
                Constraint::Length(1),                             // Status bar
            ])
            .split(area);

        // Two buttons side by side, centered with a gap
        let button_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Length(4),
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Fill(1),
            ])
            .split(main_chunks[3]);

        Self {
            title_area: main_chunks[0],
            banner_area: main_chunks[1],
            idea_area: main_chunks[2],
            left_button: button_row[1],
            right_button: button_row[3],
            reset_button: centered_columns(RESET_WIDTH, main_chunks[4]),
            instructions_area: main_chunks[5],
            status_bar: main_chunks[6],
        }
    }

    /// Which clickable control, if any, sits at a screen position
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        if self.left_button.contains(pos) {
            Some(Hit::Left)
        } else if self.right_button.contains(pos) {
            Some(Hit::Right)
        } else if self.reset_button.contains(pos) {
            Some(Hit::Reset)
        } else if self.banner_area.contains(pos) {
            Some(Hit::Banner)
        } else {
            None
        }
    }
}

/// A clickable control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Left,
    Right,
    Reset,
    Banner,
}

/// Horizontally center a fixed width inside `area`
pub fn centered_columns(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

/// Calculate fixed-size centered popup
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
