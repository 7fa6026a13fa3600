//! TUI widgets for the quiz

pub mod banner;
pub mod button;
pub mod idea_card;
pub mod status_bar;

pub use banner::BannerWidget;
pub use button::ButtonWidget;
pub use idea_card::IdeaCardWidget;
pub use status_bar::StatusBarWidget;
