//! Event handling for the quiz TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use gauche_core::Choice;

use crate::app::App;
use crate::ui::layout::Hit;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if app.has_overlay() {
        return EventResult::Continue;
    }

    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
        return EventResult::Continue;
    };

    // Choice buttons are only drawn while an idea is on screen
    let buttons_visible = app.board.current_idea().is_some();

    match app.layout().hit_test(mouse.column, mouse.row) {
        Some(Hit::Left) if buttons_visible => app.choose(Choice::Left),
        Some(Hit::Right) if buttons_visible => app.choose(Choice::Right),
        Some(Hit::Reset) => app.reset(),
        Some(Hit::Banner) => app.banner_action(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        // Choices
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('g') => {
            app.choose(Choice::Left);
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => {
            app.choose(Choice::Right);
            EventResult::NeedsRedraw
        }

        // Focus
        KeyCode::Tab | KeyCode::Down => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.cycle_focus_reverse();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.activate_focused();
            EventResult::NeedsRedraw
        }

        // History
        KeyCode::Char('r') => {
            app.banner_action();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('R') => {
            app.reset();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
