//! Render orchestration for the quiz TUI

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use gauche_core::Choice;

use crate::app::App;
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{BannerWidget, ButtonWidget, IdeaCardWidget, StatusBarWidget};

/// Which control has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Left,
    Right,
    Reset,
}

impl From<Choice> for Focus {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Left => Focus::Left,
            Choice::Right => Focus::Right,
        }
    }
}

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

const SUBTITLE: &str =
    "Déterminez si l'idée présentée est plutôt de gauche ou de droite politiquement.";

const INSTRUCTIONS: &str = "Les idées déjà vues sont sauvegardées localement pour éviter les répétitions. \
     Appuyez sur R pour réinitialiser votre historique.";

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area, app.board.banner().is_some());

    render_title(frame, app, layout.title_area);

    if let Some(banner) = app.board.banner() {
        frame.render_widget(BannerWidget::new(banner, &app.theme), layout.banner_area);
    }

    let idea_widget =
        IdeaCardWidget::new(app.board.current_idea(), app.board.phase(), &app.theme)
            .frame(app.animation_frame);
    frame.render_widget(idea_widget, layout.idea_area);

    // Buttons only exist while an idea is on screen
    if app.board.current_idea().is_some() {
        render_choice(frame, app, Choice::Left, layout.left_button);
        render_choice(frame, app, Choice::Right, layout.right_button);
    }

    let reset_widget = ButtonWidget::new("Recommencer (effacer l'historique)", &app.theme)
        .key_hint("R")
        .focused(app.focus == Focus::Reset)
        .enabled(!app.board.is_loading());
    frame.render_widget(reset_widget, layout.reset_button);

    frame.render_widget(
        Paragraph::new(Span::styled(INSTRUCTIONS, app.theme.muted_style()))
            .alignment(Alignment::Center),
        layout.instructions_area,
    );

    let status_widget = StatusBarWidget::new(app.seen_count, app.board.answered(), &app.theme)
        .loading(app.board.is_loading())
        .message(app.status_message());
    frame.render_widget(status_widget, layout.status_bar);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title and subtitle
fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut title = vec![Span::styled("Gauche ou Droite ?", app.theme.title_style())];
    if let Some(source) = &app.source {
        title.push(Span::styled(format!("  ({source})"), app.theme.muted_style()));
    }

    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(SUBTITLE, app.theme.muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(app.theme.border_style(false));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

/// Render one choice button
fn render_choice(frame: &mut Frame, app: &App, choice: Choice, area: Rect) {
    let hint = match choice {
        Choice::Left => "←",
        Choice::Right => "→",
    };

    let widget = ButtonWidget::new(choice.label(), &app.theme)
        .key_hint(hint)
        .color(app.theme.choice_color(choice))
        .focused(app.focus == Focus::from(choice))
        .enabled(app.board.can_choose());
    frame.render_widget(widget, area);
}

/// Render overlay
fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 18, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Gauche ou Droite ? - Aide ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Répondre:", heading)),
        Line::from("  ← / h / g      Gauche"),
        Line::from("  → / l / d      Droite"),
        Line::from("  Tab / ↑ / ↓    Changer de bouton"),
        Line::from("  Entrée         Valider le bouton actif"),
        Line::from("  Souris         Cliquer sur un bouton"),
        Line::from(""),
        Line::from(Span::styled("Historique:", heading)),
        Line::from("  r              Réessayer / Recommencer (bannière)"),
        Line::from("  R              Effacer l'historique"),
        Line::from(""),
        Line::from("  q / Esc        Quitter"),
        Line::from(""),
        Line::from(Span::styled(
            "Esc ou ? pour fermer",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Aide ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerResponse;
    use gauche_core::{Draw, Idea};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn draw_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with(draw: Draw) -> App {
        let (request_tx, _request_rx) = mpsc::channel(8);
        let (_response_tx, response_rx) = mpsc::channel(8);
        let mut app = App::new(request_tx, response_rx);

        let ticket = app.board.begin_load();
        app.apply_response(WorkerResponse::Drawn {
            ticket,
            draw,
            seen_count: 3,
        });
        app
    }

    #[test]
    fn test_idea_screen() {
        let app = app_with(Draw::Found(Idea::new("1", "Baisser les impôts")));
        let screen = draw_to_string(&app);
        assert!(screen.contains("Gauche ou Droite ?"));
        assert!(screen.contains("Baisser les impôts"));
        assert!(screen.contains("Gauche"));
        assert!(screen.contains("Droite"));
        assert!(screen.contains("Vues: 3"));
    }

    #[test]
    fn test_exhausted_screen_hides_buttons() {
        let app = app_with(Draw::Exhausted);
        let screen = draw_to_string(&app);
        assert!(screen.contains("Aucune idée disponible."));
        assert!(screen.contains("[r] Recommencer"));
        assert!(!screen.contains("Gauche ["));
    }

    #[test]
    fn test_failed_screen_offers_retry() {
        let app = app_with(Draw::Failed("timeout".into()));
        let screen = draw_to_string(&app);
        assert!(screen.contains("[r] Réessayer"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app_with(Draw::Exhausted);
        app.toggle_help();
        assert!(draw_to_string(&app).contains("Aide"));
    }
}
