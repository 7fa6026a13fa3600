//! Main application state and logic

use gauche_core::{Banner, Board, Choice, Draw, LoadTicket};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::warn;

use crate::ui::layout::AppLayout;
use crate::ui::theme::GameTheme;
use crate::ui::{Focus, Overlay};
use crate::worker::{WorkerRequest, WorkerResponse};

/// Main application state
pub struct App {
    // Channel communication with the worker
    request_tx: mpsc::Sender<WorkerRequest>,
    response_rx: mpsc::Receiver<WorkerResponse>,

    // Game state
    pub board: Board,
    pub seen_count: usize,
    pub source: Option<String>,

    // UI state
    pub theme: GameTheme,
    pub focus: Focus,
    overlay: Option<Overlay>,
    frame_area: Rect,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    /// Create a new application with channel endpoints
    pub fn new(
        request_tx: mpsc::Sender<WorkerRequest>,
        response_rx: mpsc::Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            request_tx,
            response_rx,
            board: Board::new(),
            seen_count: 0,
            source: None,
            theme: GameTheme::default(),
            focus: Focus::default(),
            overlay: None,
            frame_area: Rect::default(),
            status_message: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    // =========================================================================
    // Game actions
    // =========================================================================

    /// Start loading the next idea
    pub fn load(&mut self) {
        let ticket = self.board.begin_load();
        self.send(ticket, WorkerRequest::Load(ticket));
    }

    /// Classify the current idea. Ignored while loading or when nothing is shown.
    pub fn choose(&mut self, choice: Choice) {
        let Some(idea) = self.board.choose(choice) else {
            return;
        };
        self.focus = Focus::from(choice);
        self.set_status(format!("{} !", choice.label()));

        let ticket = self.board.begin_load();
        self.send(
            ticket,
            WorkerRequest::MarkSeenAndLoad {
                ticket,
                idea_id: idea.id,
            },
        );
    }

    /// Clear the seen history and reload. Disabled while loading.
    pub fn reset(&mut self) {
        if self.board.is_loading() {
            return;
        }
        self.set_status("Historique effacé");

        let ticket = self.board.begin_load();
        self.send(ticket, WorkerRequest::ResetAndLoad(ticket));
    }

    /// The banner's own action: reload after a failure, reset after exhaustion
    pub fn banner_action(&mut self) {
        match self.board.banner() {
            Some(Banner::Exhausted) => self.reset(),
            Some(Banner::LoadFailed) if !self.board.is_loading() => self.load(),
            _ => {}
        }
    }

    /// Press whichever control has focus
    pub fn activate_focused(&mut self) {
        match self.focus {
            Focus::Left => self.choose(Choice::Left),
            Focus::Right => self.choose(Choice::Right),
            Focus::Reset => self.reset(),
        }
    }

    fn send(&mut self, ticket: LoadTicket, request: WorkerRequest) {
        if let Err(e) = self.request_tx.try_send(request) {
            warn!("Failed to reach worker: {e}");
            self.set_status("Worker indisponible");
            self.board
                .complete_load(ticket, Draw::Failed("worker unavailable".to_string()));
        }
    }

    // =========================================================================
    // Worker responses
    // =========================================================================

    /// Apply every response the worker has produced so far
    pub fn poll_worker(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.apply_response(response);
        }
    }

    /// Apply one worker response
    pub fn apply_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Ready { source, seen_count } => {
                self.source = Some(source);
                self.seen_count = seen_count;
            }
            WorkerResponse::Drawn {
                ticket,
                draw,
                seen_count,
            } => {
                self.seen_count = seen_count;
                if self.board.complete_load(ticket, draw) && self.board.current_idea().is_none() {
                    self.focus = Focus::Reset;
                }
            }
        }
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    // =========================================================================
    // Focus and overlays
    // =========================================================================

    /// Cycle to next control
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Left => Focus::Right,
            Focus::Right => Focus::Reset,
            Focus::Reset => Focus::Left,
        };
    }

    /// Cycle to previous control
    pub fn cycle_focus_reverse(&mut self) {
        self.focus = match self.focus {
            Focus::Left => Focus::Reset,
            Focus::Reset => Focus::Right,
            Focus::Right => Focus::Left,
        };
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            None => Some(Overlay::Help),
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Remember the terminal size, for mouse hit testing
    pub fn set_frame_area(&mut self, area: Rect) {
        self.frame_area = area;
    }

    /// Layout of the last drawn frame
    pub fn layout(&self) -> AppLayout {
        AppLayout::calculate(self.frame_area, self.board.banner().is_some())
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
