//! Game board state machine.
//!
//! [`Board`] holds the transient session state (current idea, loading flag,
//! banner) and sequences load → show → choose. It does no I/O: callers run
//! the actual draw and feed the result back through [`Board::complete_load`].
//!
//! Every load is tagged with a [`LoadTicket`]. Starting a newer load makes
//! older tickets stale, and stale results are dropped on arrival.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::idea::Idea;
use crate::repository::Draw;

/// Which way the player classified an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Left,
    Right,
}

impl Choice {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Choice::Left => "Gauche",
            Choice::Right => "Droite",
        }
    }

    /// The other choice.
    pub fn other(&self) -> Choice {
        match self {
            Choice::Left => Choice::Right,
            Choice::Right => Choice::Left,
        }
    }

    /// Parse user input such as `g`, `gauche`, `left`, `d`, `droite`, `right`.
    pub fn parse(s: &str) -> Option<Choice> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gauche" | "l" | "left" => Some(Choice::Left),
            "d" | "droite" | "r" | "right" => Some(Choice::Right),
            _ => None,
        }
    }
}

/// A message shown above the idea panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Nothing left to show.
    Exhausted,
    /// The catalog could not be loaded.
    LoadFailed,
}

impl Banner {
    pub fn message(&self) -> &'static str {
        match self {
            Banner::Exhausted => {
                "Toutes les idées ont été vues ou aucune idée n'est disponible."
            }
            Banner::LoadFailed => {
                "Erreur lors du chargement de l'idée. Vérifiez votre connexion."
            }
        }
    }

    /// Label of the banner's own action.
    pub fn action_label(&self) -> &'static str {
        match self {
            Banner::Exhausted => "Recommencer",
            Banner::LoadFailed => "Réessayer",
        }
    }
}

/// Coarse state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    ShowingIdea,
    Empty,
    Error,
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Transient UI session state.
#[derive(Debug, Clone, Default)]
pub struct Board {
    current: Option<Idea>,
    loading: bool,
    banner: Option<Banner>,
    generation: u64,
    answered: u32,
}

impl Board {
    /// A fresh board, before the first load.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            return Phase::Loading;
        }
        match (&self.current, self.banner) {
            (Some(_), _) => Phase::ShowingIdea,
            (None, Some(Banner::LoadFailed)) => Phase::Error,
            (None, Some(Banner::Exhausted)) => Phase::Empty,
            // Never loaded yet
            (None, None) => Phase::Loading,
        }
    }

    pub fn current_idea(&self) -> Option<&Idea> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    /// The banner text, or an empty string when there is none.
    pub fn error_message(&self) -> &'static str {
        self.banner.map(|b| b.message()).unwrap_or("")
    }

    /// Ideas classified during this session.
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// Whether the choice buttons accept input.
    pub fn can_choose(&self) -> bool {
        !self.loading && self.current.is_some()
    }

    /// Enter the loading state. Any load still in flight becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.banner = None;
        LoadTicket(self.generation)
    }

    /// Apply the outcome of a load. Returns `false` if the ticket was stale.
    pub fn complete_load(&mut self, ticket: LoadTicket, draw: Draw) -> bool {
        if ticket.0 != self.generation {
            debug!(
                stale = ticket.0,
                current = self.generation,
                "Dropping stale load result"
            );
            return false;
        }

        self.loading = false;
        match draw {
            Draw::Found(idea) => {
                self.current = Some(idea);
                self.banner = None;
            }
            Draw::Exhausted => {
                self.current = None;
                self.banner = Some(Banner::Exhausted);
            }
            Draw::Failed(_) => {
                self.current = None;
                self.banner = Some(Banner::LoadFailed);
            }
        }
        true
    }

    /// Register a choice for the current idea.
    ///
    /// Returns the idea to mark as seen, or `None` if no idea can be chosen
    /// right now (nothing shown, or a load in flight).
    pub fn choose(&mut self, choice: Choice) -> Option<Idea> {
        if !self.can_choose() {
            return None;
        }
        let idea = self.current.clone()?;
        debug!(idea = %idea.id, ?choice, "Idea classified");
        self.answered += 1;
        Some(idea)
    }
}
