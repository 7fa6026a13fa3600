//! GameBoard - sequential driver tying the board to the repository.
//!
//! Used by headless mode and by tests. The TUI drives a [`Board`] directly
//! from a background worker instead, so loads can overlap.
//!
//! # Example
//!
//! ```ignore
//! use gauche_core::{Choice, GameBoard, GameConfig};
//!
//! let config = GameConfig::from_env();
//! let mut game = GameBoard::new(config.build_repository()?);
//! game.load_next().await;
//! if let Some(idea) = game.board().current_idea() {
//!     println!("{}", idea.text);
//! }
//! game.choose(Choice::Left).await;
//! ```

use crate::board::{Banner, Board, Choice, Phase};
use crate::idea::Idea;
use crate::repository::{Draw, IdeaRepository};
use crate::source::IdeaSource;
use crate::storage::KeyValueStorage;

/// Board plus repository, driven one step at a time.
pub struct GameBoard<S, K> {
    board: Board,
    repository: IdeaRepository<S, K>,
}

impl<S: IdeaSource, K: KeyValueStorage> GameBoard<S, K> {
    pub fn new(repository: IdeaRepository<S, K>) -> Self {
        Self {
            board: Board::new(),
            repository,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn repository(&self) -> &IdeaRepository<S, K> {
        &self.repository
    }

    pub fn phase(&self) -> Phase {
        self.board.phase()
    }

    pub fn current_idea(&self) -> Option<&Idea> {
        self.board.current_idea()
    }

    /// Load the next unseen idea into the board.
    pub async fn load_next(&mut self) -> Phase {
        let ticket = self.board.begin_load();
        let draw: Draw = self.repository.draw().await;
        self.board.complete_load(ticket, draw);
        self.board.phase()
    }

    /// Classify the current idea, mark it seen and advance.
    ///
    /// Does nothing when no idea is shown.
    pub async fn choose(&mut self, choice: Choice) -> Phase {
        let Some(idea) = self.board.choose(choice) else {
            return self.board.phase();
        };
        self.repository.seen().mark_seen(&idea.id);
        self.load_next().await
    }

    /// Forget every seen idea and reload.
    pub async fn reset(&mut self) -> Phase {
        self.repository.seen().clear_seen();
        self.load_next().await
    }

    /// The banner's action: reload after a failure, reset after exhaustion.
    pub async fn retry(&mut self) -> Phase {
        match self.board.banner() {
            Some(Banner::Exhausted) => self.reset().await,
            _ => self.load_next().await,
        }
    }

    /// Number of ideas seen on this device.
    pub fn seen_count(&self) -> usize {
        self.repository.seen().seen_count()
    }
}
