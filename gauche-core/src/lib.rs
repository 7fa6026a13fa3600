//! Core of the "Gauche ou Droite ?" quiz.
//!
//! This crate provides:
//! - Idea fetching from a Firestore collection
//! - Device-local tracking of already seen ideas, stored as truncated digests
//! - Uniform random selection of an unseen idea
//! - The game board state machine (load → show → choose → next)
//!
//! # Quick Start
//!
//! ```ignore
//! use gauche_core::{Choice, GameBoard, GameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::from_env().with_project_id("my-project");
//!     let mut game = GameBoard::new(config.build_repository()?);
//!
//!     game.load_next().await;
//!     if let Some(idea) = game.current_idea() {
//!         println!("{}", idea.text);
//!     }
//!     game.choose(Choice::Left).await;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod config;
pub mod game;
pub mod hashing;
pub mod idea;
pub mod repository;
pub mod seen;
pub mod source;
pub mod storage;
pub mod testing;

// Primary public API
pub use board::{Banner, Board, Choice, LoadTicket, Phase};
pub use config::{ConfigError, GameConfig};
pub use game::GameBoard;
pub use hashing::{hash_idea_id, is_idea_hash, HASH_LEN};
pub use idea::{Idea, IdeaDocument};
pub use repository::{Draw, IdeaRepository};
pub use seen::{SeenIdeas, SEEN_IDEAS_KEY};
pub use source::{FirestoreSource, IdeaSource, SourceError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use testing::{FailingStorage, MockSource};
