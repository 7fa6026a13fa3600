//! Picking the next idea to show.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;
use tracing::{debug, error, warn};

use crate::hashing::hash_idea_id;
use crate::idea::Idea;
use crate::seen::SeenIdeas;
use crate::source::IdeaSource;
use crate::storage::KeyValueStorage;

/// Outcome of drawing an idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    /// An unseen idea, picked uniformly at random.
    Found(Idea),
    /// The catalog is empty or every idea has been seen.
    Exhausted,
    /// The catalog could not be fetched.
    Failed(String),
}

impl Draw {
    /// Collapse to the idea, if any.
    pub fn into_idea(self) -> Option<Idea> {
        match self {
            Draw::Found(idea) => Some(idea),
            Draw::Exhausted | Draw::Failed(_) => None,
        }
    }
}

/// Fetches the catalog, filters out seen ideas and picks one.
pub struct IdeaRepository<S, K> {
    source: S,
    seen: SeenIdeas<K>,
    rng: Mutex<StdRng>,
}

impl<S: IdeaSource, K: KeyValueStorage> IdeaRepository<S, K> {
    pub fn new(source: S, storage: K) -> Self {
        Self {
            source,
            seen: SeenIdeas::new(storage),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a fixed seed for reproducible picks.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The seen-ideas store used for filtering.
    pub fn seen(&self) -> &SeenIdeas<K> {
        &self.seen
    }

    /// Draw a random unseen idea.
    ///
    /// The whole catalog is fetched on every call; fetch errors are logged and
    /// reported as [`Draw::Failed`], never returned as `Err`.
    pub async fn draw(&self) -> Draw {
        let documents = match self.source.fetch_all().await {
            Ok(documents) => documents,
            Err(e) => {
                error!(source = %self.source.describe(), "Error fetching random idea: {e}");
                return Draw::Failed(e.to_string());
            }
        };

        if documents.is_empty() {
            warn!(source = %self.source.describe(), "No ideas found");
            return Draw::Exhausted;
        }

        let seen = self.seen.get_seen();
        let total = documents.len();
        let unseen: Vec<Idea> = documents
            .iter()
            .map(Idea::from_document)
            .filter(|idea| !seen.contains(&hash_idea_id(&idea.id)))
            .collect();

        debug!(total, unseen = unseen.len(), "Filtered catalog");

        let picked = match self.rng.lock() {
            Ok(mut rng) => unseen.choose(&mut *rng).cloned(),
            Err(poisoned) => unseen.choose(&mut *poisoned.into_inner()).cloned(),
        };

        match picked {
            Some(idea) => Draw::Found(idea),
            None => {
                warn!("All ideas have been seen. Consider clearing seen ideas.");
                Draw::Exhausted
            }
        }
    }

    /// Fetch a random unseen idea, or `None` when nothing can be shown.
    ///
    /// This flattens [`Draw`]; callers that need to tell an exhausted
    /// catalog from a broken one should use [`IdeaRepository::draw`].
    pub async fn fetch_random_unseen_idea(&self) -> Option<Idea> {
        self.draw().await.into_idea()
    }
}
