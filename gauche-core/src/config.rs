//! Game configuration.

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

use crate::repository::IdeaRepository;
use crate::source::FirestoreSource;
use crate::storage::FileStorage;

/// Remote collection holding the ideas.
pub const DEFAULT_COLLECTION: &str = "ideas";
/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";
/// Project id used against the emulator when none is configured.
pub const EMULATOR_PROJECT_ID: &str = "demo-gauche-ou-droite";

/// Errors from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No Firebase project configured - set FIREBASE_PROJECT_ID environment variable")]
    MissingProjectId,

    #[error("No suitable data directory available - set GAUCHE_DATA_DIR")]
    NoDataDir,
}

/// Configuration for a game.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    /// Google Cloud project hosting the Firestore database.
    pub project_id: Option<String>,

    /// Web API key for the project.
    pub api_key: Option<String>,

    /// Firestore database name.
    pub database: Option<String>,

    /// Collection holding the ideas.
    pub collection: Option<String>,

    /// `host:port` of a local Firestore emulator.
    pub emulator_host: Option<String>,

    /// Where device-local state (the seen set, logs) lives.
    pub data_dir: Option<PathBuf>,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the environment.
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        Self {
            project_id: env_var("FIREBASE_PROJECT_ID"),
            api_key: env_var("FIREBASE_API_KEY"),
            database: env_var("FIRESTORE_DATABASE"),
            collection: env_var("GAUCHE_COLLECTION"),
            emulator_host: env_var("FIRESTORE_EMULATOR_HOST"),
            data_dir: env_var("GAUCHE_DATA_DIR").map(PathBuf::from),
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_emulator_host(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn collection(&self) -> &str {
        self.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    /// The project id, falling back to a demo id when an emulator is configured.
    pub fn resolved_project_id(&self) -> Result<&str, ConfigError> {
        match (&self.project_id, &self.emulator_host) {
            (Some(id), _) => Ok(id),
            (None, Some(_)) => Ok(EMULATOR_PROJECT_ID),
            (None, None) => Err(ConfigError::MissingProjectId),
        }
    }

    /// The configured data directory, or the platform data directory.
    pub fn resolved_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        ProjectDirs::from("fr", "gauche-ou-droite", "gauche-ou-droite")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoDataDir)
    }

    /// Directory for log files.
    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolved_data_dir()?.join("logs"))
    }

    /// Build the Firestore client.
    pub fn build_client(&self) -> Result<firestore::Firestore, ConfigError> {
        let mut client = firestore::Firestore::new(self.resolved_project_id()?)
            .with_database(self.database.as_deref().unwrap_or(DEFAULT_DATABASE));

        if let Some(key) = &self.api_key {
            client = client.with_api_key(key);
        }
        if let Some(host) = &self.emulator_host {
            client = client.with_emulator(host);
        }

        Ok(client)
    }

    pub fn build_source(&self) -> Result<FirestoreSource, ConfigError> {
        Ok(FirestoreSource::new(self.build_client()?, self.collection()))
    }

    pub fn build_storage(&self) -> Result<FileStorage, ConfigError> {
        Ok(FileStorage::new(self.resolved_data_dir()?))
    }

    /// Build a repository backed by Firestore and the file storage.
    pub fn build_repository(&self) -> Result<IdeaRepository<FirestoreSource, FileStorage>, ConfigError> {
        Ok(IdeaRepository::new(self.build_source()?, self.build_storage()?))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
