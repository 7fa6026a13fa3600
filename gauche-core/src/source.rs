//! Where ideas come from.

use async_trait::async_trait;
use thiserror::Error;

use crate::idea::IdeaDocument;

/// Errors from an idea source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Remote store error: {0}")]
    Remote(#[from] firestore::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// A read-only catalog of idea documents.
#[async_trait]
pub trait IdeaSource: Send + Sync {
    /// Fetch every document in the catalog.
    async fn fetch_all(&self) -> Result<Vec<IdeaDocument>, SourceError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Ideas stored in a Firestore collection.
#[derive(Clone)]
pub struct FirestoreSource {
    client: firestore::Firestore,
    collection: String,
}

impl FirestoreSource {
    pub fn new(client: firestore::Firestore, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl IdeaSource for FirestoreSource {
    async fn fetch_all(&self) -> Result<Vec<IdeaDocument>, SourceError> {
        let documents = self.client.list_documents(&self.collection).await?;
        Ok(documents.into_iter().map(IdeaDocument::from).collect())
    }

    fn describe(&self) -> String {
        format!(
            "firestore://{}/{}/{}",
            self.client.project_id(),
            self.client.database(),
            self.collection
        )
    }
}
