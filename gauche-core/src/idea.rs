//! The `Idea` record and its mapping from raw documents.

use firestore::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primary field holding the statement.
pub const TEXT_FIELD: &str = "text";
/// Legacy field name used by older documents.
pub const LEGACY_TEXT_FIELD: &str = "content";
pub const CATEGORY_FIELD: &str = "category";

/// One classifiable statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    /// Opaque identifier assigned by the remote store.
    pub id: String,
    /// The statement itself.
    pub text: String,
    /// Optional classification label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Idea {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Map a raw document to an idea.
    ///
    /// `text` wins when it is a non-empty string, then `content`, then the
    /// empty string. Empty or non-string categories are treated as absent.
    pub fn from_document(doc: &IdeaDocument) -> Self {
        let text = non_empty_str(doc.fields.get(TEXT_FIELD))
            .or_else(|| non_empty_str(doc.fields.get(LEGACY_TEXT_FIELD)))
            .unwrap_or_default()
            .to_string();

        let category = non_empty_str(doc.fields.get(CATEGORY_FIELD)).map(str::to_string);

        Self {
            id: doc.id.clone(),
            text,
            category,
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// A document as returned by an idea source, before mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaDocument {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

impl IdeaDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field (builder style, mostly for tests and fixtures).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl From<firestore::Document> for IdeaDocument {
    fn from(doc: firestore::Document) -> Self {
        Self {
            id: doc.id,
            fields: doc.fields,
        }
    }
}
