//! Minimal Cloud Firestore REST client.
//!
//! This crate provides a focused, read-only client for the Firestore v1 REST API:
//! - Whole-collection listing with transparent `nextPageToken` paging
//! - Decoding of Firestore's typed value encoding into [`Value`]
//! - Emulator support (`FIRESTORE_EMULATOR_HOST`)

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const API_BASE: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_PAGE_SIZE: u32 = 300;
/// Upper bound on pages fetched for one listing.
const MAX_PAGES: usize = 1000;

/// Errors that can occur when using the Firestore client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Firestore REST client.
#[derive(Clone)]
pub struct Firestore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: Option<String>,
    page_size: u32,
}

impl Firestore {
    /// Create a new client for the given Google Cloud project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: API_BASE.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Authenticate requests with a Web API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a named database instead of `(default)`.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Talk to a local emulator (`host:port`) over plain HTTP.
    ///
    /// The emulator accepts unauthenticated requests, so any API key is dropped.
    pub fn with_emulator(mut self, host: impl AsRef<str>) -> Self {
        let host = host.as_ref().trim_end_matches('/');
        let host = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .unwrap_or(host);
        self.base_url = format!("http://{host}/v1");
        self.api_key = None;
        self
    }

    /// Set how many documents are requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// List every document of a collection, following page tokens until exhausted.
    ///
    /// Fails with [`Error::Parse`] if the server repeats a page token or the
    /// listing runs past `MAX_PAGES` pages.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, Error> {
        let documents = collect_pages(|page_token| async move {
            self.list_documents_page(collection, page_token.as_deref())
                .await
        })
        .await?;

        debug!(
            collection,
            count = documents.len(),
            "listed firestore collection"
        );
        Ok(documents)
    }

    /// Fetch a single page of a collection listing.
    pub async fn list_documents_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<DocumentPage, Error> {
        if collection.is_empty() || collection.contains('/') {
            return Err(Error::Config(format!(
                "Invalid collection name: {collection:?}"
            )));
        }

        let query = self.build_query(page_token);

        let response = self
            .client
            .get(self.documents_url(collection))
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: api_error_message(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        parse_list_response(&body)
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url, self.project_id, self.database, collection
        )
    }

    fn build_query(&self, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![("pageSize", self.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }
        query
    }
}

// ============================================================================
// Public types
// ============================================================================

/// One page of a collection listing.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

/// A Firestore document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full resource name (`projects/.../documents/<collection>/<id>`).
    pub name: String,
    /// Last path segment of `name`.
    pub id: String,
    pub fields: BTreeMap<String, Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

impl Document {
    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a string field by name.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

/// A decoded Firestore value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(String),
    String(String),
    /// Base64-encoded bytes.
    Bytes(String),
    Reference(String),
    GeoPoint { latitude: f64, longitude: f64 },
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Extract the string from a String value.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiListResponse {
    #[serde(default)]
    documents: Vec<ApiDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDocument {
    name: String,
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Drive a paged listing to the end.
async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<Document>, Error>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<DocumentPage, Error>>,
{
    let mut documents = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token = None;

    for _ in 0..MAX_PAGES {
        let page = fetch_page(page_token.take()).await?;
        documents.extend(page.documents);

        match page.next_page_token {
            Some(token) if !token.is_empty() => {
                if !seen_tokens.insert(token.clone()) {
                    return Err(Error::Parse(format!("Page token repeated: {token}")));
                }
                page_token = Some(token);
            }
            _ => return Ok(documents),
        }
    }

    Err(Error::Parse(format!(
        "Listing did not finish within {MAX_PAGES} pages"
    )))
}

/// Parse the body of a `documents.list` response.
fn parse_list_response(body: &str) -> Result<DocumentPage, Error> {
    // An empty collection yields `{}`; some proxies return an empty body.
    if body.trim().is_empty() {
        return Ok(DocumentPage::default());
    }

    let api: ApiListResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    let documents = api
        .documents
        .into_iter()
        .map(convert_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DocumentPage {
        documents,
        next_page_token: api.next_page_token,
    })
}

fn convert_document(doc: ApiDocument) -> Result<Document, Error> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Parse(format!("Document name without id: {}", doc.name)))?
        .to_string();

    Ok(Document {
        id,
        fields: decode_fields(&doc.fields)?,
        name: doc.name,
        create_time: doc.create_time,
        update_time: doc.update_time,
    })
}

fn decode_fields(
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Result<BTreeMap<String, Value>, Error> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

/// Decode Firestore's `{"<kind>Value": ...}` encoding.
fn decode_value(json: &serde_json::Value) -> Result<Value, Error> {
    let obj = json
        .as_object()
        .ok_or_else(|| Error::Parse(format!("Expected value object, got {json}")))?;

    let Some((kind, inner)) = obj.iter().next() else {
        return Err(Error::Parse("Empty value object".to_string()));
    };

    let value = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Boolean(
            inner
                .as_bool()
                .ok_or_else(|| Error::Parse(format!("Bad booleanValue: {inner}")))?,
        ),
        // int64 travels as a decimal string in JSON
        "integerValue" => {
            let parsed = match inner {
                serde_json::Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            Value::Integer(parsed.ok_or_else(|| Error::Parse(format!("Bad integerValue: {inner}")))?)
        }
        "doubleValue" => {
            let parsed = match inner {
                serde_json::Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            };
            Value::Double(parsed.ok_or_else(|| Error::Parse(format!("Bad doubleValue: {inner}")))?)
        }
        "timestampValue" => Value::Timestamp(expect_str(kind, inner)?),
        "stringValue" => Value::String(expect_str(kind, inner)?),
        "bytesValue" => Value::Bytes(expect_str(kind, inner)?),
        "referenceValue" => Value::Reference(expect_str(kind, inner)?),
        "geoPointValue" => Value::GeoPoint {
            latitude: inner["latitude"].as_f64().unwrap_or_default(),
            longitude: inner["longitude"].as_f64().unwrap_or_default(),
        },
        "arrayValue" => {
            let values = match inner.get("values").and_then(|v| v.as_array()) {
                Some(values) => values.iter().map(decode_value).collect::<Result<_, _>>()?,
                None => Vec::new(),
            };
            Value::Array(values)
        }
        "mapValue" => {
            let fields = match inner.get("fields").and_then(|v| v.as_object()) {
                Some(fields) => decode_fields(fields)?,
                None => BTreeMap::new(),
            };
            Value::Map(fields)
        }
        other => return Err(Error::Parse(format!("Unknown value kind: {other}"))),
    };

    Ok(value)
}

fn expect_str(kind: &str, inner: &serde_json::Value) -> Result<String, Error> {
    inner
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Parse(format!("Bad {kind}: {inner}")))
}

/// Pull the human-readable message out of a Google API error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE_PAGE: &str = r#"{
        "documents": [
            {
                "name": "projects/demo/databases/(default)/documents/ideas/abc123",
                "fields": {
                    "text": {"stringValue": "Augmenter le SMIC"},
                    "category": {"stringValue": "économie"},
                    "votes": {"integerValue": "42"}
                },
                "createTime": "2024-05-01T10:00:00.000000Z",
                "updateTime": "2024-05-01T10:00:00.000000Z"
            },
            {
                "name": "projects/demo/databases/(default)/documents/ideas/def456",
                "fields": {
                    "content": {"stringValue": "Baisser les impôts"},
                    "archived": {"nullValue": null}
                }
            }
        ],
        "nextPageToken": "page-2"
    }"#;

    #[test]
    fn test_client_creation() {
        let client = Firestore::new("demo");
        assert_eq!(client.project_id(), "demo");
        assert_eq!(client.database(), DEFAULT_DATABASE);
        assert_eq!(client.page_size, DEFAULT_PAGE_SIZE);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_documents_url() {
        let client = Firestore::new("demo").with_database("quiz");
        assert_eq!(
            client.documents_url("ideas"),
            "https://firestore.googleapis.com/v1/projects/demo/databases/quiz/documents/ideas"
        );
    }

    #[test]
    fn test_emulator_drops_key_and_uses_http() {
        let client = Firestore::new("demo")
            .with_api_key("secret")
            .with_emulator("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_query_includes_token_and_key() {
        let client = Firestore::new("demo")
            .with_api_key("secret")
            .with_page_size(0);
        let query = client.build_query(Some("tok"));
        assert!(query.contains(&("pageSize", "1".to_string())));
        assert!(query.contains(&("pageToken", "tok".to_string())));
        assert!(query.contains(&("key", "secret".to_string())));
    }

    #[test]
    fn test_parse_list_response() {
        let page = parse_list_response(SAMPLE_PAGE).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
        assert_eq!(page.documents.len(), 2);

        let first = &page.documents[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.get_str("text"), Some("Augmenter le SMIC"));
        assert_eq!(first.get_str("category"), Some("économie"));
        assert_eq!(first.get("votes").and_then(Value::as_i64), Some(42));
        assert!(first.create_time.is_some());

        let second = &page.documents[1];
        assert_eq!(second.id, "def456");
        assert_eq!(second.get_str("text"), None);
        assert!(second.get("archived").unwrap().is_null());
    }

    #[test]
    fn test_parse_empty_collection() {
        let page = parse_list_response("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());

        let page = parse_list_response("").unwrap();
        assert!(page.documents.is_empty());
    }

    #[test]
    fn test_decode_nested_values() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"mapValue": {"fields": {
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}, {"booleanValue": true}]}},
                "score": {"doubleValue": 0.5},
                "empty": {"arrayValue": {}}
            }}}"#,
        )
        .unwrap();

        let Value::Map(fields) = decode_value(&json).unwrap() else {
            panic!("expected map");
        };
        assert_eq!(
            fields["tags"],
            Value::Array(vec![Value::from("a"), Value::Boolean(true)])
        );
        assert_eq!(fields["score"], Value::Double(0.5));
        assert_eq!(fields["empty"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let json = serde_json::json!({"integerValue": "not-a-number"});
        assert!(matches!(decode_value(&json), Err(Error::Parse(_))));

        let json = serde_json::json!({"mysteryValue": 1});
        assert!(matches!(decode_value(&json), Err(Error::Parse(_))));

        assert!(matches!(
            parse_list_response("not json"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(
            api_error_message(body),
            "Missing or insufficient permissions."
        );
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_invalid_collection_is_config_error() {
        let client = Firestore::new("demo");
        let err = client.list_documents("ideas/nested").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    // ========================================================================
    // Paging
    // ========================================================================

    fn doc(id: &str) -> Document {
        Document {
            name: format!("projects/demo/databases/(default)/documents/ideas/{id}"),
            id: id.to_string(),
            fields: BTreeMap::new(),
            create_time: None,
            update_time: None,
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> DocumentPage {
        DocumentPage {
            documents: ids.iter().map(|id| doc(id)).collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    /// Serve one canned body per connection; the last body repeats.
    async fn serve_pages(bodies: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let served = Arc::new(AtomicUsize::new(0));
        let counter = served.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let body = bodies[index.min(bodies.len() - 1)];

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (addr, served)
    }

    const FIRST_PAGE: &str = r#"{"documents": [{"name": "projects/demo/databases/(default)/documents/ideas/a", "fields": {"text": {"stringValue": "A"}}}], "nextPageToken": "page-2"}"#;
    const LAST_PAGE: &str = r#"{"documents": [{"name": "projects/demo/databases/(default)/documents/ideas/b", "fields": {"text": {"stringValue": "B"}}}]}"#;
    const LOOPING_PAGE: &str = r#"{"documents": [], "nextPageToken": "same"}"#;

    #[tokio::test]
    async fn test_list_documents_follows_page_tokens() {
        let (addr, served) = serve_pages(vec![FIRST_PAGE, LAST_PAGE]).await;
        let client = Firestore::new("demo").with_emulator(&addr);

        let docs = client.list_documents("ideas").await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_list_documents_stops_on_repeated_token() {
        let (addr, served) = serve_pages(vec![LOOPING_PAGE]).await;
        let client = Firestore::new("demo").with_emulator(&addr);

        let err = client.list_documents("ideas").await.unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("same")));
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_collect_pages_passes_tokens_along() {
        let mut requested = Vec::new();
        let docs = collect_pages(|token| {
            requested.push(token.clone());
            let next = match token.as_deref() {
                None => page(&["1", "2"], Some("p2")),
                Some("p2") => page(&["3"], Some("")),
                Some(other) => panic!("unexpected token {other}"),
            };
            async move { Ok(next) }
        })
        .await
        .unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(requested, vec![None, Some("p2".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_pages_caps_endless_listing() {
        let mut calls = 0usize;
        let result = collect_pages(|_token| {
            calls += 1;
            let token = format!("token-{calls}");
            let next = page(&[], Some(token.as_str()));
            async move { Ok(next) }
        })
        .await;

        assert!(matches!(result, Err(Error::Parse(_))));
        assert_eq!(calls, MAX_PAGES);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_page_errors() {
        let result = collect_pages(|token| async move {
            match token {
                None => Ok(page(&["1"], Some("p2"))),
                Some(_) => Err(Error::Network("connection reset".to_string())),
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Network(_))));
    }
}
