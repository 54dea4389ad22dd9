//! Document storage subsystem.
//!
//! # Data Flow
//! ```text
//! connection string (config or env var)
//!     → connect() picks a backend by URI scheme
//!         memory://      → memory.rs (in-process, concurrent map)
//!         file:///dir    → file.rs (one JSON array per collection)
//!         anything else  → UnsupportedScheme
//!     → Arc<dyn DocumentStore> held by AppContext
//! ```
//!
//! # Design Decisions
//! - Documents are schemaless JSON objects keyed by `_id`
//! - Stores are read-mostly; the HTTP surface only reads
//! - The trait is the seam for a networked driver

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A stored document.
pub type Document = serde_json::Value;

/// Field identifying a document inside its collection.
pub const ID_FIELD: &str = "_id";

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection string was configured.
    #[error("connection string not set (expected env var {0})")]
    MissingUri(String),

    /// The connection string is not a valid URI.
    #[error("invalid connection string: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// No backend is compiled in for this URI scheme.
    #[error("unsupported database scheme '{0}'")]
    UnsupportedScheme(String),

    /// Connecting took longer than the configured timeout.
    #[error("connection timed out after {0} seconds")]
    Timeout(u64),

    /// The process is running without a database connection.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("collection '{collection}' is malformed: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Pagination for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl ListOptions {
    /// Apply skip/limit to an ordered sequence.
    pub fn apply<I>(&self, docs: I) -> Vec<Document>
    where
        I: IntoIterator<Item = Document>,
    {
        let iter = docs.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// Read access to a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// List a collection in stored order. Unknown collections are empty.
    async fn list(&self, collection: &str, opts: ListOptions) -> Result<Vec<Document>, StoreError>;

    /// Look up one document by its `_id`.
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
}

/// Returns true when `doc` carries `id` in its `_id` field.
///
/// Both string and numeric ids are compared by their textual form.
pub fn has_id(doc: &Document, id: &str) -> bool {
    match doc.get(ID_FIELD) {
        Some(serde_json::Value::String(s)) => s == id,
        Some(serde_json::Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// Open a store for the given connection string.
pub async fn connect(uri: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let url = Url::parse(uri)?;

    let store: Arc<dyn DocumentStore> = match url.scheme() {
        "memory" => Arc::new(MemoryStore::new()),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| StoreError::UnsupportedScheme("file (non-local path)".into()))?;
            Arc::new(FileStore::open(path).await?)
        }
        other => return Err(StoreError::UnsupportedScheme(other.to_string())),
    };

    store.ping().await?;
    tracing::debug!(kind = store.kind(), "Document store opened");
    Ok(store)
}
