//! Directory-backed document store.
//!
//! Each collection lives in `<root>/<collection>.json` as a JSON array of
//! objects. Files are read on every call so edits show up without a restart.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::storage::{has_id, Document, DocumentStore, ListOptions, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at an existing directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let meta = tokio::fs::metadata(&root).await?;
        if !meta.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            )));
        }
        Ok(Self { root })
    }

    fn collection_path(&self, collection: &str) -> Option<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.root.join(format!("{}.json", collection)))
    }

    async fn load(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let Some(path) = self.collection_path(collection) else {
            return Ok(Vec::new());
        };

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|source| StoreError::Decode {
            collection: collection.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tokio::fs::metadata(&self.root).await?;
        Ok(())
    }

    async fn list(&self, collection: &str, opts: ListOptions) -> Result<Vec<Document>, StoreError> {
        Ok(opts.apply(self.load(collection).await?))
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .load(collection)
            .await?
            .into_iter()
            .find(|doc| has_id(doc, id)))
    }
}
