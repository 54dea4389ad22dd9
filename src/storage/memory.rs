//! In-process document store.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::storage::{has_id, Document, DocumentStore, ListOptions, StoreError, ID_FIELD};

/// Collections held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document, assigning a UUID `_id` when it has none.
    /// Returns the document's id.
    pub fn insert(&self, collection: &str, mut doc: Document) -> String {
        let id = match doc.get(ID_FIELD) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                let id = Uuid::new_v4().to_string();
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert(ID_FIELD.to_string(), serde_json::Value::String(id.clone()));
                }
                id
            }
        };

        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        id
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self, collection: &str, opts: ListOptions) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| opts.apply(docs.iter().cloned()))
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)).cloned()))
    }
}
