//! Vector store abstraction for tenant document collections.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use {async_trait::async_trait, serde::Serialize};

use crate::ServiceResult;

/// One document as stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentObject {
    pub content: String,
    pub title: String,
    pub filename: String,
    /// Free-form metadata, usually a JSON string.
    pub metadata: String,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create `collection` with `model` as vectorizer unless it exists.
    async fn ensure_collection(&self, collection: &str, model: &str) -> ServiceResult<()>;

    /// Insert a batch; returns per-object failures keyed by batch index.
    async fn insert_many(
        &self,
        collection: &str,
        objects: Vec<DocumentObject>,
    ) -> ServiceResult<BTreeMap<usize, String>>;
}

/// Process-local store for tests and the terminal wizard without Weaviate.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: Mutex<HashMap<String, Vec<DocumentObject>>>,
}

impl InMemoryVectorStore {
    pub fn documents(&self, collection: &str) -> Vec<DocumentObject> {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections.contains_key(collection)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_collection(&self, collection: &str, _model: &str) -> ServiceResult<()> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        collections.entry(collection.to_string()).or_default();
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        objects: Vec<DocumentObject>,
    ) -> ServiceResult<BTreeMap<usize, String>> {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let mut errors = BTreeMap::new();
        let Some(docs) = collections.get_mut(collection) else {
            for i in 0..objects.len() {
                errors.insert(i, format!("collection {collection} does not exist"));
            }
            return Ok(errors);
        };
        for (i, object) in objects.into_iter().enumerate() {
            if object.content.is_empty() {
                errors.insert(i, "empty content".to_string());
                continue;
            }
            docs.push(object);
        }
        Ok(errors)
    }
}
