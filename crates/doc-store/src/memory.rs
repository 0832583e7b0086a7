use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    Document, DocumentId, Query, Result, StoreError,
    store::{DocumentStore, FieldUpdates, apply_field_updates},
};

/// In-memory document store for tests and local development.
///
/// Collections are vectors kept in insertion order, matching the ordering
/// guarantee of the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<(DocumentId, Value)>>>>,
}

impl MemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Clears every collection.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(doc_id, data)| Document::new(doc_id.clone(), data.clone()))
        }))
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<DocumentId> {
        let id = DocumentId::generate();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), data));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &DocumentId, data: Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = data,
            None => docs.push((id.clone(), data)),
        }
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        updates: FieldUpdates,
    ) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| StoreError::not_found(collection, id.as_str()))?;

        // Patch a working copy so a bad field path leaves the stored
        // document untouched.
        let mut data = slot.1.clone();
        apply_field_updates(&mut data, &updates)?;
        slot.1 = data;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(docs
            .iter()
            .filter(|(_, data)| query.matches(data))
            .take(limit)
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect())
    }
}
