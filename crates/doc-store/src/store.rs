use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Document, DocumentId, Query, Result, StoreError};

/// An ordered set of dotted-path writes applied to a single document.
///
/// Paths address nested members (`"state.isPaid"`). When two writes target
/// the same path, the later write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates {
    updates: Vec<(String, Value)>,
}

impl FieldUpdates {
    /// Creates an empty update set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write, builder-style.
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(path, value);
        self
    }

    /// Records a write.
    pub fn push(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.updates.push((path.into(), value.into()));
    }

    /// Returns true if no writes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Returns the number of recorded writes.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Iterates over the recorded writes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.updates.iter().map(|(path, value)| (path.as_str(), value))
    }
}

/// Core trait for document store implementations.
///
/// A document store holds named collections of JSON documents addressed by
/// id. All implementations must be thread-safe (Send + Sync).
///
/// Atomicity is per document: `update` applies all of its field writes in
/// one step or not at all. There are no multi-document transactions, so a
/// sequence of calls can interleave with concurrent writers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Retrieves a document by id, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>>;

    /// Inserts a document under a freshly generated id and returns the id.
    async fn insert(&self, collection: &str, data: Value) -> Result<DocumentId>;

    /// Writes a document under the given id, replacing any existing body.
    async fn set(&self, collection: &str, id: &DocumentId, data: Value) -> Result<()>;

    /// Applies field updates to an existing document in one atomic step.
    ///
    /// Missing parent objects on a dotted path are created. Fails with
    /// `NotFound` if the document does not exist. An empty update set is a
    /// no-op.
    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        updates: FieldUpdates,
    ) -> Result<()>;

    /// Deletes a document. Deleting a missing document is a no-op.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()>;

    /// Retrieves the documents in a collection matching a query, in
    /// insertion order.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>>;
}

/// Splits a dotted field path into segments.
///
/// Rejects empty paths and paths with empty segments (`"state."`,
/// `".isPaid"`, `"a..b"`).
pub fn split_field_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(StoreError::InvalidFieldPath(path.to_string()));
    }
    Ok(segments)
}

/// Applies a set of dotted-path writes to a document body.
///
/// Parent segments are created as objects where missing; non-object values
/// along a path are replaced by objects. Shared by the store
/// implementations so both engines patch documents identically. Callers
/// apply updates to a working copy so a failed write leaves the stored
/// document untouched.
pub fn apply_field_updates(data: &mut Value, updates: &FieldUpdates) -> Result<()> {
    for (path, value) in updates.iter() {
        write_field(data, path, value.clone())?;
    }
    Ok(())
}

fn write_field(data: &mut Value, path: &str, value: Value) -> Result<()> {
    let mut segments = split_field_path(path)?.into_iter().peekable();
    let mut object = ensure_object(data);
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return Ok(());
        }
        let slot = object.entry(segment.to_string()).or_insert(Value::Null);
        object = ensure_object(slot);
    }
    Ok(())
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was replaced with an object above"),
    }
}
