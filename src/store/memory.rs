use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Collection, DocumentStore, ObjectId, Predicate, RawDocument, StoreResult, ID_FIELD};

/// In-process document store (local development and tests).
///
/// Documents are kept per collection in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<(ObjectId, RawDocument)>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: Collection, mut document: RawDocument) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));

        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push((id, document));

        tracing::debug!(collection = %collection, id = %id, "Document inserted");
        Ok(id)
    }

    async fn find_many(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> StoreResult<Vec<RawDocument>> {
        let guard = self.collections.read();
        let docs: Vec<RawDocument> = guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| predicate.matches(doc))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: ObjectId,
    ) -> StoreResult<Option<RawDocument>> {
        let guard = self.collections.read();
        Ok(guard.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| *doc_id == id)
                .map(|(_, doc)| doc.clone())
        }))
    }
}
