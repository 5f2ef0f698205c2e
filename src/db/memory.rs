//! In-process backend selected with a `memory://` location.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{contains, prepare_batch, Collection, DocumentStore, StoreError};

#[derive(Debug, Default)]
struct MemoryCollection {
    // Insertion order; ids index into `docs`.
    docs: Vec<Value>,
    ids: HashMap<String, usize>,
}

/// Document store kept entirely in memory. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(&collection).map_or(0, |c| c.docs.len() as u64))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<usize, StoreError> {
        let batch = prepare_batch(collection, docs)?;

        let mut guard = self.collections.write().map_err(|_| Self::poisoned())?;
        let target = guard.entry(collection).or_default();

        // Check the whole batch before touching anything.
        let incoming: HashSet<&str> = batch.iter().map(|(id, _)| id.as_str()).collect();
        if let Some(id) = incoming.iter().find(|id| target.ids.contains_key(**id)) {
            return Err(StoreError::Duplicate {
                collection,
                id: (*id).to_string(),
            });
        }

        let inserted = batch.len();
        for (id, doc) in batch {
            target.ids.insert(id, target.docs.len());
            target.docs.push(doc);
        }
        Ok(inserted)
    }

    async fn find(&self, collection: Collection, filter: &Value) -> Result<Vec<Value>, StoreError> {
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(guard
            .get(&collection)
            .map(|c| {
                c.docs
                    .iter()
                    .filter(|doc| contains(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Value>, StoreError> {
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(guard
            .get(&collection)
            .and_then(|c| c.ids.get(id).map(|&idx| c.docs[idx].clone())))
    }
}
