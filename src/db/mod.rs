//! Document store abstraction and connection bootstrap.
//!
//! Collections hold schema-flexible JSON documents keyed by a string `_id`.
//! Two backends implement [`DocumentStore`]: PostgreSQL (one JSONB table per
//! collection) and an in-process store selected with a `memory://` location.

pub mod memory;
pub mod postgres;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Location prefix that selects the in-process backend.
pub const MEMORY_SCHEME: &str = "memory://";

/// The six collections backing the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Products,
    ProductStats,
    Transactions,
    OverallStats,
    AffiliateStats,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Products,
        Collection::ProductStats,
        Collection::Transactions,
        Collection::OverallStats,
        Collection::AffiliateStats,
    ];

    /// Storage name; also the Postgres table name.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::ProductStats => "productstats",
            Collection::Transactions => "transactions",
            Collection::OverallStats => "overallstats",
            Collection::AffiliateStats => "affiliatestats",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to document store: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to prepare collections: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("duplicate _id {id:?} in {collection}")]
    Duplicate { collection: Collection, id: String },

    #[error("invalid document for {collection}: {reason}")]
    InvalidDocument {
        collection: Collection,
        reason: String,
    },

    #[error("failed to decode {collection} document: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Connection to a document database.
///
/// Filters passed to [`DocumentStore::find`] use JSON containment: a document
/// matches when every key/value in the filter is present in it. An empty
/// object matches everything. Results come back in insertion order.
#[async_trait]
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;

    /// Insert all documents or none. Documents without an `_id` get one.
    /// Returns the number inserted.
    async fn insert_many(&self, collection: Collection, docs: Vec<Value>)
        -> Result<usize, StoreError>;

    async fn find(&self, collection: Collection, filter: &Value) -> Result<Vec<Value>, StoreError>;

    async fn find_by_id(&self, collection: Collection, id: &str)
        -> Result<Option<Value>, StoreError>;
}

/// Shared store handle carried in application state.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Open the store named by `location`, exactly once, with no retry.
pub async fn connect(location: &str, max_connections: u32) -> Result<SharedStore, StoreError> {
    if location.starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgDocumentStore::connect(location, max_connections).await?;
    store.migrate().await?;
    Ok(Arc::new(store))
}

/// A typed model stored in one collection.
pub trait Document: Serialize + DeserializeOwned + Send {
    const COLLECTION: Collection;
}

/// Find documents of `T` matching `filter`.
///
/// Documents that do not decode as `T` are logged and left out, so one
/// foreign record does not fail the whole listing.
pub async fn find_as<T: Document>(
    store: &dyn DocumentStore,
    filter: &Value,
) -> Result<Vec<T>, StoreError> {
    let docs = store.find(T::COLLECTION, filter).await?;
    Ok(docs.into_iter().filter_map(decode_or_skip::<T>).collect())
}

fn decode_or_skip<T: Document>(doc: Value) -> Option<T> {
    let id = doc
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string();
    match serde_json::from_value(doc) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(
                collection = %T::COLLECTION,
                id = %id,
                error = %error,
                "Skipping document that does not match its model"
            );
            None
        }
    }
}

/// Find a single `T` by `_id`.
pub async fn find_by_id_as<T: Document>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store
        .find_by_id(T::COLLECTION, id)
        .await?
        .map(|doc| decode(T::COLLECTION, doc))
        .transpose()
}

fn decode<T: DeserializeOwned>(collection: Collection, doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|source| StoreError::Decode { collection, source })
}

/// Validate a batch for insertion: every document must be an object, gets an
/// `_id` if it lacks one, and no two documents may share an `_id`.
pub(crate) fn prepare_batch(
    collection: Collection,
    docs: Vec<Value>,
) -> Result<Vec<(String, Value)>, StoreError> {
    let mut seen = HashSet::with_capacity(docs.len());
    let mut prepared = Vec::with_capacity(docs.len());

    for mut doc in docs {
        let Some(object) = doc.as_object_mut() else {
            return Err(StoreError::InvalidDocument {
                collection,
                reason: "document is not a JSON object".to_string(),
            });
        };

        let id = match object.get("_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::String(_)) | None => {
                let id = Uuid::new_v4().simple().to_string();
                object.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
            Some(other) => {
                return Err(StoreError::InvalidDocument {
                    collection,
                    reason: format!("_id must be a string, got {other}"),
                });
            }
        };

        if !seen.insert(id.clone()) {
            return Err(StoreError::Duplicate { collection, id });
        }
        prepared.push((id, doc));
    }

    Ok(prepared)
}

/// JSON containment with the same rules as Postgres `jsonb @>`.
pub(crate) fn contains(doc: &Value, filter: &Value) -> bool {
    match (doc, filter) {
        (Value::Object(doc), Value::Object(filter)) => filter
            .iter()
            .all(|(key, want)| doc.get(key).is_some_and(|have| contains(have, want))),
        (Value::Array(doc), Value::Array(filter)) => filter
            .iter()
            .all(|want| doc.iter().any(|have| contains(have, want))),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn collection_names_match_storage() {
        let names: Vec<_> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            [
                "users",
                "products",
                "productstats",
                "transactions",
                "overallstats",
                "affiliatestats"
            ]
        );
    }

    #[test]
    fn containment_matches_nested_values() {
        let doc = json!({"role": "user", "year": 2021, "tags": ["a", "b"], "meta": {"x": 1}});
        assert!(contains(&doc, &json!({})));
        assert!(contains(&doc, &json!({"role": "user"})));
        assert!(contains(&doc, &json!({"year": 2021.0})));
        assert!(contains(&doc, &json!({"tags": ["b"]})));
        assert!(contains(&doc, &json!({"meta": {"x": 1}})));
        assert!(!contains(&doc, &json!({"role": "admin"})));
        assert!(!contains(&doc, &json!({"missing": null})));
    }

    #[test]
    fn prepare_batch_assigns_missing_ids() {
        let batch = prepare_batch(
            Collection::Users,
            vec![json!({"_id": "abc", "name": "a"}), json!({"name": "b"})],
        )
        .unwrap();
        assert_eq!(batch[0].0, "abc");
        assert_eq!(batch[1].0.len(), 32);
        assert_eq!(batch[1].1["_id"], batch[1].0.as_str());
    }

    #[test]
    fn prepare_batch_rejects_duplicates_and_non_objects() {
        let err = prepare_batch(
            Collection::Products,
            vec![json!({"_id": "x"}), json!({"_id": "x"})],
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let err = prepare_batch(Collection::Products, vec![json!([1, 2])]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { .. }));

        let err = prepare_batch(Collection::Products, vec![json!({"_id": 7})]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { .. }));
    }

    #[derive(Debug, serde::Deserialize, Serialize)]
    struct Tagged {
        #[serde(rename = "_id")]
        id: String,
        tag: String,
    }

    impl Document for Tagged {
        const COLLECTION: Collection = Collection::Products;
    }

    #[tokio::test]
    async fn find_as_skips_documents_that_do_not_decode() {
        let store = MemoryStore::new();
        store
            .insert_many(
                Collection::Products,
                vec![
                    json!({"_id": "a", "tag": "x"}),
                    json!({"_id": "b"}),
                    json!({"_id": "c", "tag": "y"}),
                ],
            )
            .await
            .unwrap();

        let found = find_as::<Tagged>(&store, &json!({})).await.unwrap();
        let ids: Vec<_> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        let err = find_by_id_as::<Tagged>(&store, "b").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn connect_memory_scheme_yields_memory_backend() {
        let store = connect("memory://", 1).await.unwrap();
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.count(Collection::Users).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn connect_rejects_malformed_location() {
        let result = connect("not-a-database-url", 1).await;
        assert!(matches!(result, Err(StoreError::Connect(_))));
    }
}
