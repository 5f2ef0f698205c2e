//! PostgreSQL backend: one table per collection, documents stored as JSONB.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{prepare_batch, Collection, DocumentStore, StoreError};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create the connection pool. Fails if the first connection cannot be
    /// established.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// Create the collection tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {collection}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Value>,
    ) -> Result<usize, StoreError> {
        let batch = prepare_batch(collection, docs)?;
        let sql = format!("INSERT INTO {collection} (id, doc) VALUES ($1, $2)");

        let mut tx = self.pool.begin().await?;
        for (id, doc) in &batch {
            let result = sqlx::query(&sql).bind(id).bind(doc).execute(&mut *tx).await;
            if let Err(e) = result {
                // Dropping `tx` rolls the whole batch back.
                let is_duplicate = e
                    .as_database_error()
                    .and_then(|db| db.code())
                    .is_some_and(|code| code == UNIQUE_VIOLATION);
                return Err(if is_duplicate {
                    StoreError::Duplicate {
                        collection,
                        id: id.clone(),
                    }
                } else {
                    StoreError::Query(e)
                });
            }
        }
        tx.commit().await?;

        Ok(batch.len())
    }

    async fn find(&self, collection: Collection, filter: &Value) -> Result<Vec<Value>, StoreError> {
        let docs = sqlx::query_scalar::<_, Value>(&format!(
            "SELECT doc FROM {collection} WHERE doc @> $1 ORDER BY seq"
        ))
        .bind(filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Value>, StoreError> {
        let doc = sqlx::query_scalar::<_, Value>(&format!(
            "SELECT doc FROM {collection} WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc)
    }
}
