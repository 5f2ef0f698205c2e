//! Seed-if-empty startup routine for the six dashboard collections.
//!
//! Each collection is checked and, when empty, filled with its bundled
//! fixture set in one bulk insert. Collections that already hold documents
//! are left alone, so restarting against a populated store is a no-op.
//!
//! Two processes starting against the same empty store at the same moment
//! can both see a zero count. Nothing here prevents that; on Postgres the
//! second bulk insert hits the `_id` primary key and its startup fails.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::db::{Collection, DocumentStore, StoreError};
use crate::fixtures::{Fixture, FIXTURES};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seeding {collection} failed: {source}")]
    Store {
        collection: Collection,
        #[source]
        source: StoreError,
    },

    #[error("bundled {collection} fixtures are not valid JSON: {source}")]
    Fixture {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
}

/// What happened to one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded { inserted: usize },
    Skipped { existing: u64 },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub collections: Vec<(Collection, SeedOutcome)>,
}

impl SeedReport {
    pub fn outcome(&self, collection: Collection) -> Option<SeedOutcome> {
        self.collections
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, outcome)| *outcome)
    }

    /// Total records inserted across all collections.
    pub fn inserted(&self) -> usize {
        self.collections
            .iter()
            .map(|(_, outcome)| match outcome {
                SeedOutcome::Seeded { inserted } => *inserted,
                SeedOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Seed every empty collection from the bundled fixtures.
pub async fn seed_all(store: &dyn DocumentStore) -> Result<SeedReport, SeedError> {
    seed_with(store, &FIXTURES).await
}

/// Seed from an explicit fixture list, in order, stopping at the first error.
pub async fn seed_with(
    store: &dyn DocumentStore,
    fixtures: &[Fixture],
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    for fixture in fixtures {
        let outcome = seed_collection(store, fixture).await?;
        report.collections.push((fixture.collection, outcome));
    }
    Ok(report)
}

/// Insert `fixture` into its collection only if the collection is empty.
pub async fn seed_collection(
    store: &dyn DocumentStore,
    fixture: &Fixture,
) -> Result<SeedOutcome, SeedError> {
    let collection = fixture.collection;
    let store_err = |source| SeedError::Store { collection, source };

    let existing = store.count(collection).await.map_err(store_err)?;
    if existing > 0 {
        tracing::debug!(%collection, existing, "Collection already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let mut docs = fixture
        .documents()
        .map_err(|source| SeedError::Fixture { collection, source })?;
    stamp_timestamps(&mut docs);

    let inserted = store.insert_many(collection, docs).await.map_err(store_err)?;
    tracing::info!(%collection, inserted, "Inserted {inserted} {collection} records");

    Ok(SeedOutcome::Seeded { inserted })
}

/// Fill in `createdAt`/`updatedAt` on documents that lack them.
fn stamp_timestamps(docs: &mut [Value]) {
    let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    for doc in docs.iter_mut().filter_map(Value::as_object_mut) {
        doc.entry("createdAt").or_insert_with(|| now.clone());
        doc.entry("updatedAt").or_insert_with(|| now.clone());
    }
}
