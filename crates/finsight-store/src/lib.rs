//! # finsight-store — Record Store for the Finsight backend
//!
//! Persists two schema-less collections — `items` (arbitrary JSON documents
//! with a server-assigned `_id`) and `consents` (Account Aggregator consent
//! records) — behind one interface with two interchangeable backends:
//!
//! - **Postgres** (durable): selected when `DATABASE_URL` is set and the
//!   pool connects. Documents live in JSONB columns; item ids are UUIDv4.
//! - **Memory** (volatile, dev-only): selected otherwise. State is process
//!   local and resets on restart; item ids are the 1-based insertion
//!   sequence rendered as strings.
//!
//! The backend is chosen exactly once at startup via
//! [`RecordStore::from_env`]. Callers see identical behavior apart from
//! durability and identifier format.

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use utoipa::ToSchema;

/// One tracked request for end-user financial-data consent.
///
/// Created only as a side effect of a successful upstream initiate call
/// whose response carried an `id`; never updated afterwards. The stored
/// `status` reflects the upstream's answer at initiate time and goes stale
/// relative to upstream truth — this service has no callback receiver.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsentRecord {
    /// Upstream-assigned consent identifier; the lookup key.
    pub consent_id: String,
    /// Upstream-reported status, `"PENDING"` when the upstream omitted it.
    pub status: String,
    /// Redirect URL for the end user to approve the consent, if provided.
    pub url: Option<String>,
    /// Server clock at record creation.
    pub created_at: DateTime<Utc>,
}

/// The record store, one of two backends selected at startup.
///
/// All methods are async so the two variants share a signature; the memory
/// variant completes synchronously under a `parking_lot` lock and never
/// returns an error.
#[derive(Debug, Clone)]
pub enum RecordStore {
    /// Durable Postgres-backed store.
    Postgres(PgPool),
    /// Volatile in-process store.
    Memory(MemoryStore),
}

impl RecordStore {
    /// Select the backend from the environment.
    ///
    /// `DATABASE_URL` unset, unreachable, or failing migration all degrade
    /// to the memory store with a logged warning — never a startup abort.
    pub async fn from_env() -> Self {
        match postgres::init_pool().await {
            Ok(Some(pool)) => Self::Postgres(pool),
            Ok(None) => Self::Memory(MemoryStore::new()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "database connection failed, falling back to in-memory store"
                );
                Self::Memory(MemoryStore::new())
            }
        }
    }

    /// A fresh memory-backed store, used by tests and by `from_env` fallback.
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Insert an item document, assigning its `_id`.
    ///
    /// Returns the stored document including the assigned identifier.
    pub async fn insert_item(&self, doc: Map<String, Value>) -> Result<Value, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(postgres::insert_item(pool, doc).await?),
            Self::Memory(store) => Ok(store.insert_item(doc)),
        }
    }

    /// List all item documents in insertion order.
    pub async fn list_items(&self) -> Result<Vec<Value>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(postgres::list_items(pool).await?),
            Self::Memory(store) => Ok(store.list_items()),
        }
    }

    /// Delete at most one item by identifier.
    ///
    /// A missing or unparseable identifier is a success no-op; no error is
    /// signaled either way.
    pub async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => Ok(postgres::delete_item(pool, id).await?),
            Self::Memory(store) => {
                store.delete_item(id);
                Ok(())
            }
        }
    }

    /// Persist a consent record.
    pub async fn insert_consent(&self, record: &ConsentRecord) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => Ok(postgres::insert_consent(pool, record).await?),
            Self::Memory(store) => {
                store.insert_consent(record.clone());
                Ok(())
            }
        }
    }

    /// Look up a consent record by its upstream identifier.
    pub async fn find_consent(&self, consent_id: &str) -> Result<Option<ConsentRecord>, StoreError> {
        match self {
            Self::Postgres(pool) => Ok(postgres::find_consent(pool, consent_id).await?),
            Self::Memory(store) => Ok(store.find_consent(consent_id)),
        }
    }
}
