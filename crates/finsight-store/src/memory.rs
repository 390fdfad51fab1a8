//! Volatile in-process fallback store.
//!
//! Used when no `DATABASE_URL` is configured or the database is
//! unreachable at startup. State is process-local and lost on restart —
//! suitable for development only.
//!
//! Both collections sit behind a single `parking_lot::RwLock`
//! (non-poisoning, never held across `.await`). Item id assignment runs
//! under the write lock, so concurrent inserts cannot observe the same
//! length and duplicate an identifier.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::ConsentRecord;

#[derive(Debug, Default)]
struct Collections {
    items: Vec<Value>,
    consents: Vec<ConsentRecord>,
}

/// Cloneable handle to the shared in-memory collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, assigning the next 1-based sequence number as `_id`.
    pub fn insert_item(&self, mut doc: Map<String, Value>) -> Value {
        let mut guard = self.inner.write();
        let id = (guard.items.len() + 1).to_string();
        doc.insert("_id".to_string(), Value::String(id));
        let stored = Value::Object(doc);
        guard.items.push(stored.clone());
        stored
    }

    /// All items in insertion order.
    pub fn list_items(&self) -> Vec<Value> {
        self.inner.read().items.clone()
    }

    /// Remove the first item whose `_id` matches; silent no-op otherwise.
    pub fn delete_item(&self, id: &str) {
        let mut guard = self.inner.write();
        if let Some(pos) = guard
            .items
            .iter()
            .position(|item| item.get("_id").and_then(Value::as_str) == Some(id))
        {
            guard.items.remove(pos);
        }
    }

    /// Append a consent record.
    pub fn insert_consent(&self, record: ConsentRecord) {
        self.inner.write().consents.push(record);
    }

    /// First consent record with the given upstream id.
    pub fn find_consent(&self, consent_id: &str) -> Option<ConsentRecord> {
        self.inner
            .read()
            .consents
            .iter()
            .find(|c| c.consent_id == consent_id)
            .cloned()
    }
}
