//! Durable Postgres backend.
//!
//! Items are stored as JSONB documents keyed by a server-generated UUIDv4;
//! a `BIGSERIAL` sequence column preserves insertion order for listing.
//! Consents are a flat table keyed by the upstream `consent_id`.
//!
//! All functions take a `&PgPool` in the style of a thin table module; the
//! enum dispatch lives in [`crate::RecordStore`].

use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::ConsentRecord;

/// Initialize the connection pool and run embedded migrations.
///
/// Returns `Ok(None)` when `DATABASE_URL` is not set (memory-only mode) and
/// `Err` when the URL is set but connecting or migrating fails; the caller
/// decides whether that is fatal ([`crate::RecordStore::from_env`] degrades
/// to the memory store instead of aborting).
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — using the in-memory store. \
                 Records will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Insert an item document, returning it with the assigned `_id`.
pub async fn insert_item(
    pool: &PgPool,
    mut doc: Map<String, Value>,
) -> Result<Value, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO items (id, doc) VALUES ($1, $2)")
        .bind(id)
        .bind(Value::Object(doc.clone()))
        .execute(pool)
        .await?;

    doc.insert("_id".to_string(), Value::String(id.to_string()));
    Ok(Value::Object(doc))
}

/// List all item documents in insertion order, `_id` merged in.
pub async fn list_items(pool: &PgPool) -> Result<Vec<Value>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ItemRow>("SELECT id, doc FROM items ORDER BY seq")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(ItemRow::into_document).collect())
}

/// Delete at most one item by identifier.
///
/// An identifier that does not parse as a UUID cannot match any row and is
/// treated as absent: the delete reports success without touching the table.
pub async fn delete_item(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    let Ok(id) = id.parse::<Uuid>() else {
        return Ok(());
    };

    sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert a consent record.
pub async fn insert_consent(pool: &PgPool, record: &ConsentRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO consents (consent_id, status, url, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(&record.consent_id)
    .bind(&record.status)
    .bind(&record.url)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the first consent record with the given upstream id.
pub async fn find_consent(
    pool: &PgPool,
    consent_id: &str,
) -> Result<Option<ConsentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, ConsentRow>(
        "SELECT consent_id, status, url, created_at
         FROM consents WHERE consent_id = $1
         ORDER BY created_at LIMIT 1",
    )
    .bind(consent_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ConsentRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    doc: Value,
}

impl ItemRow {
    fn into_document(self) -> Value {
        let mut doc = match self.doc {
            Value::Object(map) => map,
            other => {
                // A non-object document can only appear through out-of-band
                // writes; wrap it rather than dropping the row.
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        doc.insert("_id".to_string(), Value::String(self.id.to_string()));
        Value::Object(doc)
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ConsentRow {
    consent_id: String,
    status: String,
    url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ConsentRow {
    fn into_record(self) -> ConsentRecord {
        ConsentRecord {
            consent_id: self.consent_id,
            status: self.status,
            url: self.url,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_row_merges_id_into_document() {
        let row = ItemRow {
            id: Uuid::nil(),
            doc: json!({"name": "rent"}),
        };
        let doc = row.into_document();
        assert_eq!(doc["name"], "rent");
        assert_eq!(doc["_id"], Uuid::nil().to_string());
    }

    #[test]
    fn item_row_wraps_non_object_document() {
        let row = ItemRow {
            id: Uuid::nil(),
            doc: json!(42),
        };
        let doc = row.into_document();
        assert_eq!(doc["value"], 42);
        assert!(doc["_id"].is_string());
    }
}
