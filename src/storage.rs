use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{Map, Value};
use sqlx::{
    PgPool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions},
    query_builder::QueryBuilder,
};
use std::{collections::HashMap, str::FromStr, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::sync::RwLock;

/// StoreError
///
/// Failures of the persistence layer. None of them are recoverable locally; handlers turn
/// them into a 500 after logging.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("document in `{0}` has no string `id` field")]
    MissingId(String),
}

/// Which value inside a document a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// An ISO-8601 timestamp string field.
    Timestamp(&'static str),
    /// An integer field.
    Integer(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: Direction,
}

impl Sort {
    pub const fn newest_first(field: &'static str) -> Self {
        Self {
            key: SortKey::Timestamp(field),
            direction: Direction::Descending,
        }
    }

    pub const fn ascending(field: &'static str) -> Self {
        Self {
            key: SortKey::Integer(field),
            direction: Direction::Ascending,
        }
    }
}

// 1. DocumentStore Contract
/// DocumentStore
///
/// Schema-flexible persistence: named collections of JSON documents, each carrying a
/// string `id` field. Every operation is a single round trip scoped to one collection;
/// atomicity of individual operations is whatever the backing store provides.
///
/// The trait lets the repository run against PostgreSQL in production and an in-process
/// map in tests without any change to the calling code.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a new document. The document must contain a string `id`.
    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError>;

    /// Returns up to `limit` documents ordered by `sort`.
    async fn find(&self, collection: &str, sort: Sort, limit: i64)
    -> Result<Vec<Value>, StoreError>;

    /// Returns the first document whose string `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Returns any one document of the collection. Used for singleton collections.
    async fn first(&self, collection: &str) -> Result<Option<Value>, StoreError>;

    /// Shallow-merges `fields` into the document with the given id.
    /// Returns false when no document matched.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<bool, StoreError>;

    /// Removes the document with the given id. Returns false when none existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Atomically empties the collection and inserts `document` as its only member.
    async fn replace_all(&self, collection: &str, document: Value) -> Result<(), StoreError>;

    /// Removes every document of the collection, returning how many were removed.
    async fn clear(&self, collection: &str) -> Result<u64, StoreError>;
}

/// StorageState
///
/// The concrete type used to share the document store across the application state.
pub type StorageState = Arc<dyn DocumentStore>;

fn document_id(collection: &str, document: &Value) -> Result<String, StoreError> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::MissingId(collection.to_string()))
}

// 2. The Real Implementation (PostgreSQL JSONB)
/// PostgresDocumentStore
///
/// Keeps every collection in the single `documents` table created by the migrations in
/// `./migrations`, with the document body stored as JSONB. Timestamps stay ISO-8601
/// strings inside the body and are cast to `timestamptz` only for ordering.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

const INSERT_DOCUMENT: &str = "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)";

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// connect
    ///
    /// Opens a pool against `db_name` on the server described by `database_url`.
    pub async fn connect(database_url: &str, db_name: &str) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(database_url)?.database(db_name);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        let id = document_id(collection, &document)?;
        sqlx::query(INSERT_DOCUMENT)
            .bind(collection)
            .bind(id)
            .bind(&document)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// find
    ///
    /// Builds the ORDER BY clause with QueryBuilder; the field name is bound as a
    /// parameter, only the cast and the direction keyword are pushed as SQL text.
    async fn find(
        &self,
        collection: &str,
        sort: Sort,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT body FROM documents WHERE collection = ");
        builder.push_bind(collection);

        builder.push(" ORDER BY (body->>");
        match sort.key {
            SortKey::Timestamp(field) => {
                builder.push_bind(field);
                builder.push(")::timestamptz");
            }
            SortKey::Integer(field) => {
                builder.push_bind(field);
                builder.push(")::bigint");
            }
        }
        builder.push(match sort.direction {
            Direction::Ascending => " ASC NULLS FIRST",
            Direction::Descending => " DESC NULLS LAST",
        });

        builder.push(" LIMIT ");
        builder.push_bind(limit);

        let documents = builder
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await?;
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let document = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND body->>$2 = $3 LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(document)
    }

    async fn first(&self, collection: &str) -> Result<Option<Value>, StoreError> {
        let document = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 LIMIT 1",
        )
        .bind(collection)
        .fetch_optional(&self.pool)
        .await?;
        Ok(document)
    }

    /// update
    ///
    /// `body || $3` merges top-level keys, matching `$set` semantics of a document store.
    /// PostgreSQL counts matched rows even when the merge changes nothing.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&fields)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        let id = document_id(collection, &document)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&mut *tx)
            .await?;
        sqlx::query(INSERT_DOCUMENT)
            .bind(collection)
            .bind(id)
            .bind(&document)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// 3. The In-Memory Implementation (tests, database-less runs)
/// MemoryDocumentStore
///
/// Keeps collections in a map guarded by an async RwLock. Ordering, merge and
/// not-found semantics mirror `PostgresDocumentStore` so handler and repository tests
/// exercise the same behaviour without a database.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

/// Reduces a document to a comparable key. Missing or unparsable values sort as `None`,
/// which orders before any present value, like SQL NULLs in the statements above.
fn sort_value(document: &Value, key: SortKey) -> Option<i64> {
    match key {
        SortKey::Timestamp(field) => document
            .get(field)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .and_then(|ts| ts.timestamp_nanos_opt()),
        SortKey::Integer(field) => document.get(field).and_then(Value::as_i64),
    }
}

fn matches_id(document: &Value, id: &str) -> bool {
    document.get("id").and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        document_id(collection, &document)?;
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        sort: Sort,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let mut documents = self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default();

        // Stable sort: equal keys keep insertion order.
        match sort.direction {
            Direction::Ascending => {
                documents.sort_by_key(|doc| sort_value(doc, sort.key));
            }
            Direction::Descending => {
                documents.sort_by(|a, b| sort_value(b, sort.key).cmp(&sort_value(a, sort.key)));
            }
        }

        documents.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn first(&self, collection: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.first().cloned()))
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|doc| matches_id(doc, id)))
        else {
            return Ok(false);
        };

        if let (Value::Object(target), Value::Object(source)) = (document, fields) {
            merge(target, source);
        }
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = documents.len();
        documents.retain(|doc| !matches_id(doc, id));
        Ok(documents.len() < before)
    }

    async fn replace_all(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        document_id(collection, &document)?;
        self.collections
            .write()
            .await
            .insert(collection.to_string(), vec![document]);
        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<u64, StoreError> {
        let removed = self
            .collections
            .write()
            .await
            .remove(collection)
            .map_or(0, |documents| documents.len());
        Ok(removed as u64)
    }
}

fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        target.insert(key, value);
    }
}
