//! PostgreSQL-backed member store.
//!
//! Documents live in a single `members` table as JSONB rows; the database
//! generates ids and stamps `created_at` via `now()` so the registration
//! timestamp always comes from the store's clock. The equality query carries
//! no ORDER BY — with duplicate names, whichever row the planner surfaces
//! first wins, and callers must not assume more.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{FieldMap, MemberStore, StoreError, StoredDocument, CREATED_AT_FIELD};

/// Member document store over a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn insert(&self, fields: FieldMap) -> Result<Uuid, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO members (doc)
             VALUES ($1::jsonb || jsonb_build_object($2::text, to_jsonb(now())))
             RETURNING id",
        )
        .bind(Value::Object(fields))
        .bind(CREATED_AT_FIELD)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn query_equal(
        &self,
        field: &str,
        value: &str,
        limit: i64,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let rows: Vec<(Uuid, Value)> =
            sqlx::query_as("SELECT id, doc FROM members WHERE doc->>$1 = $2 LIMIT $3")
                .bind(field)
                .bind(value)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, doc)| StoredDocument {
                id,
                fields: match doc {
                    Value::Object(map) => map,
                    // doc is JSONB NOT NULL and only ever written as an object
                    _ => FieldMap::new(),
                },
            })
            .collect())
    }

    async fn update_by_id(&self, id: Uuid, patch: &FieldMap) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE members SET doc = doc || $2 WHERE id = $1")
            .bind(id)
            .bind(Value::Object(patch.clone()))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingDocument(id));
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        // Deliberately tolerant: deleting a row that a concurrent request
        // already removed still acks.
        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
