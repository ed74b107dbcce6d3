//! Document-store capability consumed by the member workflow.
//!
//! The workflow never talks to a database directly; it holds an
//! `Arc<dyn MemberStore>` handed to it at construction. Production wires in
//! [`PgMemberStore`](crate::kernel::postgres::PgMemberStore); tests use
//! [`InMemoryMemberStore`](crate::kernel::memory::InMemoryMemberStore).
//!
//! Documents are schemaless field maps so that merge-patch updates can add
//! or overwrite arbitrary fields. The store stamps `created_at` with its own
//! clock at insert time; nothing else about a document's shape is enforced
//! here.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Field name holding the registration timestamp, stamped by the store.
pub const CREATED_AT_FIELD: &str = "created_at";

/// The fields of a stored document, keyed by field name.
pub type FieldMap = serde_json::Map<String, Value>;

/// A document as returned by a store query: its generated id plus all fields.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: Uuid,
    pub fields: FieldMap,
}

/// Errors surfaced by a store implementation.
///
/// These propagate to callers with their original message; the workflow does
/// not retry and does not distinguish transient from permanent failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An update was addressed to an id that no longer exists — the losing
    /// side of a lookup-then-mutate race.
    #[error("no member document with id {0}")]
    MissingDocument(Uuid),
}

/// A document collection supporting the four primitives the workflow needs.
///
/// Consistency model: none beyond single-call atomicity. Two calls issued by
/// the same operation (a query followed by an update or delete) get no
/// isolation from concurrent writers, and read-your-writes is not assumed
/// across calls.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Insert a new document, stamping `created_at` with the store's clock.
    /// Returns the generated id.
    async fn insert(&self, fields: FieldMap) -> Result<Uuid, StoreError>;

    /// Documents whose `field` equals `value`, at most `limit` of them.
    /// Ordering is implementation-defined.
    async fn query_equal(
        &self,
        field: &str,
        value: &str,
        limit: i64,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Merge-patch `patch` onto the document with the given id: fields in
    /// `patch` are set, all others are left untouched. Errors with
    /// [`StoreError::MissingDocument`] if the id has vanished.
    async fn update_by_id(&self, id: Uuid, patch: &FieldMap) -> Result<(), StoreError>;

    /// Delete the document with the given id. Deleting an id that no longer
    /// exists is a no-op ack, matching document-store semantics.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}
