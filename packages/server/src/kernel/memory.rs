//! In-process member store for tests and local development.
//!
//! Documents are kept in insertion order, which makes "the store's first
//! match" deterministic in tests. Semantics otherwise mirror
//! [`PgMemberStore`](crate::kernel::postgres::PgMemberStore): `created_at`
//! is stamped at insert, updates to a vanished id error, deletes of a
//! vanished id ack.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{FieldMap, MemberStore, StoreError, StoredDocument, CREATED_AT_FIELD};

#[derive(Default)]
pub struct InMemoryMemberStore {
    docs: RwLock<Vec<StoredDocument>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn insert(&self, mut fields: FieldMap) -> Result<Uuid, StoreError> {
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            serde_json::to_value(Utc::now()).expect("timestamps serialize"),
        );

        let id = Uuid::new_v4();
        self.docs.write().await.push(StoredDocument { id, fields });
        Ok(id)
    }

    async fn query_equal(
        &self,
        field: &str,
        value: &str,
        limit: i64,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|doc| doc.fields.get(field).and_then(|v| v.as_str()) == Some(value))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_by_id(&self, id: Uuid, patch: &FieldMap) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let doc = docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or(StoreError::MissingDocument(id))?;

        for (key, value) in patch {
            doc.fields.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.docs.write().await.retain(|doc| doc.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_stamps_created_at() {
        let store = InMemoryMemberStore::new();
        let id = store
            .insert(fields(&[("name", "Jimin"), ("email", "jimin@example.com")]))
            .await
            .unwrap();

        let found = store.query_equal("name", "Jimin", 1).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert!(found[0].fields.contains_key(CREATED_AT_FIELD));
    }

    #[tokio::test]
    async fn test_query_returns_first_inserted_on_duplicates() {
        let store = InMemoryMemberStore::new();
        let first = store
            .insert(fields(&[("name", "Jimin"), ("email", "a@x.com")]))
            .await
            .unwrap();
        store
            .insert(fields(&[("name", "Jimin"), ("email", "b@x.com")]))
            .await
            .unwrap();

        let found = store.query_equal("name", "Jimin", 1).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first);
    }

    #[tokio::test]
    async fn test_update_merges_only_supplied_fields() {
        let store = InMemoryMemberStore::new();
        let id = store
            .insert(fields(&[("name", "Jimin"), ("email", "old@x.com")]))
            .await
            .unwrap();

        store
            .update_by_id(id, &fields(&[("email", "new@x.com")]))
            .await
            .unwrap();

        let doc = &store.query_equal("name", "Jimin", 1).await.unwrap()[0];
        assert_eq!(doc.fields["email"], json!("new@x.com"));
        assert_eq!(doc.fields["name"], json!("Jimin"));
    }

    #[tokio::test]
    async fn test_update_missing_id_errors() {
        let store = InMemoryMemberStore::new();
        let err = store
            .update_by_id(Uuid::new_v4(), &fields(&[("email", "x@y.com")]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingDocument(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let store = InMemoryMemberStore::new();
        store.delete_by_id(Uuid::new_v4()).await.unwrap();
    }
}
