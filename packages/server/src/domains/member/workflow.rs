//! Member workflow - the four directory operations.
//!
//! Each operation validates its input before touching the store, then issues
//! at most two store calls: a name lookup capped to one result, followed by
//! the mutation addressed to the id that lookup returned. Nothing serializes
//! those two calls against concurrent requests — a record can be mutated or
//! deleted in between, and the second call then fails or lands last-writer-
//! wins. That non-atomicity is part of the contract, not an oversight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::common::validate;
use crate::kernel::{FieldMap, MemberStore, StoredDocument, CREATED_AT_FIELD};

use super::data::{Confirmation, MemberRecord, RegisteredMember};
use super::errors::MemberError;

/// Minimum age of a member record before removal is allowed.
pub const MIN_AGE_BEFORE_REMOVE_MS: i64 = 60_000;

const NAME_FIELD: &str = "name";
const EMAIL_FIELD: &str = "email";

const REGISTERED_MESSAGE: &str = "member registered successfully";
const UPDATED_MESSAGE: &str = "member updated successfully";
const REMOVED_MESSAGE: &str = "member removed successfully";

/// The directory's lookup-and-mutate workflow.
///
/// Holds the store as an injected capability so tests can substitute an
/// in-memory implementation. Stateless across requests otherwise.
pub struct MemberWorkflow {
    store: Arc<dyn MemberStore>,
}

impl MemberWorkflow {
    pub fn new(store: Arc<dyn MemberStore>) -> Self {
        Self { store }
    }

    /// Register a new member.
    ///
    /// Validation is fail-fast: presence of both fields, then the name
    /// script check, then the email shape check. Registration is not
    /// idempotent — the store does not enforce name uniqueness, so repeated
    /// calls create distinct records.
    pub async fn register(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<RegisteredMember, MemberError> {
        let (Some(name), Some(email)) = (present(name), present(email)) else {
            return Err(MemberError::MissingFields);
        };

        if validate::contains_hangul(name) {
            return Err(MemberError::DisallowedScript);
        }

        if !validate::has_valid_email_format(email) {
            return Err(MemberError::InvalidEmailShape);
        }

        let mut fields = FieldMap::new();
        fields.insert(NAME_FIELD.to_string(), json!(name));
        fields.insert(EMAIL_FIELD.to_string(), json!(email));

        let id = self.store.insert(fields).await.map_err(|e| {
            error!(error = %e, "member insert failed");
            e
        })?;

        info!(%id, name, "member registered");

        Ok(RegisteredMember {
            id,
            message: REGISTERED_MESSAGE.to_string(),
        })
    }

    /// Look up a member by exact name.
    ///
    /// Returns the whole stored document. With duplicate names, the store's
    /// first match is returned and treated as authoritative.
    pub async fn find_by_name(&self, name: Option<&str>) -> Result<MemberRecord, MemberError> {
        let name = present(name).ok_or(MemberError::MissingName)?;

        let doc = self.lookup(name).await?.ok_or(MemberError::NotFound)?;
        Ok(doc.into())
    }

    /// Merge-patch `updates` onto the member with the given name.
    ///
    /// Only a supplied `email` is validated; any other field — `name` and
    /// `created_at` included — is written through without the checks that
    /// apply at registration.
    pub async fn update_by_name(
        &self,
        name: Option<&str>,
        updates: Option<FieldMap>,
    ) -> Result<Confirmation, MemberError> {
        let name = present(name).ok_or(MemberError::MissingParameters)?;
        let updates = updates
            .filter(|map| !map.is_empty())
            .ok_or(MemberError::MissingParameters)?;

        if let Some(email) = updates.get(EMAIL_FIELD) {
            if !email.as_str().is_some_and(validate::has_valid_email_format) {
                return Err(MemberError::InvalidEmailShape);
            }
        }

        let doc = self.lookup(name).await?.ok_or(MemberError::NotFound)?;

        self.store.update_by_id(doc.id, &updates).await.map_err(|e| {
            error!(id = %doc.id, error = %e, "member update failed");
            e
        })?;

        info!(id = %doc.id, name, "member updated");
        Ok(Confirmation::new(UPDATED_MESSAGE))
    }

    /// Remove the member with the given name, once old enough.
    ///
    /// The age gate refuses removal until one minute after registration; a
    /// refused record is left untouched. The gate reads `created_at` from
    /// the looked-up document, so clock skew between insert and this read is
    /// assumed away (single logical clock).
    pub async fn remove_by_name(&self, name: Option<&str>) -> Result<Confirmation, MemberError> {
        let name = present(name).ok_or(MemberError::MissingName)?;

        let doc = self.lookup(name).await?.ok_or(MemberError::NotFound)?;

        let created_at = created_at(&doc)?;
        if !validate::min_age_elapsed(created_at, MIN_AGE_BEFORE_REMOVE_MS, Utc::now()) {
            return Err(MemberError::TooSoon);
        }

        self.store.delete_by_id(doc.id).await.map_err(|e| {
            error!(id = %doc.id, error = %e, "member delete failed");
            e
        })?;

        info!(id = %doc.id, name, "member removed");
        Ok(Confirmation::new(REMOVED_MESSAGE))
    }

    async fn lookup(&self, name: &str) -> Result<Option<StoredDocument>, MemberError> {
        let matches = self
            .store
            .query_equal(NAME_FIELD, name, 1)
            .await
            .map_err(|e| {
                error!(name, error = %e, "member lookup failed");
                e
            })?;

        Ok(matches.into_iter().next())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn created_at(doc: &StoredDocument) -> Result<DateTime<Utc>, MemberError> {
    doc.fields
        .get(CREATED_AT_FIELD)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or(MemberError::CorruptRecord(doc.id))
}
