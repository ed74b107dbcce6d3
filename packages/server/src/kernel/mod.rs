//! Kernel module - storage infrastructure behind the member workflow.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryMemberStore;
pub use postgres::PgMemberStore;
pub use store::{FieldMap, MemberStore, StoreError, StoredDocument, CREATED_AT_FIELD};
