use thiserror::Error;
use uuid::Uuid;

use crate::kernel::StoreError;

/// Every way a member operation can fail.
///
/// This enum is transport-agnostic; the HTTP status mapping lives in the
/// route layer. Message text is illustrative, not a contract.
#[derive(Debug, Error)]
pub enum MemberError {
    #[error("both a name and an email are required")]
    MissingFields,

    #[error("a member name is required")]
    MissingName,

    #[error("a member name and fields to update are required")]
    MissingParameters,

    #[error("names may not contain Hangul characters")]
    DisallowedScript,

    #[error("invalid email format (an @ is required)")]
    InvalidEmailShape,

    #[error("no member found with that name")]
    NotFound,

    #[error("members can only be removed one minute after registration")]
    TooSoon,

    /// A stored document whose `created_at` is missing or unreadable, which
    /// a merge-patch update can produce.
    #[error("member document {0} has no readable created_at timestamp")]
    CorruptRecord(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
