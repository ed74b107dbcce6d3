//! Public API representations of member operation outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::{FieldMap, StoredDocument};

/// Outcome of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredMember {
    /// Store-assigned identifier of the new member
    pub id: Uuid,
    pub message: String,
}

/// A member as returned by lookup: its id plus every stored field, including
/// any added later through merge-patch updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl From<StoredDocument> for MemberRecord {
    fn from(doc: StoredDocument) -> Self {
        Self {
            id: doc.id,
            fields: doc.fields,
        }
    }
}

/// Plain confirmation payload for mutations that return no data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

impl Confirmation {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
