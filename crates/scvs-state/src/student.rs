//! Student records. Certificates reference students by id; the claim set
//! commits to the id, not the mutable profile fields.

use serde::{Deserialize, Serialize};

use scvs_core::{StudentId, Timestamp};

/// A registered student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Internal identifier. This is the field the claim set commits to.
    pub id: StudentId,
    /// Full legal name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Registration time.
    pub registered_at: Timestamp,
}

impl Student {
    /// Register a new student.
    pub fn register(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: StudentId::new(),
            full_name: full_name.into(),
            email: email.into(),
            registered_at: Timestamp::now(),
        }
    }
}
