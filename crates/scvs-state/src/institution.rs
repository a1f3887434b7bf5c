//! # Institution Record and Accreditation Status
//!
//! Institutions issue certificates. Only an `Approved` institution may
//! issue, and a certificate from an institution that has since left the
//! `Approved` status fails verification regardless of its cryptographic
//! integrity.

use serde::{Deserialize, Serialize};

use scvs_core::{AccreditationId, InstitutionId, StateError, Timestamp};

/// Accreditation status of an institution.
///
/// Serialized in SCREAMING_SNAKE_CASE (`"PENDING"`, `"APPROVED"`,
/// `"SUSPENDED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionStatus {
    /// Registered, accreditation review not yet complete.
    Pending,
    /// Accredited. The only status permitted to issue.
    Approved,
    /// Accreditation withdrawn. Existing certificates fail verification
    /// while suspended.
    Suspended,
}

impl InstitutionStatus {
    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl std::fmt::Display for InstitutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    /// Internal identifier.
    pub id: InstitutionId,
    /// Display name.
    pub name: String,
    /// External accreditation registry number.
    pub accreditation_id: AccreditationId,
    /// Current accreditation status.
    pub status: InstitutionStatus,
    /// Registration time.
    pub registered_at: Timestamp,
}

impl Institution {
    /// Register a new institution in the `Pending` status.
    pub fn register(name: impl Into<String>, accreditation_id: AccreditationId) -> Self {
        Self {
            id: InstitutionId::new(),
            name: name.into(),
            accreditation_id,
            status: InstitutionStatus::Pending,
            registered_at: Timestamp::now(),
        }
    }

    /// Whether the institution may issue certificates.
    pub fn is_approved(&self) -> bool {
        self.status == InstitutionStatus::Approved
    }

    /// Grant accreditation. Valid from `Pending` (initial approval) or
    /// `Suspended` (reinstatement).
    pub fn approve(&mut self) -> Result<(), StateError> {
        match self.status {
            InstitutionStatus::Pending | InstitutionStatus::Suspended => {
                self.status = InstitutionStatus::Approved;
                Ok(())
            }
            InstitutionStatus::Approved => Err(StateError::InvalidTransition {
                from: self.status.as_str().to_owned(),
                to: InstitutionStatus::Approved.as_str().to_owned(),
                reason: "institution is already approved".to_owned(),
            }),
        }
    }

    /// Withdraw accreditation. Valid only from `Approved`.
    pub fn suspend(&mut self) -> Result<(), StateError> {
        match self.status {
            InstitutionStatus::Approved => {
                self.status = InstitutionStatus::Suspended;
                Ok(())
            }
            _ => Err(StateError::InvalidTransition {
                from: self.status.as_str().to_owned(),
                to: InstitutionStatus::Suspended.as_str().to_owned(),
                reason: "only approved institutions can be suspended".to_owned(),
            }),
        }
    }

    /// The wire projection embedded in verification verdicts.
    pub fn summary(&self) -> InstitutionSummary {
        InstitutionSummary {
            id: self.id,
            name: self.name.clone(),
            accreditation_id: self.accreditation_id.clone(),
            status: self.status,
        }
    }
}

/// The institution fields exposed in a verification verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionSummary {
    /// Internal identifier.
    pub id: InstitutionId,
    /// Display name.
    pub name: String,
    /// External accreditation registry number.
    pub accreditation_id: AccreditationId,
    /// Accreditation status at verification time.
    pub status: InstitutionStatus,
}
