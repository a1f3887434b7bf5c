//! # Certificate Record and Status Lifecycle
//!
//! The stored certificate: the four attested claim fields plus the
//! integrity columns (`hash`, `signature`) computed at issuance, the status
//! machine, and the asset URLs attached after rendering.

use serde::{Deserialize, Serialize};

use scvs_core::{
    CertificateId, CertificateNumber, ClaimSet, InstitutionId, Metadata, StateError, StudentId,
    Timestamp,
};

/// The lifecycle status of a certificate.
///
/// Serialized in SCREAMING_SNAKE_CASE, matching the stored and wire
/// representation (`"VALID"`, `"REVOKED"`, `"EXPIRED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Issued and not revoked.
    Valid,
    /// Permanently revoked. Terminal state.
    Revoked,
    /// Reserved for a future expiry policy. Terminal state; nothing
    /// currently produces it.
    Expired,
}

impl CertificateStatus {
    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Revoked => "REVOKED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored certificate record.
///
/// The `hash` and `signature` columns are computed once at issuance from the
/// canonical claim bytes and never recomputed on mutation: they are the
/// commitment verification checks the stored claims against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Internal identifier.
    pub id: CertificateId,
    /// Public certificate number, unique system-wide.
    pub certificate_number: CertificateNumber,
    /// The issuing institution.
    pub institution_id: InstitutionId,
    /// The student the certificate attests.
    pub student_id: StudentId,
    /// Insertion-ordered claim metadata.
    pub metadata: Metadata,
    /// SHA-256 of the canonical claim bytes, 64 lowercase hex characters.
    pub hash: String,
    /// RSA-SHA256 signature over the same bytes, base64.
    pub signature: String,
    /// Current lifecycle status.
    pub status: CertificateStatus,
    /// Issuance time (UTC, second precision).
    pub issued_at: Timestamp,
    /// Revocation time, if revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
    /// URL of the rendered QR asset, once attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    /// URL of the rendered PDF asset, once attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl Certificate {
    /// Borrow the four attested fields as a claim set.
    ///
    /// Verification recomputes canonical bytes from exactly this view, so a
    /// stored record and the original issue request canonicalize
    /// identically.
    pub fn claims(&self) -> ClaimSet<'_> {
        ClaimSet::new(
            &self.institution_id,
            &self.student_id,
            &self.certificate_number,
            &self.metadata,
        )
    }

    /// Whether the certificate is currently in the `Valid` status.
    pub fn is_valid(&self) -> bool {
        self.status == CertificateStatus::Valid
    }

    /// Revoke the certificate at the given time.
    ///
    /// Returns `Ok(true)` if the status changed, `Ok(false)` if the
    /// certificate was already revoked (idempotent no-op). The caller uses
    /// the flag to decide whether to record an audit event.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidTransition` for statuses with no
    /// revocation path.
    pub fn revoke(&mut self, at: Timestamp) -> Result<bool, StateError> {
        match self.status {
            CertificateStatus::Valid => {
                self.status = CertificateStatus::Revoked;
                self.revoked_at = Some(at);
                Ok(true)
            }
            CertificateStatus::Revoked => Ok(false),
            CertificateStatus::Expired => Err(StateError::InvalidTransition {
                from: self.status.as_str().to_owned(),
                to: CertificateStatus::Revoked.as_str().to_owned(),
                reason: "expired certificates cannot be revoked".to_owned(),
            }),
        }
    }
}
