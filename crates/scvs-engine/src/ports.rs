//! # Storage and Audit Ports
//!
//! The engines depend on these traits, not on a concrete backend. The
//! in-memory adapters in [`crate::memory`] implement them for tests and
//! single-process deployments; a database-backed implementation slots in
//! without touching engine code.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scvs_core::{CertificateId, CertificateNumber, InstitutionId, Timestamp};
use scvs_state::{Certificate, Institution};

/// Backend failure from a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate key: {key}")]
    Duplicate {
        /// The conflicting key value.
        key: String,
    },

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Certificate persistence.
///
/// `insert` enforces certificate-number uniqueness atomically: two
/// concurrent inserts with the same number must resolve to exactly one
/// success and one `StoreError::Duplicate`.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Persist a new certificate. Fails with `Duplicate` if the certificate
    /// number is already taken.
    async fn insert(&self, certificate: Certificate) -> Result<(), StoreError>;

    /// Fetch by internal id.
    async fn find_by_id(&self, id: &CertificateId) -> Result<Option<Certificate>, StoreError>;

    /// Fetch by public certificate number.
    async fn find_by_number(
        &self,
        number: &CertificateNumber,
    ) -> Result<Option<Certificate>, StoreError>;

    /// Replace the stored record with the same id. Last write wins.
    async fn update(&self, certificate: Certificate) -> Result<(), StoreError>;

    /// Record rendered asset URLs on an existing certificate. `None` leaves
    /// the corresponding URL untouched; overwriting a previous URL is
    /// permitted (idempotent retries).
    async fn set_asset_urls(
        &self,
        id: &CertificateId,
        qr_url: Option<String>,
        pdf_url: Option<String>,
    ) -> Result<Certificate, StoreError>;
}

/// Institution lookup and persistence.
#[async_trait]
pub trait InstitutionStore: Send + Sync {
    /// Fetch by id.
    async fn find_by_id(&self, id: &InstitutionId) -> Result<Option<Institution>, StoreError>;

    /// Insert or replace.
    async fn upsert(&self, institution: Institution) -> Result<(), StoreError>;
}

/// Binary asset storage for rendered certificate artifacts.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object under `key` with the given content type, returning
    /// its public URL.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

/// An audit trail action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A certificate was issued.
    CertificateIssue,
    /// A certificate was revoked.
    CertificateRevoke,
    /// A certificate was verified (recomputed, not served from cache).
    CertificateVerify,
}

impl AuditAction {
    /// The stored action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CertificateIssue => "CERTIFICATE_ISSUE",
            Self::CertificateRevoke => "CERTIFICATE_REVOKE",
            Self::CertificateVerify => "CERTIFICATE_VERIFY",
        }
    }
}

/// An audit trail entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// What happened.
    pub action: AuditAction,
    /// The entity kind. Always `"Certificate"` for engine events.
    pub entity_type: &'static str,
    /// The affected certificate.
    pub entity_id: CertificateId,
    /// Who performed the operation, when known. Verification is public and
    /// usually anonymous.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// Structured context (certificate number, verdict outcome).
    pub detail: serde_json::Value,
    /// When the event was recorded.
    pub at: Timestamp,
}

impl AuditEvent {
    /// Build a certificate audit event stamped with the current time.
    pub fn certificate(
        action: AuditAction,
        entity_id: CertificateId,
        actor_id: Option<String>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            action,
            entity_type: "Certificate",
            entity_id,
            actor_id,
            detail,
            at: Timestamp::now(),
        }
    }
}

/// Append-only audit trail.
///
/// Audit failures never fail the operation that produced them: callers log
/// and continue. The trail is best-effort by contract.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an event.
    async fn record(&self, event: AuditEvent) -> Result<(), StoreError>;
}
