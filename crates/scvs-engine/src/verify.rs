//! # Verification Engine
//!
//! Answers "is this certificate genuine and current?" for a public
//! certificate number. A verdict recomputes the canonical claim bytes from
//! the stored record, checks the stored digest and signature against them,
//! and folds in the status machine and the issuer's accreditation.
//!
//! ## Verdicts vs Errors
//!
//! A tampered or revoked certificate is a *verdict* with `valid: false`.
//! Errors are reserved for questions the engine cannot answer: unknown
//! numbers, institutions the registry no longer vouches for, unusable key
//! material, backend failures.

use std::sync::Arc;

use serde::Serialize;

use scvs_core::{
    CanonicalBytes, CertificateId, CertificateNumber, Metadata, Timestamp, sha256_hex,
};
use scvs_crypto::{RsaSignature, RsaVerifyingKey};
use scvs_state::{Certificate, CertificateStatus, Institution, InstitutionSummary};

use crate::cache::{FlightGroup, VerdictCache};
use crate::error::EngineError;
use crate::ports::{AuditAction, AuditEvent, AuditSink, CertificateStore, InstitutionStore};

/// Why a verdict came out the way it did.
///
/// Internal to the engine and the audit trail; the wire verdict carries
/// only the projected `valid` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictReason {
    /// Digest and signature match, status is current.
    ValidMatch,
    /// The stored digest does not match the recomputed claim bytes.
    HashMismatch,
    /// The digest matches but the signature does not verify.
    SignatureMismatch,
    /// Integrity intact, but the certificate was revoked.
    Revoked,
    /// Integrity intact, but the certificate has expired.
    Expired,
}

impl VerdictReason {
    /// Whether this reason projects to `valid: true`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::ValidMatch)
    }

    /// The audit trail name of this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidMatch => "VALID_MATCH",
            Self::HashMismatch => "HASH_MISMATCH",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::Revoked => "REVOKED",
            Self::Expired => "EXPIRED",
        }
    }
}

/// Combine the three verdict conditions.
///
/// Integrity failures outrank lifecycle state: a revoked certificate whose
/// record was also tampered with reports the tampering.
pub fn judge(status: CertificateStatus, hash_ok: bool, signature_ok: bool) -> VerdictReason {
    if !hash_ok {
        return VerdictReason::HashMismatch;
    }
    if !signature_ok {
        return VerdictReason::SignatureMismatch;
    }
    match status {
        CertificateStatus::Valid => VerdictReason::ValidMatch,
        CertificateStatus::Revoked => VerdictReason::Revoked,
        CertificateStatus::Expired => VerdictReason::Expired,
    }
}

/// The public verification result.
///
/// Field names and order are the wire contract; do not reorder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Internal certificate identifier.
    pub certificate_id: CertificateId,
    /// The public certificate number that was asked about.
    pub certificate_number: CertificateNumber,
    /// Current lifecycle status.
    pub status: CertificateStatus,
    /// The projected verdict: integrity intact and status current.
    pub valid: bool,
    /// The attested claim metadata, insertion order preserved.
    pub metadata: Metadata,
    /// Issuance time.
    pub issued_at: Timestamp,
    /// The issuing institution at verification time.
    pub institution: InstitutionSummary,
}

/// The verification engine.
pub struct VerificationEngine {
    certificates: Arc<dyn CertificateStore>,
    institutions: Arc<dyn InstitutionStore>,
    audit: Arc<dyn AuditSink>,
    cache: Arc<dyn VerdictCache>,
    flights: FlightGroup,
    verifying: RsaVerifyingKey,
}

impl VerificationEngine {
    /// Assemble an engine from its dependencies. The verifying key is
    /// injected explicitly so key rotation never touches call sites.
    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        institutions: Arc<dyn InstitutionStore>,
        audit: Arc<dyn AuditSink>,
        cache: Arc<dyn VerdictCache>,
        verifying: RsaVerifyingKey,
    ) -> Self {
        Self {
            certificates,
            institutions,
            audit,
            cache,
            flights: FlightGroup::new(),
            verifying,
        }
    }

    /// Verify the certificate with the given public number.
    ///
    /// Serves a cached verdict when one is live; otherwise recomputes under
    /// the number's flight lock, so concurrent misses for a hot number
    /// resolve to a single recomputation and a single audit event.
    ///
    /// # Errors
    ///
    /// - `NotFound("certificate not found")` for an unknown number.
    /// - `NotFound("certificate invalid")` when the issuing institution is
    ///   missing or not currently approved.
    /// - `Crypto` for unusable signature material, `Store` for backend
    ///   failures.
    pub async fn verify(&self, number: &CertificateNumber) -> Result<Verdict, EngineError> {
        if let Some(verdict) = self.cache.get(number.as_str()) {
            tracing::debug!(certificate_number = %number, "verdict served from cache");
            return Ok(verdict);
        }

        let _flight = self.flights.acquire(number.as_str()).await;

        // Another flight holder may have filled the cache while we waited.
        if let Some(verdict) = self.cache.get(number.as_str()) {
            tracing::debug!(certificate_number = %number, "verdict served from cache");
            return Ok(verdict);
        }

        let certificate = self
            .certificates
            .find_by_number(number)
            .await?
            .ok_or_else(|| EngineError::NotFound("certificate not found".to_owned()))?;

        let institution = self.institution_gate(&certificate).await?;
        let (verdict, reason) = self.recompute(&certificate, &institution)?;

        self.cache.set(number.as_str(), verdict.clone());

        let event = AuditEvent::certificate(
            AuditAction::CertificateVerify,
            certificate.id,
            None,
            serde_json::json!({
                "certificateNumber": number.as_str(),
                "valid": verdict.valid,
                "reason": reason.as_str(),
            }),
        );
        if let Err(e) = self.audit.record(event).await {
            tracing::warn!(certificate_number = %number, error = %e, "audit record failed");
        }

        tracing::info!(
            certificate_number = %number,
            valid = verdict.valid,
            reason = reason.as_str(),
            "verified certificate"
        );
        Ok(verdict)
    }

    /// A certificate is only answerable while its issuer is vouched for.
    /// Anything else is withheld as "certificate invalid", deliberately not
    /// distinguishing a missing institution from a suspended one.
    async fn institution_gate(
        &self,
        certificate: &Certificate,
    ) -> Result<Institution, EngineError> {
        let institution = self
            .institutions
            .find_by_id(&certificate.institution_id)
            .await?
            .filter(|i| i.is_approved())
            .ok_or_else(|| EngineError::NotFound("certificate invalid".to_owned()))?;
        Ok(institution)
    }

    fn recompute(
        &self,
        certificate: &Certificate,
        institution: &Institution,
    ) -> Result<(Verdict, VerdictReason), EngineError> {
        let canonical = CanonicalBytes::of_claims(&certificate.claims())?;
        let hash_ok = sha256_hex(&canonical) == certificate.hash;

        // Malformed stored signature bytes are a hard failure, distinct
        // from a well-formed signature that does not match.
        let signature = RsaSignature::from_base64(&certificate.signature)?;
        let signature_ok = self.verifying.verify(&canonical, &signature)?;

        let reason = judge(certificate.status, hash_ok, signature_ok);
        let verdict = Verdict {
            certificate_id: certificate.id,
            certificate_number: certificate.certificate_number.clone(),
            status: certificate.status,
            valid: reason.is_valid(),
            metadata: certificate.metadata.clone(),
            issued_at: certificate.issued_at,
            institution: institution.summary(),
        };
        Ok((verdict, reason))
    }
}
