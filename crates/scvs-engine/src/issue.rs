//! # Issuance Engine
//!
//! Issues certificates: canonicalizes the claim set, computes the SHA-256
//! digest and RSA signature, persists the record with number uniqueness
//! enforced, records the audit event, and attaches rendered assets.
//!
//! Issuance is the only place digest and signature are computed for a
//! certificate. They are stored verbatim; verification recomputes from the
//! stored claims and compares.

use std::sync::Arc;

use scvs_core::{
    CanonicalBytes, CertificateId, CertificateNumber, ClaimSet, InstitutionId, Metadata,
    StudentId, Timestamp, sha256_hex,
};
use scvs_crypto::KeyMaterial;
use scvs_state::{Certificate, CertificateStatus};

use crate::cache::VerdictCache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::ports::{
    AuditAction, AuditEvent, AuditSink, BlobStore, CertificateStore, InstitutionStore, StoreError,
};

/// A request to issue one certificate.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    /// The issuing institution. Must be approved.
    pub institution_id: InstitutionId,
    /// The student the certificate attests.
    pub student_id: StudentId,
    /// The public certificate number. Unique system-wide.
    pub certificate_number: CertificateNumber,
    /// Claim metadata, insertion order preserved into the commitment.
    pub metadata: Metadata,
}

/// Rendered binary assets to attach at issuance.
///
/// Rendering is the caller's concern; the engine only stores the payloads
/// and records their URLs. Each payload is independently optional; only
/// the supplied ones are uploaded and recorded. The QR payload is expected
/// to encode [`IssuanceEngine::verification_url`] for the certificate's
/// number.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    /// QR code, SVG.
    pub qr_svg: Option<Vec<u8>>,
    /// Printable certificate, PDF.
    pub pdf: Option<Vec<u8>>,
}

/// The issuance engine.
pub struct IssuanceEngine {
    certificates: Arc<dyn CertificateStore>,
    institutions: Arc<dyn InstitutionStore>,
    blobs: Arc<dyn BlobStore>,
    audit: Arc<dyn AuditSink>,
    cache: Arc<dyn VerdictCache>,
    keys: Arc<KeyMaterial>,
    config: EngineConfig,
}

impl IssuanceEngine {
    /// Assemble an engine from its dependencies.
    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        institutions: Arc<dyn InstitutionStore>,
        blobs: Arc<dyn BlobStore>,
        audit: Arc<dyn AuditSink>,
        cache: Arc<dyn VerdictCache>,
        keys: Arc<KeyMaterial>,
        config: EngineConfig,
    ) -> Self {
        Self {
            certificates,
            institutions,
            blobs,
            audit,
            cache,
            keys,
            config,
        }
    }

    /// The public verification URL for a certificate number, for encoding
    /// into the QR asset.
    pub fn verification_url(&self, number: &CertificateNumber) -> String {
        self.config.verification_url(number)
    }

    /// Issue a certificate.
    ///
    /// The record is persisted before assets upload, so an asset failure
    /// yields `AssetIncomplete` with the certificate already issued and
    /// verifiable.
    ///
    /// # Errors
    ///
    /// - `Validation` if the institution does not exist.
    /// - `Policy` if the institution is not approved.
    /// - `Duplicate` if the certificate number is already taken.
    /// - `AssetIncomplete` if the certificate was persisted but an asset
    ///   upload or the URL update failed.
    pub async fn issue(
        &self,
        request: IssueRequest,
        assets: Option<AssetBundle>,
        actor: Option<&str>,
    ) -> Result<Certificate, EngineError> {
        let institution = self
            .institutions
            .find_by_id(&request.institution_id)
            .await?
            .ok_or_else(|| EngineError::Validation("institution not found".to_owned()))?;
        if !institution.is_approved() {
            return Err(EngineError::Policy(format!(
                "institution {} is not approved to issue (status {})",
                institution.name, institution.status
            )));
        }

        let claims = ClaimSet::new(
            &request.institution_id,
            &request.student_id,
            &request.certificate_number,
            &request.metadata,
        );
        let canonical = CanonicalBytes::of_claims(&claims)?;
        let hash = sha256_hex(&canonical);
        let signature = self.keys.signing.sign(&canonical)?.to_base64();

        let certificate = Certificate {
            id: CertificateId::new(),
            certificate_number: request.certificate_number,
            institution_id: request.institution_id,
            student_id: request.student_id,
            metadata: request.metadata,
            hash,
            signature,
            status: CertificateStatus::Valid,
            issued_at: Timestamp::now(),
            revoked_at: None,
            qr_url: None,
            pdf_url: None,
        };
        self.certificates.insert(certificate.clone()).await?;

        let event = AuditEvent::certificate(
            AuditAction::CertificateIssue,
            certificate.id,
            actor.map(str::to_owned),
            serde_json::json!({
                "certificateNumber": certificate.certificate_number.as_str(),
                "hash": certificate.hash,
            }),
        );
        if let Err(e) = self.audit.record(event).await {
            tracing::warn!(
                certificate_number = %certificate.certificate_number,
                error = %e,
                "audit record failed"
            );
        }
        tracing::info!(
            certificate_number = %certificate.certificate_number,
            institution = %institution.name,
            "issued certificate"
        );

        match assets {
            Some(bundle) => self.attach_assets(certificate, bundle).await,
            None => Ok(certificate),
        }
    }

    /// Issue a batch of certificates, one result per request.
    ///
    /// Requests are independent: a duplicate number or policy failure in
    /// one slot does not affect its siblings.
    pub async fn bulk_issue(
        &self,
        requests: Vec<IssueRequest>,
        actor: Option<&str>,
    ) -> Vec<Result<Certificate, EngineError>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.issue(request, None, actor).await);
        }
        results
    }

    /// Revoke a certificate.
    ///
    /// Idempotent: revoking an already-revoked certificate returns it
    /// unchanged without a second audit event. A revocation that does
    /// change state invalidates the number's cached verdict immediately.
    pub async fn revoke(
        &self,
        id: &CertificateId,
        actor: Option<&str>,
    ) -> Result<Certificate, EngineError> {
        let mut certificate = self
            .certificates
            .find_by_id(id)
            .await?
            .ok_or_else(|| EngineError::NotFound("certificate not found".to_owned()))?;

        let changed = certificate.revoke(Timestamp::now())?;
        if !changed {
            tracing::debug!(certificate_id = %id, "certificate already revoked");
            return Ok(certificate);
        }

        self.certificates.update(certificate.clone()).await?;
        self.cache
            .invalidate(certificate.certificate_number.as_str());

        let event = AuditEvent::certificate(
            AuditAction::CertificateRevoke,
            certificate.id,
            actor.map(str::to_owned),
            serde_json::json!({
                "certificateNumber": certificate.certificate_number.as_str(),
            }),
        );
        if let Err(e) = self.audit.record(event).await {
            tracing::warn!(certificate_id = %id, error = %e, "audit record failed");
        }
        tracing::info!(
            certificate_number = %certificate.certificate_number,
            "revoked certificate"
        );
        Ok(certificate)
    }

    async fn attach_assets(
        &self,
        certificate: Certificate,
        bundle: AssetBundle,
    ) -> Result<Certificate, EngineError> {
        let id = certificate.id;
        let incomplete = |e: StoreError| EngineError::AssetIncomplete {
            certificate_id: id,
            detail: e.to_string(),
        };

        let mut qr_url = None;
        if let Some(qr_svg) = bundle.qr_svg {
            let key = format!("certificates/{id}/qr.svg");
            qr_url = Some(
                self.blobs
                    .put(&key, "image/svg+xml", qr_svg)
                    .await
                    .map_err(incomplete)?,
            );
        }
        let mut pdf_url = None;
        if let Some(pdf) = bundle.pdf {
            let key = format!("certificates/{id}/certificate.pdf");
            pdf_url = Some(
                self.blobs
                    .put(&key, "application/pdf", pdf)
                    .await
                    .map_err(incomplete)?,
            );
        }
        if qr_url.is_none() && pdf_url.is_none() {
            return Ok(certificate);
        }

        self.certificates
            .set_asset_urls(&id, qr_url, pdf_url)
            .await
            .map_err(incomplete)
    }
}
