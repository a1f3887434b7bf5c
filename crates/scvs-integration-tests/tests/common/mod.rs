//! Shared harness: both engines wired to in-memory adapters and the fixed
//! test key pair, with an approved institution and a registered student.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use scvs_core::{AccreditationId, CertificateNumber, Metadata};
use scvs_crypto::{fixtures, KeyMaterial};
use scvs_engine::{
    BlobStore, EngineConfig, IssuanceEngine, IssueRequest, MemoryAuditLog, MemoryBlobStore,
    MemoryCertificateStore, MemoryInstitutionStore, MemoryVerdictCache, VerificationEngine,
};
use scvs_state::{Institution, Student};

pub struct Harness {
    pub issuance: Arc<IssuanceEngine>,
    pub verification: Arc<VerificationEngine>,
    pub certificates: MemoryCertificateStore,
    pub institutions: MemoryInstitutionStore,
    pub blobs: MemoryBlobStore,
    pub audit: MemoryAuditLog,
    pub cache: Arc<MemoryVerdictCache>,
    pub institution: Institution,
    pub student: Student,
}

/// Build a harness with the default 60-second verdict TTL.
pub async fn harness() -> Harness {
    harness_with_ttl(Duration::from_secs(60)).await
}

/// Build a harness with an explicit verdict TTL.
pub async fn harness_with_ttl(ttl: Duration) -> Harness {
    let config = EngineConfig::default();
    let certificates = MemoryCertificateStore::new();
    let institutions = MemoryInstitutionStore::new();
    let blobs = MemoryBlobStore::new(config.asset_bucket.clone());
    let audit = MemoryAuditLog::new();
    let cache = Arc::new(MemoryVerdictCache::new(ttl));
    let keys = Arc::new(KeyMaterial::from_pair(fixtures::primary()));

    let mut institution = Institution::register(
        "University of Testing",
        AccreditationId::new("ACC-2024-0042").unwrap(),
    );
    institution.approve().unwrap();
    use scvs_engine::InstitutionStore as _;
    institutions.upsert(institution.clone()).await.unwrap();

    let student = Student::register("Ada Lovelace", "ada@example.edu");

    let issuance = Arc::new(IssuanceEngine::new(
        Arc::new(certificates.clone()),
        Arc::new(institutions.clone()),
        Arc::new(blobs.clone()),
        Arc::new(audit.clone()),
        cache.clone(),
        keys.clone(),
        config,
    ));
    let verification = Arc::new(VerificationEngine::new(
        Arc::new(certificates.clone()),
        Arc::new(institutions.clone()),
        Arc::new(audit.clone()),
        cache.clone(),
        keys.verifying.clone(),
    ));

    Harness {
        issuance,
        verification,
        certificates,
        institutions,
        blobs,
        audit,
        cache,
        institution,
        student,
    }
}

impl Harness {
    /// An issuance engine sharing this harness's stores, cache, and key
    /// pair but writing assets through the given blob store.
    pub fn issuance_with_blobs(&self, blobs: Arc<dyn BlobStore>) -> IssuanceEngine {
        IssuanceEngine::new(
            Arc::new(self.certificates.clone()),
            Arc::new(self.institutions.clone()),
            blobs,
            Arc::new(self.audit.clone()),
            self.cache.clone(),
            Arc::new(KeyMaterial::from_pair(fixtures::primary())),
            EngineConfig::default(),
        )
    }

    /// An issue request for this harness's institution and student.
    pub fn request(&self, number: &str) -> IssueRequest {
        IssueRequest {
            institution_id: self.institution.id,
            student_id: self.student.id,
            certificate_number: CertificateNumber::new(number).unwrap(),
            metadata: Metadata::from_json(serde_json::json!({
                "degree": "BSc Computer Science",
                "year": 2024,
                "honors": true,
                "gpa": "3.8",
            }))
            .unwrap(),
        }
    }
}

/// Parse a certificate number, panicking on invalid input.
pub fn number(s: &str) -> CertificateNumber {
    CertificateNumber::new(s).unwrap()
}
