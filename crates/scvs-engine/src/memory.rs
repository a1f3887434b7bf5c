//! # In-Memory Adapters
//!
//! `parking_lot`-backed implementations of the storage and audit ports for
//! tests and single-process deployments. All operations take the lock
//! synchronously; no lock is ever held across an `.await` point.
//! `parking_lot::RwLock` is non-poisonable, so a panicking writer does not
//! permanently corrupt the store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use scvs_core::{CertificateId, CertificateNumber, InstitutionId};
use scvs_state::{Certificate, Institution};

use crate::ports::{
    AuditEvent, AuditSink, BlobStore, CertificateStore, InstitutionStore, StoreError,
};

/// In-memory certificate store with a certificate-number uniqueness index.
#[derive(Debug, Default, Clone)]
pub struct MemoryCertificateStore {
    inner: Arc<RwLock<CertificateMap>>,
}

#[derive(Debug, Default)]
struct CertificateMap {
    by_id: HashMap<CertificateId, Certificate>,
    by_number: HashMap<String, CertificateId>,
}

impl MemoryCertificateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored certificates.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }
}

#[async_trait]
impl CertificateStore for MemoryCertificateStore {
    async fn insert(&self, certificate: Certificate) -> Result<(), StoreError> {
        let number = certificate.certificate_number.as_str().to_owned();
        // Uniqueness check and insert run under one write lock, so two
        // concurrent inserts with the same number resolve to exactly one
        // success.
        let mut map = self.inner.write();
        if map.by_number.contains_key(&number) {
            return Err(StoreError::Duplicate { key: number });
        }
        map.by_number.insert(number, certificate.id);
        map.by_id.insert(certificate.id, certificate);
        Ok(())
    }

    async fn find_by_id(&self, id: &CertificateId) -> Result<Option<Certificate>, StoreError> {
        Ok(self.inner.read().by_id.get(id).cloned())
    }

    async fn find_by_number(
        &self,
        number: &CertificateNumber,
    ) -> Result<Option<Certificate>, StoreError> {
        let map = self.inner.read();
        Ok(map
            .by_number
            .get(number.as_str())
            .and_then(|id| map.by_id.get(id))
            .cloned())
    }

    async fn update(&self, certificate: Certificate) -> Result<(), StoreError> {
        let mut map = self.inner.write();
        if !map.by_id.contains_key(&certificate.id) {
            return Err(StoreError::Backend(format!(
                "certificate {} not found",
                certificate.id
            )));
        }
        map.by_id.insert(certificate.id, certificate);
        Ok(())
    }

    async fn set_asset_urls(
        &self,
        id: &CertificateId,
        qr_url: Option<String>,
        pdf_url: Option<String>,
    ) -> Result<Certificate, StoreError> {
        let mut map = self.inner.write();
        let entry = map
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::Backend(format!("certificate {id} not found")))?;
        if qr_url.is_some() {
            entry.qr_url = qr_url;
        }
        if pdf_url.is_some() {
            entry.pdf_url = pdf_url;
        }
        Ok(entry.clone())
    }
}

/// In-memory institution store.
#[derive(Debug, Default, Clone)]
pub struct MemoryInstitutionStore {
    inner: Arc<RwLock<HashMap<InstitutionId, Institution>>>,
}

impl MemoryInstitutionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstitutionStore for MemoryInstitutionStore {
    async fn find_by_id(&self, id: &InstitutionId) -> Result<Option<Institution>, StoreError> {
        Ok(self.inner.read().get(id).cloned())
    }

    async fn upsert(&self, institution: Institution) -> Result<(), StoreError> {
        self.inner.write().insert(institution.id, institution);
        Ok(())
    }
}

/// In-memory blob store. Objects are addressable as `memory://{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    bucket: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

impl MemoryBlobStore {
    /// Create an empty blob store for the given bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a stored object's content type and bytes.
    pub fn get(&self, key: &str) -> Option<(String, Vec<u8>)> {
        self.objects
            .read()
            .get(key)
            .map(|o| (o.content_type.clone(), o.bytes.clone()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.objects.write().insert(
            key.to_owned(),
            StoredObject {
                content_type: content_type.to_owned(),
                bytes,
            },
        );
        Ok(format!("memory://{}/{}", self.bucket, key))
    }
}

/// In-memory append-only audit log.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditLog {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in append order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn record(&self, event: AuditEvent) -> Result<(), StoreError> {
        self.events.write().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scvs_core::{Metadata, StudentId, Timestamp};
    use scvs_state::CertificateStatus;

    fn certificate(number: &str) -> Certificate {
        Certificate {
            id: CertificateId::new(),
            certificate_number: CertificateNumber::new(number).unwrap(),
            institution_id: InstitutionId::new(),
            student_id: StudentId::new(),
            metadata: Metadata::new(),
            hash: "0".repeat(64),
            signature: "AAAA".to_owned(),
            status: CertificateStatus::Valid,
            issued_at: Timestamp::now(),
            revoked_at: None,
            qr_url: None,
            pdf_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_enforces_number_uniqueness() {
        let store = MemoryCertificateStore::new();
        store.insert(certificate("SCVS-2024-A-1")).await.unwrap();
        let err = store.insert(certificate("SCVS-2024-A-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { key } if key == "SCVS-2024-A-1"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_by_number_and_id() {
        let store = MemoryCertificateStore::new();
        let cert = certificate("SCVS-2024-A-2");
        let id = cert.id;
        store.insert(cert).await.unwrap();

        let number = CertificateNumber::new("SCVS-2024-A-2").unwrap();
        let by_number = store.find_by_number(&number).await.unwrap().unwrap();
        assert_eq!(by_number.id, id);
        assert!(store.find_by_id(&id).await.unwrap().is_some());

        let missing = CertificateNumber::new("SCVS-2024-A-404").unwrap();
        assert!(store.find_by_number(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let store = MemoryCertificateStore::new();
        let mut cert = certificate("SCVS-2024-A-3");
        store.insert(cert.clone()).await.unwrap();
        cert.revoke(Timestamp::now()).unwrap();
        store.update(cert.clone()).await.unwrap();

        let stored = store.find_by_id(&cert.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CertificateStatus::Revoked);
    }

    #[tokio::test]
    async fn test_set_asset_urls_persists_and_overwrites() {
        let store = MemoryCertificateStore::new();
        let cert = certificate("SCVS-2024-A-5");
        let id = cert.id;
        store.insert(cert).await.unwrap();

        let updated = store
            .set_asset_urls(&id, Some("qr-v1".to_owned()), Some("pdf-v1".to_owned()))
            .await
            .unwrap();
        assert_eq!(updated.qr_url.as_deref(), Some("qr-v1"));

        // Retried uploads overwrite.
        let updated = store
            .set_asset_urls(&id, Some("qr-v2".to_owned()), Some("pdf-v2".to_owned()))
            .await
            .unwrap();
        assert_eq!(updated.qr_url.as_deref(), Some("qr-v2"));
        assert_eq!(updated.pdf_url.as_deref(), Some("pdf-v2"));

        // A partial update leaves the other URL in place.
        let updated = store
            .set_asset_urls(&id, Some("qr-v3".to_owned()), None)
            .await
            .unwrap();
        assert_eq!(updated.qr_url.as_deref(), Some("qr-v3"));
        assert_eq!(updated.pdf_url.as_deref(), Some("pdf-v2"));

        let missing = CertificateId::new();
        assert!(store.set_asset_urls(&missing, None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let store = MemoryCertificateStore::new();
        let err = store.update(certificate("SCVS-2024-A-4")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_blob_store_urls_and_content() {
        let blobs = MemoryBlobStore::new("scvs-assets");
        let url = blobs
            .put("certificates/abc/qr.svg", "image/svg+xml", b"<svg/>".to_vec())
            .await
            .unwrap();
        assert_eq!(url, "memory://scvs-assets/certificates/abc/qr.svg");
        let (ct, bytes) = blobs.get("certificates/abc/qr.svg").unwrap();
        assert_eq!(ct, "image/svg+xml");
        assert_eq!(bytes, b"<svg/>");
    }

    #[tokio::test]
    async fn test_audit_log_appends_in_order() {
        use crate::ports::AuditAction;
        let log = MemoryAuditLog::new();
        let id = CertificateId::new();
        log.record(AuditEvent::certificate(
            AuditAction::CertificateIssue,
            id,
            Some("registrar@example.edu".to_owned()),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
        log.record(AuditEvent::certificate(
            AuditAction::CertificateRevoke,
            id,
            None,
            serde_json::json!({}),
        ))
        .await
        .unwrap();

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::CertificateIssue);
        assert_eq!(events[0].actor_id.as_deref(), Some("registrar@example.edu"));
        assert_eq!(events[1].action, AuditAction::CertificateRevoke);
        assert!(events[1].actor_id.is_none());
    }
}
