//! # scvs-engine — Issuance and Verification Engines
//!
//! The operational core of the SCVS Stack. Issuance canonicalizes a claim
//! set, computes its SHA-256 digest and RSA-SHA256 signature, and persists
//! the certificate; verification recomputes both from the stored record and
//! folds in the status lifecycle and the issuer's accreditation.
//!
//! ## Architecture
//!
//! The engines depend on storage and audit *ports* ([`ports`]), not on a
//! backend. [`memory`] provides `parking_lot`-backed adapters for tests and
//! single-process deployments. Verdicts are cached per certificate number
//! with a short TTL ([`cache`]), with a single-flight group collapsing
//! concurrent recomputations.

pub mod cache;
pub mod config;
pub mod error;
pub mod issue;
pub mod memory;
pub mod ports;
pub mod verify;

pub use cache::{FlightGroup, MemoryVerdictCache, VerdictCache};
pub use config::{EngineConfig, DEFAULT_VERDICT_TTL};
pub use error::EngineError;
pub use issue::{AssetBundle, IssuanceEngine, IssueRequest};
pub use memory::{
    MemoryAuditLog, MemoryBlobStore, MemoryCertificateStore, MemoryInstitutionStore,
};
pub use ports::{
    AuditAction, AuditEvent, AuditSink, BlobStore, CertificateStore, InstitutionStore, StoreError,
};
pub use verify::{judge, Verdict, VerdictReason, VerificationEngine};
