//! # scvs-core — Foundational Types for the SCVS Stack
//!
//! This crate is the bedrock of the SCVS (Secure Certificate Verification
//! System) Stack. It defines the type-system primitives that make the
//! certificate integrity contract enforceable at compile time. Every other
//! crate in the workspace depends on `scvs-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CertificateId`,
//!    `InstitutionId`, `StudentId`, `CertificateNumber`, `AccreditationId` —
//!    all newtypes with validated constructors. No bare strings or UUIDs for
//!    identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest and signature computation
//!    flows through `CanonicalBytes::of_claims()`. No raw
//!    `serde_json::to_vec()` for digests. Ever. This prevents the
//!    canonicalization split defect class by construction.
//!
//! 3. **Order is part of the commitment.** The claim-set fields serialize in
//!    a fixed order and metadata keys serialize in insertion order. Changing
//!    either would invalidate every previously issued signature, so the type
//!    system funnels all serialization through one path.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision.
//!
//! 5. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that all digest paths flow through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scvs-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::{CanonicalBytes, ClaimSet};
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, IdentityError, StateError};
pub use identity::{AccreditationId, CertificateId, CertificateNumber, InstitutionId, StudentId};
pub use metadata::{Metadata, MetadataValue};
pub use temporal::Timestamp;
