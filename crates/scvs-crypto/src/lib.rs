//! # scvs-crypto — Signature Engine for the SCVS Stack
//!
//! RSA-SHA256 (PKCS#1 v1.5) signing and verification over canonical
//! claim-set bytes, plus PEM key material loading.
//!
//! ## Security Invariants
//!
//! - Signing input MUST be `&CanonicalBytes` — you cannot sign raw bytes.
//!   This enforces that all signed data has been canonicalized through the
//!   claim-set pipeline, preventing the canonicalization split defect.
//! - Private keys are never serialized into logs, responses, or artifacts.
//!   [`RsaKeyPair`] does not implement `Serialize`.
//! - A well-formed signature that does not match is `Ok(false)`; malformed
//!   key or signature material is an `Err(CryptoError)`. The two outcomes
//!   never collapse into one another.
//!
//! ## Key Material
//!
//! Keys load once from operator-provided PEM files ([`KeyMaterial::load`])
//! and are injected by reference into the engines. There is no ambient
//! global signing identity, and the verify path takes an explicit
//! [`RsaVerifyingKey`] so future key rotation never touches call sites.

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod material;
pub mod rsa;

pub use material::KeyMaterial;
pub use rsa::{RsaKeyPair, RsaSignature, RsaVerifyingKey};
