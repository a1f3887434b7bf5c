//! # Content Digest — Claim-Set Integrity Anchors
//!
//! Defines [`ContentDigest`] and the SHA-256 digest computation over
//! canonical claim-set bytes. The stored `hash` column of every certificate
//! is the lowercase hex rendering of this digest, computed exactly once at
//! issuance.
//!
//! ## Security Invariant
//!
//! [`sha256_digest()`] accepts only `&CanonicalBytes`, not raw `&[u8]`. This
//! compile-time constraint prevents any code path from committing to a
//! digest over non-canonical bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest over canonical claim-set bytes.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Render the digest as a 64-character lowercase hex string — the wire
    /// and storage format for certificate hashes.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The raw 32 digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute a SHA-256 digest from canonical bytes.
///
/// Pure function, stable across platforms and architectures. The signature
/// enforces that only canonicalized claim sets can be hashed.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

/// Compute a SHA-256 lowercase hex string from canonical bytes.
///
/// Convenience wrapper around [`sha256_digest()`] for the issuance and
/// verification paths, which store and compare hex strings.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}
