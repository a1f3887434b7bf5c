//! # Canonical Serialization — Claim-Set Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for the
//! bytes used in digest and signature computation across the entire SCVS
//! Stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through [`CanonicalBytes::of_claims()`], which serializes
//! the four claim-set fields in the fixed order
//! `{institutionId, studentId, certificateNumber, metadata}` as compact
//! JSON. Any function requiring canonical bytes for digest or signature
//! computation must accept `&CanonicalBytes`, so there is no code path that
//! hashes or signs a differently serialized claim set.
//!
//! ## The Commitment Is Frozen
//!
//! - Field order is the declaration order above. Reordering fields changes
//!   the bytes and invalidates every previously issued signature.
//! - Metadata keys serialize **in insertion order** — no key sorting. The
//!   reference system signed the metadata object as encountered, making key
//!   order part of the cryptographic commitment. A sorted canonical form
//!   would be a breaking, versioned change, never a silent one.
//! - Output is compact JSON (no whitespace separators), UTF-8, with
//!   non-ASCII characters unescaped.

use serde::Serialize;

use crate::error::CanonicalizationError;
use crate::identity::{CertificateNumber, InstitutionId, StudentId};
use crate::metadata::Metadata;

/// The four fields that constitute what is cryptographically attested.
///
/// Borrowed view over certificate data: the same struct serves issuance
/// (fields from the issue request) and verification (fields from the stored
/// record), guaranteeing both sides canonicalize identically.
///
/// The serde field order below IS the canonical field order. Do not reorder.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSet<'a> {
    /// The issuing institution.
    #[serde(rename = "institutionId")]
    pub institution_id: &'a InstitutionId,
    /// The student the certificate is issued to.
    #[serde(rename = "studentId")]
    pub student_id: &'a StudentId,
    /// The public certificate number.
    #[serde(rename = "certificateNumber")]
    pub certificate_number: &'a CertificateNumber,
    /// The insertion-ordered metadata mapping.
    pub metadata: &'a Metadata,
}

impl<'a> ClaimSet<'a> {
    /// Assemble a claim set from its four fields.
    pub fn new(
        institution_id: &'a InstitutionId,
        student_id: &'a StudentId,
        certificate_number: &'a CertificateNumber,
        metadata: &'a Metadata,
    ) -> Self {
        Self {
            institution_id,
            student_id,
            certificate_number,
            metadata,
        }
    }
}

/// Bytes produced exclusively by canonical claim-set serialization.
///
/// # Invariants
///
/// - The only constructor is [`CanonicalBytes::of_claims()`].
/// - Field order is fixed; metadata key order is insertion order.
/// - The bytes are compact JSON, valid UTF-8.
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from a claim set.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All digest and
    /// signature computation in the entire stack must flow through this
    /// constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if JSON
    /// serialization fails.
    pub fn of_claims(claims: &ClaimSet<'_>) -> Result<Self, CanonicalizationError> {
        let bytes = serde_json::to_vec(claims)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest or signature computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::metadata::MetadataValue;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    /// Strategy for generating metadata values within the restricted domain
    /// (no floats, by construction).
    fn metadata_value() -> impl Strategy<Value = MetadataValue> {
        let leaf = prop_oneof![
            Just(MetadataValue::Null),
            any::<bool>().prop_map(MetadataValue::Bool),
            any::<i64>().prop_map(MetadataValue::Integer),
            "[a-zA-Z0-9_ ]{0,40}".prop_map(MetadataValue::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(MetadataValue::Array),
                prop::collection::vec(("[a-z]{1,8}", inner), 0..6).prop_map(|pairs| {
                    let map: IndexMap<String, MetadataValue> = pairs.into_iter().collect();
                    MetadataValue::Map(map)
                }),
            ]
        })
    }

    fn metadata() -> impl Strategy<Value = Metadata> {
        prop::collection::vec(("[a-z]{1,10}", metadata_value()), 0..8).prop_map(|pairs| {
            let map: IndexMap<String, MetadataValue> = pairs.into_iter().collect();
            Metadata::from(map)
        })
    }

    proptest! {
        /// Canonicalization never fails for float-free metadata.
        #[test]
        fn canonicalization_never_fails(md in metadata()) {
            let inst = InstitutionId::new();
            let student = StudentId::new();
            let number = CertificateNumber::new("SCVS-2024-TEST-000001").unwrap();
            let result =
                CanonicalBytes::of_claims(&ClaimSet::new(&inst, &student, &number, &md));
            prop_assert!(result.is_ok());
        }

        /// Canonicalizing twice yields identical bytes.
        #[test]
        fn canonicalization_deterministic(md in metadata()) {
            let inst = InstitutionId::new();
            let student = StudentId::new();
            let number = CertificateNumber::new("SCVS-2024-TEST-000001").unwrap();
            let claims = ClaimSet::new(&inst, &student, &number, &md);
            let a = CanonicalBytes::of_claims(&claims).unwrap();
            let b = CanonicalBytes::of_claims(&claims).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Canonical bytes are valid UTF-8 JSON and the metadata round-trips
        /// with its key order intact.
        #[test]
        fn canonical_bytes_round_trip(md in metadata()) {
            let inst = InstitutionId::new();
            let student = StudentId::new();
            let number = CertificateNumber::new("SCVS-2024-TEST-000001").unwrap();
            let cb = CanonicalBytes::of_claims(&ClaimSet::new(&inst, &student, &number, &md))
                .unwrap();
            let parsed: serde_json::Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            let reparsed = Metadata::from_json(parsed["metadata"].clone()).unwrap();
            prop_assert_eq!(reparsed, md);
        }
    }
}
