//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the SCVS Stack.
//! Each identifier is a distinct type — you cannot pass a [`StudentId`]
//! where an [`InstitutionId`] is expected, and a digest computed over
//! swapped identifiers would be caught at compile time rather than at
//! verification time.
//!
//! ## Validation
//!
//! String-based identifiers ([`CertificateNumber`], [`AccreditationId`])
//! validate at construction time. UUID-based identifiers ([`CertificateId`],
//! [`InstitutionId`], [`StudentId`]) are always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A unique identifier for an issued certificate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(Uuid);

/// A unique identifier for an institution (trust anchor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstitutionId(Uuid);

/// A unique identifier for a student referenced by certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(Uuid);

macro_rules! uuid_id_impls {
    ($ty:ident) => {
        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id_impls!(CertificateId);
uuid_id_impls!(InstitutionId);
uuid_id_impls!(StudentId);

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Maximum length for human-meaningful natural keys.
const MAX_NATURAL_KEY_LEN: usize = 128;

/// The externally-facing, human-meaningful certificate number
/// (e.g. `SCVS-2024-UNIV-000001`). Unique per certificate; the public
/// lookup key for verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateNumber(String);

/// An institution's unique accreditation identifier, assigned by the
/// accrediting authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccreditationId(String);

macro_rules! natural_key_impls {
    ($ty:ident) => {
        impl $ty {
            /// Create a validated identifier. Leading/trailing whitespace is
            /// trimmed; empty and over-long inputs are rejected.
            pub fn new(s: impl Into<String>) -> Result<Self, IdentityError> {
                let s: String = s.into();
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdentityError::Empty);
                }
                if trimmed.len() > MAX_NATURAL_KEY_LEN {
                    return Err(IdentityError::TooLong {
                        max: MAX_NATURAL_KEY_LEN,
                        len: trimmed.len(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

natural_key_impls!(CertificateNumber);
natural_key_impls!(AccreditationId);
