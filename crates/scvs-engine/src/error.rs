//! Engine error taxonomy.
//!
//! The split that matters operationally: a certificate that fails its
//! integrity checks is a *verdict* (`valid: false`), never an error. Errors
//! are reserved for requests the engine cannot answer at all.

use thiserror::Error;

use scvs_core::{CanonicalizationError, CertificateId, CryptoError, StateError};

use crate::ports::StoreError;

/// Errors from the issuance and verification engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request was malformed before any domain logic ran.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A certificate with this number already exists.
    #[error("certificate number already issued: {certificate_number}")]
    Duplicate {
        /// The conflicting certificate number.
        certificate_number: String,
    },

    /// The operation is refused by accreditation or lifecycle policy.
    #[error("policy violation: {0}")]
    Policy(String),

    /// The referenced record does not exist (or is withheld by policy).
    #[error("{0}")]
    NotFound(String),

    /// Claim canonicalization failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// A cryptographic hard failure: unusable key material or structurally
    /// malformed signature bytes. Never a signature mismatch.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A lifecycle transition was rejected.
    #[error(transparent)]
    State(#[from] StateError),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(String),

    /// The certificate was issued and persisted, but one of its rendered
    /// assets could not be stored. The certificate itself is intact.
    #[error("certificate {certificate_id} issued but asset upload failed: {detail}")]
    AssetIncomplete {
        /// The certificate whose assets are incomplete.
        certificate_id: CertificateId,
        /// What failed.
        detail: String,
    },
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { key } => Self::Duplicate {
                certificate_number: key,
            },
            StoreError::Backend(detail) => Self::Store(detail),
        }
    }
}
