//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the SCVS Stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Cryptographic errors fail loudly with full context. A hard failure
//!   (unreadable key material, malformed signature bytes) is never folded
//!   into a "signature does not match" result — the two travel on different
//!   types entirely.
//! - State machine errors include the current state, attempted transition,
//!   and rejection reason.

use thiserror::Error;

/// Error during canonical serialization of a claim set.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in metadata. Non-integer numbers have
    /// no byte-stable cross-language serialization, so amounts and scores
    /// must be strings or integers.
    #[error("float values are not permitted in certificate metadata; use string or integer: {0}")]
    FloatRejected(f64),

    /// Integer value does not fit in a signed 64-bit representation.
    #[error("integer value out of range for canonical representation: {0}")]
    IntegerOutOfRange(u64),

    /// Metadata must be a JSON object at the top level.
    #[error("metadata must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
///
/// These are hard failures in the sense of the verification contract: they
/// must propagate distinctly from a normal "signature does not match"
/// outcome, which is not an error but a `false` verification result.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key material could not be read, parsed, or used.
    #[error("key error: {0}")]
    KeyError(String),

    /// Signature bytes are structurally malformed (not a well-formed
    /// signature for the key's modulus, bad base64, wrong length).
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Signing operation failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Error in certificate lifecycle transitions.
#[derive(Error, Debug)]
pub enum StateError {
    /// Attempted an invalid state transition.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// Reason the transition was rejected.
        reason: String,
    },
}

/// Error validating an identifier newtype at construction.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The identifier string was empty or whitespace-only.
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier string exceeds the maximum length.
    #[error("identifier exceeds {max} characters: {len}")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
        /// Actual length of the rejected input.
        len: usize,
    },
}
