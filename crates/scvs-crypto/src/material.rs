//! # Key Material Provider
//!
//! Loads the system's signing identity from operator-provided PEM files:
//! a PKCS#8 private key for issuance and an SPKI public key for
//! verification. Loading happens once at startup and failures are fatal at
//! first use — a process that cannot read its keys must not come up and
//! silently issue unverifiable certificates.
//!
//! The two halves load independently so the verify path can be handed
//! explicit key material that differs from the signer (the rotation seam:
//! a verifier processing older certificates receives the older public key
//! without any call-site change).

use std::path::Path;

use scvs_core::CryptoError;

use crate::rsa::{RsaKeyPair, RsaVerifyingKey};

/// The loaded signing identity: private and public halves.
///
/// Constructed once at startup and injected by reference into the engines.
/// There is no ambient global signing key.
pub struct KeyMaterial {
    /// The signing (private) key.
    pub signing: RsaKeyPair,
    /// The verifying (public) key.
    pub verifying: RsaVerifyingKey,
}

impl KeyMaterial {
    /// Load both key halves from PEM files.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyError` if either file is unreadable or not
    /// valid PEM for its expected format.
    pub fn load(
        private_pem_path: impl AsRef<Path>,
        public_pem_path: impl AsRef<Path>,
    ) -> Result<Self, CryptoError> {
        let signing = load_signing_key(private_pem_path)?;
        let verifying = load_verifying_key(public_pem_path)?;
        Ok(Self { signing, verifying })
    }

    /// Build key material from an in-memory pair. Used by tests and by
    /// deployments that source keys from a secret store instead of files.
    pub fn from_pair(signing: RsaKeyPair) -> Self {
        let verifying = signing.verifying_key();
        Self { signing, verifying }
    }
}

/// Load a PKCS#8 private key PEM from a file.
pub fn load_signing_key(path: impl AsRef<Path>) -> Result<RsaKeyPair, CryptoError> {
    let path = path.as_ref();
    let pem = std::fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyError(format!("cannot read private key {}: {e}", path.display()))
    })?;
    RsaKeyPair::from_pkcs8_pem(&pem)
}

/// Load an SPKI public key PEM from a file.
pub fn load_verifying_key(path: impl AsRef<Path>) -> Result<RsaVerifyingKey, CryptoError> {
    let path = path.as_ref();
    let pem = std::fs::read_to_string(path).map_err(|e| {
        CryptoError::KeyError(format!("cannot read public key {}: {e}", path.display()))
    })?;
    RsaVerifyingKey::from_public_key_pem(&pem)
}
