//! # RSA-SHA256 Signing and Verification
//!
//! PKCS#1 v1.5 signatures with SHA-256 over canonical claim-set bytes.
//! Verification is deterministic: the same key, bytes, and signature always
//! produce the same outcome, which is what makes stored signatures
//! re-checkable years after issuance.
//!
//! ## Serde
//!
//! Signatures serialize as base64 strings — the wire and storage format for
//! the certificate `signature` column.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use scvs_core::{CanonicalBytes, CryptoError};

/// An RSA key pair for signing operations.
///
/// Does not implement `Serialize` — private keys must not be accidentally
/// serialized into logs, responses, or artifacts.
pub struct RsaKeyPair {
    inner: RsaPrivateKey,
}

/// An RSA public key for signature verification.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaVerifyingKey {
    inner: RsaPublicKey,
}

/// An RSA PKCS#1 v1.5 signature.
///
/// Produced only from `CanonicalBytes` input. Serializes as a base64 string.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaSignature(Vec<u8>);

// ---------------------------------------------------------------------------
// RsaKeyPair impls
// ---------------------------------------------------------------------------

impl RsaKeyPair {
    /// Generate a new RSA key pair with the given modulus size in bits
    /// (2048, 3072, or 4096).
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        let mut rng = rand::thread_rng();
        let inner = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CryptoError::KeyError(format!("RSA key generation failed: {e}")))?;
        Ok(Self { inner })
    }

    /// Generate a 2048-bit RSA key pair (default).
    pub fn generate_2048() -> Result<Self, CryptoError> {
        Self::generate(2048)
    }

    /// Import a private key from PKCS#8 PEM.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, CryptoError> {
        let inner = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| CryptoError::KeyError(format!("invalid PKCS#8 private key: {e}")))?;
        Ok(Self { inner })
    }

    /// Export the private key to PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<String, CryptoError> {
        let pem = self
            .inner
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyError(format!("PKCS#8 export failed: {e}")))?;
        Ok(pem.to_string())
    }

    /// The verifying (public) half of this key pair.
    pub fn verifying_key(&self) -> RsaVerifyingKey {
        RsaVerifyingKey {
            inner: self.inner.to_public_key(),
        }
    }

    /// Key size in bits.
    pub fn size(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        self.inner.size() * 8
    }

    /// Sign canonical bytes: SHA-256 digest, then PKCS#1 v1.5 with a
    /// blinding RNG.
    ///
    /// The signing input MUST be `&CanonicalBytes` to enforce that all
    /// signed data has been canonicalized through the claim-set pipeline.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SigningFailed` if the RSA operation fails.
    pub fn sign(&self, data: &CanonicalBytes) -> Result<RsaSignature, CryptoError> {
        let mut rng = rand::thread_rng();
        let hashed = Sha256::digest(data.as_bytes());
        let bytes = self
            .inner
            .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(RsaSignature(bytes))
    }
}

impl std::fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material, even in debug output.
        write!(f, "RsaKeyPair({} bits)", self.size())
    }
}

// ---------------------------------------------------------------------------
// RsaVerifyingKey impls
// ---------------------------------------------------------------------------

impl RsaVerifyingKey {
    /// Import a public key from SPKI PEM.
    pub fn from_public_key_pem(pem: &str) -> Result<Self, CryptoError> {
        let inner = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| CryptoError::KeyError(format!("invalid SPKI public key: {e}")))?;
        Ok(Self { inner })
    }

    /// Export the public key to SPKI PEM.
    pub fn to_public_key_pem(&self) -> Result<String, CryptoError> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyError(format!("SPKI export failed: {e}")))
    }

    /// Verify a signature over canonical bytes.
    ///
    /// Returns `Ok(true)` when the signature matches, `Ok(false)` when it is
    /// well-formed but does not match. Structural failures (key/signature
    /// material unusable for this modulus) surface as `Err` — they must
    /// propagate distinctly from a normal mismatch.
    pub fn verify(
        &self,
        data: &CanonicalBytes,
        signature: &RsaSignature,
    ) -> Result<bool, CryptoError> {
        let hashed = Sha256::digest(data.as_bytes());
        match self
            .inner
            .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature.as_bytes())
        {
            Ok(()) => Ok(true),
            Err(rsa::Error::Verification) => Ok(false),
            Err(e) => Err(CryptoError::MalformedSignature(e.to_string())),
        }
    }
}

impl std::fmt::Debug for RsaVerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use rsa::traits::PublicKeyParts;
        write!(f, "RsaVerifyingKey({} bits)", self.inner.size() * 8)
    }
}

// ---------------------------------------------------------------------------
// RsaSignature impls
// ---------------------------------------------------------------------------

impl RsaSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as base64 — the wire and storage encoding.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Parse from a base64 string.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedSignature` on invalid base64. This is
    /// a hard failure, not a "does not match" outcome.
    pub fn from_base64(s: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(s.trim())
            .map_err(|e| CryptoError::MalformedSignature(format!("invalid base64: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for RsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for RsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for RsaSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(8).map(|b| format!("{b:02x}")).collect();
        write!(f, "RsaSignature({prefix}...)")
    }
}

impl std::fmt::Display for RsaSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64())
    }
}
