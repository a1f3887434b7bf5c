//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use scvs_core::{CertificateNumber, CryptoError};
use scvs_crypto::KeyMaterial;

/// Default verdict cache TTL.
pub const DEFAULT_VERDICT_TTL: Duration = Duration::from_secs(60);

/// Configuration for the issuance and verification engines.
///
/// Deserializable from a config file; every field has a workable default
/// for local development except the key paths, which have conventional
/// locations an operator is expected to override.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Public base URL embedded in verification links.
    pub base_url: String,
    /// Bucket name for rendered certificate assets.
    pub asset_bucket: String,
    /// Verdict cache TTL in seconds.
    pub verdict_ttl_secs: u64,
    /// Path to the PKCS#8 private key PEM.
    pub private_key_path: PathBuf,
    /// Path to the SPKI public key PEM.
    pub public_key_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_owned(),
            asset_bucket: "scvs-assets".to_owned(),
            verdict_ttl_secs: DEFAULT_VERDICT_TTL.as_secs(),
            private_key_path: PathBuf::from("keys/scvs.pem"),
            public_key_path: PathBuf::from("keys/scvs.pub.pem"),
        }
    }
}

impl EngineConfig {
    /// The verdict cache TTL as a `Duration`.
    pub fn verdict_ttl(&self) -> Duration {
        Duration::from_secs(self.verdict_ttl_secs)
    }

    /// The public verification URL for a certificate number. This is the
    /// link encoded into the certificate's QR asset.
    pub fn verification_url(&self, number: &CertificateNumber) -> String {
        format!("{}/verify/{}", self.base_url.trim_end_matches('/'), number)
    }

    /// Load the key material named by the configured paths. Called once at
    /// startup; a missing or malformed PEM is fatal.
    pub fn load_key_material(&self) -> Result<KeyMaterial, CryptoError> {
        KeyMaterial::load(&self.private_key_path, &self.public_key_path)
    }
}
