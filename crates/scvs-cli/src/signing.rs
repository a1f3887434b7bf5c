//! # Signing Subcommand
//!
//! RSA key generation, claim digesting, signing, and verification.
//!
//! Wraps `scvs-crypto` to provide CLI access to the integrity pipeline.
//! All operations canonicalize through `CanonicalBytes`, so a digest or
//! signature produced here matches what the issuance engine would store.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

use scvs_core::{
    CanonicalBytes, CertificateNumber, ClaimSet, InstitutionId, Metadata, StudentId, sha256_hex,
};
use scvs_crypto::{RsaKeyPair, RsaSignature, RsaVerifyingKey};

/// Arguments for the `scvs sign` subcommand group.
#[derive(Args, Debug)]
pub struct SigningArgs {
    #[command(subcommand)]
    pub command: SigningCommand,
}

/// Signing subcommands.
#[derive(Subcommand, Debug)]
pub enum SigningCommand {
    /// Generate a new RSA key pair as PKCS#8 / SPKI PEM files.
    Keygen {
        /// Output directory for the key files.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// RSA modulus size in bits.
        #[arg(long, default_value_t = 2048)]
        bits: usize,
        /// Prefix for the key filenames.
        #[arg(long, default_value = "scvs")]
        prefix: String,
    },

    /// Canonicalize a claims file and print its SHA-256 digest.
    Digest {
        /// Path to the claims JSON document.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Sign a claims file, printing canonical form, digest, and signature.
    Sign {
        /// Path to the PKCS#8 private key PEM.
        #[arg(long)]
        key: PathBuf,
        /// Path to the claims JSON document.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Verify a stored digest and signature against a claims file.
    Verify {
        /// Path to the SPKI public key PEM.
        #[arg(long)]
        pubkey: PathBuf,
        /// Path to the claims JSON document.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Expected SHA-256 digest (64 hex characters). Checked when given.
        #[arg(long)]
        hash: Option<String>,
        /// The signature to verify (base64).
        #[arg(long)]
        signature: String,
    },
}

/// A claims document as issued requests and certificate exports carry it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimsFile {
    institution_id: InstitutionId,
    student_id: StudentId,
    certificate_number: CertificateNumber,
    metadata: Metadata,
}

/// Execute the signing subcommand.
pub fn run_signing(args: &SigningArgs) -> Result<u8> {
    match &args.command {
        SigningCommand::Keygen {
            output,
            bits,
            prefix,
        } => cmd_keygen(output, *bits, prefix),
        SigningCommand::Digest { file } => cmd_digest(file),
        SigningCommand::Sign { key, file } => cmd_sign(key, file),
        SigningCommand::Verify {
            pubkey,
            file,
            hash,
            signature,
        } => cmd_verify(pubkey, file, hash.as_deref(), signature),
    }
}

/// Generate an RSA key pair and write both halves as PEM files.
fn cmd_keygen(output_dir: &Path, bits: usize, prefix: &str) -> Result<u8> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let key = RsaKeyPair::generate(bits)?;
    let private_pem = key.to_pkcs8_pem()?;
    let public_pem = key.verifying_key().to_public_key_pem()?;

    let private_path = output_dir.join(format!("{prefix}.pem"));
    let public_path = output_dir.join(format!("{prefix}.pub.pem"));

    std::fs::write(&private_path, private_pem)
        .with_context(|| format!("failed to write private key: {}", private_path.display()))?;
    std::fs::write(&public_path, public_pem)
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    println!("OK: generated RSA-{bits} key pair");
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());

    Ok(0)
}

/// Canonicalize a claims file and print its digest.
fn cmd_digest(file_path: &Path) -> Result<u8> {
    let canonical = read_canonical(file_path)?;
    println!("{}", sha256_hex(&canonical));
    Ok(0)
}

/// Sign a claims file and print canonical form, digest, and signature.
fn cmd_sign(key_path: &Path, file_path: &Path) -> Result<u8> {
    if !key_path.exists() {
        bail!("private key file not found: {}", key_path.display());
    }

    let pem = std::fs::read_to_string(key_path)
        .with_context(|| format!("failed to read private key: {}", key_path.display()))?;
    let key = RsaKeyPair::from_pkcs8_pem(&pem)?;

    let canonical = read_canonical(file_path)?;
    let signature = key.sign(&canonical)?;

    // Canonical bytes are compact JSON, always valid UTF-8.
    let canonical_text = String::from_utf8_lossy(canonical.as_bytes());

    println!("OK: signed {}", file_path.display());
    println!("  Canonical: {canonical_text}");
    println!("  Digest:    {}", sha256_hex(&canonical));
    println!("  Signature: {}", signature.to_base64());

    Ok(0)
}

/// Verify a digest and signature against a claims file.
fn cmd_verify(
    pubkey_path: &Path,
    file_path: &Path,
    expected_hash: Option<&str>,
    signature_b64: &str,
) -> Result<u8> {
    if !pubkey_path.exists() {
        bail!("public key file not found: {}", pubkey_path.display());
    }

    let pem = std::fs::read_to_string(pubkey_path)
        .with_context(|| format!("failed to read public key: {}", pubkey_path.display()))?;
    let key = RsaVerifyingKey::from_public_key_pem(&pem)?;

    let canonical = read_canonical(file_path)?;
    let digest = sha256_hex(&canonical);

    if let Some(expected) = expected_hash {
        if !expected.eq_ignore_ascii_case(&digest) {
            println!("FAIL: digest mismatch");
            println!("  Expected: {expected}");
            println!("  Computed: {digest}");
            return Ok(1);
        }
    }

    let signature = RsaSignature::from_base64(signature_b64)?;
    if key.verify(&canonical, &signature)? {
        println!("OK: signature valid");
        println!("  Digest: {digest}");
        Ok(0)
    } else {
        println!("FAIL: signature does not match");
        Ok(1)
    }
}

/// Read a claims JSON file and canonicalize it.
fn read_canonical(file_path: &Path) -> Result<CanonicalBytes> {
    if !file_path.exists() {
        bail!("claims file not found: {}", file_path.display());
    }
    let text = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read claims file: {}", file_path.display()))?;
    let claims: ClaimsFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid claims document: {}", file_path.display()))?;
    let claim_set = ClaimSet::new(
        &claims.institution_id,
        &claims.student_id,
        &claims.certificate_number,
        &claims.metadata,
    );
    CanonicalBytes::of_claims(&claim_set).context("canonicalization failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scvs_crypto::fixtures;

    const CLAIMS_JSON: &str = r#"{
        "institutionId": "0d0cd01e-0897-4a0c-b0e4-7d67a8a07ae3",
        "studentId": "4b1c7b65-8ac1-45d1-b83c-9b4a335f0a6f",
        "certificateNumber": "SCVS-2024-UNIV-000001",
        "metadata": {"degree": "BSc Computer Science", "year": 2024}
    }"#;

    fn write_fixture_keys(dir: &Path) -> (PathBuf, PathBuf) {
        let key = fixtures::primary();
        let private = dir.join("scvs.pem");
        let public = dir.join("scvs.pub.pem");
        std::fs::write(&private, key.to_pkcs8_pem().unwrap()).unwrap();
        std::fs::write(&public, key.verifying_key().to_public_key_pem().unwrap()).unwrap();
        (private, public)
    }

    #[test]
    fn test_sign_then_verify_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (private, public) = write_fixture_keys(dir.path());
        let claims = dir.path().join("claims.json");
        std::fs::write(&claims, CLAIMS_JSON).unwrap();

        assert_eq!(cmd_sign(&private, &claims).unwrap(), 0);

        let canonical = read_canonical(&claims).unwrap();
        let signature = fixtures::primary().sign(&canonical).unwrap();
        let code = cmd_verify(
            &public,
            &claims,
            Some(&sha256_hex(&canonical)),
            &signature.to_base64(),
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_verify_fails_on_wrong_digest() {
        let dir = tempfile::tempdir().unwrap();
        let (_, public) = write_fixture_keys(dir.path());
        let claims = dir.path().join("claims.json");
        std::fs::write(&claims, CLAIMS_JSON).unwrap();

        let canonical = read_canonical(&claims).unwrap();
        let signature = fixtures::primary().sign(&canonical).unwrap();
        let code = cmd_verify(
            &public,
            &claims,
            Some(&"0".repeat(64)),
            &signature.to_base64(),
        )
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_verify_fails_on_foreign_signature() {
        let dir = tempfile::tempdir().unwrap();
        let (_, public) = write_fixture_keys(dir.path());
        let claims = dir.path().join("claims.json");
        std::fs::write(&claims, CLAIMS_JSON).unwrap();

        let canonical = read_canonical(&claims).unwrap();
        let foreign = fixtures::secondary().sign(&canonical).unwrap();
        let code = cmd_verify(&public, &claims, None, &foreign.to_base64()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_digest_rejects_malformed_claims() {
        let dir = tempfile::tempdir().unwrap();
        let claims = dir.path().join("claims.json");
        std::fs::write(&claims, r#"{"institutionId": "not-a-uuid"}"#).unwrap();
        assert!(cmd_digest(&claims).is_err());
    }

    #[test]
    fn test_missing_files_bail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(cmd_digest(&missing).is_err());
        assert!(cmd_sign(&dir.path().join("nope.pem"), &missing).is_err());
    }
}
