//! # scvs-cli — SCVS Stack Command-Line Tools
//!
//! Offline access to the integrity pipeline: generate RSA key pairs,
//! canonicalize and digest a claims file, sign it, and verify a stored
//! digest and signature against it. Useful for operators checking a
//! certificate export without a running service.

pub mod signing;
