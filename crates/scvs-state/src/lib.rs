//! # scvs-state — Domain Records and Lifecycle State Machines
//!
//! The certificate, institution, and student records of the SCVS Stack,
//! with validated status transitions.
//!
//! ## Lifecycle Rules
//!
//! - A certificate is issued `Valid` and may transition to `Revoked` once.
//!   Revocation is permanent; there is no reinstatement path.
//! - Revoking an already-revoked certificate is an idempotent no-op, not an
//!   error.
//! - `Expired` is a reserved status. No code path currently produces it, but
//!   the state machine rejects transitions out of it so a future expiry
//!   policy cannot silently resurrect certificates.
//! - An institution must be `Approved` to issue; `Pending` and `Suspended`
//!   institutions are refused at issuance and their certificates fail
//!   verification.

pub mod certificate;
pub mod institution;
pub mod student;

pub use certificate::{Certificate, CertificateStatus};
pub use institution::{Institution, InstitutionStatus, InstitutionSummary};
pub use student::Student;
