//! Fingerprint generation over canonical bytes.
//!
//! A fingerprint is `format(digest(canonical_bytes(value)))`, optionally
//! prefixed with the algorithm literal (`"SHA256:..."`). Configuration is a
//! plain per-call value; nothing here holds process-wide state.
//!
#![deny(missing_docs)]

/// Digest algorithm identifiers.
pub mod algorithm;
/// Per-call fingerprint configuration.
pub mod config;
/// Streaming digest context over the RustCrypto hashers.
pub mod digest;
/// Error types for fingerprint generation.
pub mod error;
/// Fingerprint generation and verification.
pub mod fingerprint;
/// Output encodings for raw digest bytes.
pub mod format;

pub use algorithm::AlgorithmId;
pub use config::{FingerprintConfig, FingerprintOptions, FingerprintRequest};
pub use digest::{digest, DigestContext};
pub use error::FingerprintError;
pub use fingerprint::{
    fingerprint, fingerprint_default, fingerprint_request, fingerprint_with_options,
    split_prefix, verify, verify_prefixed, Fingerprint,
};
pub use format::OutputFormat;
pub use stableprint_canonical::{CanonicalizationError, ToValue, Value};
