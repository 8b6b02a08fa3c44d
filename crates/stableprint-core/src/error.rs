use thiserror::Error;

use stableprint_canonical::CanonicalizationError;

/// Errors surfaced by fingerprint generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Output format is not one of the supported encodings.
    #[error("invalid output format: {0}")]
    InvalidFormat(String),
    /// Digest algorithm is not supported.
    #[error("invalid digest algorithm: {0}")]
    InvalidAlgorithm(String),
    /// Encoded digest text could not be decoded.
    #[error("malformed digest: {0}")]
    MalformedDigest(String),
    /// Canonicalization failed; propagated unchanged.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}
