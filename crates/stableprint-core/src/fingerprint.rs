//! Fingerprint generation: canonical bytes, digest, output encoding, prefix.
//!
//! ```rust
//! use stableprint_core::{fingerprint, AlgorithmId, FingerprintConfig, OutputFormat};
//! use serde_json::json;
//!
//! let config = FingerprintConfig::new()
//!     .with_digest(AlgorithmId::Sha256)
//!     .with_format(OutputFormat::Base64Url)
//!     .with_prefix(true);
//! let fp = fingerprint(&json!({"b": 2, "a": 1}), &config)?;
//! assert!(fp.to_string().starts_with("SHA256:"));
//! # Ok::<(), stableprint_core::FingerprintError>(())
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use stableprint_canonical::ToValue;

use crate::algorithm::AlgorithmId;
use crate::config::{FingerprintConfig, FingerprintOptions, FingerprintRequest};
use crate::digest::digest;
use crate::error::FingerprintError;
use crate::format::OutputFormat;

/// Computed fingerprint. Immutable; compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    algorithm: AlgorithmId,
    format: OutputFormat,
    prefixed: bool,
    digest: Vec<u8>,
    output: Vec<u8>,
}

impl Fingerprint {
    fn from_digest(
        algorithm: AlgorithmId,
        format: OutputFormat,
        prefixed: bool,
        digest: Vec<u8>,
    ) -> Self {
        let encoded = format.encode(&digest);
        let output = if prefixed {
            let literal = algorithm.as_str().as_bytes();
            let mut out = Vec::with_capacity(literal.len() + 1 + encoded.len());
            out.extend_from_slice(literal);
            out.push(b':');
            out.extend_from_slice(&encoded);
            out
        } else {
            encoded
        };
        Self {
            algorithm,
            format,
            prefixed,
            digest,
            output,
        }
    }

    /// Algorithm that produced the digest.
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Output encoding.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether the output carries the `"<ALGORITHM>:"` prefix.
    pub fn is_prefixed(&self) -> bool {
        self.prefixed
    }

    /// Raw digest bytes, before encoding and prefixing.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Full output: prefix (if any) followed by the encoded digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Full output as text. `None` only for raw output that is not UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.output).ok()
    }

    /// Consumes the fingerprint, returning the full output.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.output
    }
}

/// Text outputs are written verbatim. Raw output is shown as the prefix (if
/// any) followed by lowercase hex.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.format.is_text() {
            if let Some(text) = self.as_str() {
                return f.write_str(text);
            }
        }
        if self.prefixed {
            write!(f, "{}:", self.algorithm)?;
        }
        f.write_str(&hex::encode(&self.digest))
    }
}

/// Computes the fingerprint of `data` under `config`.
///
/// # Errors
///
/// Canonicalization failures are returned unchanged as
/// [`FingerprintError::Canonicalization`].
pub fn fingerprint<T: ToValue + ?Sized>(
    data: &T,
    config: &FingerprintConfig,
) -> Result<Fingerprint, FingerprintError> {
    debug!(
        digest = %config.digest,
        format = %config.format,
        prefix = config.prefix,
        "fingerprint:start"
    );
    let bytes = config.canonicalizer().canonicalize(data)?;
    let raw = digest(config.digest, &bytes);
    let result = Fingerprint::from_digest(config.digest, config.format, config.prefix, raw);
    debug!(canonical_len = bytes.len(), "fingerprint:done");
    Ok(result)
}

/// Computes the fingerprint of `data` with the default configuration
/// (MD5, hex, no prefix).
pub fn fingerprint_default<T: ToValue + ?Sized>(data: &T) -> Result<Fingerprint, FingerprintError> {
    fingerprint(data, &FingerprintConfig::default())
}

/// Validates loosely typed `options`, then fingerprints `data`.
///
/// Invalid options fail before `data` is converted or hashed.
pub fn fingerprint_with_options<T: ToValue + ?Sized>(
    data: &T,
    options: &FingerprintOptions,
) -> Result<Fingerprint, FingerprintError> {
    let config = options.validate()?;
    fingerprint(data, &config)
}

/// Fingerprints the `data` member of a request map using its other keys.
pub fn fingerprint_request(request: &FingerprintRequest) -> Result<Fingerprint, FingerprintError> {
    fingerprint_with_options(&request.data, &request.options)
}

/// Splits `"SHA256:..."` into the algorithm and the remaining text.
///
/// Returns `None` when there is no prefix or it names an unknown algorithm.
pub fn split_prefix(text: &str) -> Option<(AlgorithmId, &str)> {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let re = PREFIX
        .get_or_init(|| Regex::new(r"(?s)^([A-Za-z0-9_-]{2,16}):(.*)$").ok())
        .as_ref()?;
    let caps = re.captures(text)?;
    let algorithm = AlgorithmId::lookup(caps.get(1)?.as_str())?;
    Some((algorithm, caps.get(2)?.as_str()))
}

/// Recomputes the fingerprint of `data` and compares it with `expected`.
pub fn verify<T: ToValue + ?Sized>(
    data: &T,
    expected: &[u8],
    config: &FingerprintConfig,
) -> Result<bool, FingerprintError> {
    let computed = fingerprint(data, config)?;
    Ok(computed.as_bytes() == expected)
}

/// Verifies a prefixed fingerprint, taking the algorithm from its prefix.
///
/// Only the text after the prefix is compared, so `sha256:` and `SHA256:`
/// verify alike. `config` supplies the format and serializer; its digest and
/// prefix settings are overridden.
///
/// # Errors
///
/// Returns [`FingerprintError::InvalidAlgorithm`] when `expected` has no
/// recognizable algorithm prefix.
pub fn verify_prefixed<T: ToValue + ?Sized>(
    data: &T,
    expected: &str,
    config: &FingerprintConfig,
) -> Result<bool, FingerprintError> {
    let (algorithm, encoded) = split_prefix(expected).ok_or_else(|| {
        FingerprintError::InvalidAlgorithm(format!("no algorithm prefix in {:?}", expected))
    })?;
    let config = config.clone().with_digest(algorithm).with_prefix(false);
    verify(data, encoded.as_bytes(), &config)
}
