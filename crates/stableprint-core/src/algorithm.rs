use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FingerprintError;

/// Supported digest algorithms.
///
/// The serialized form and the fingerprint prefix are the canonical literal
/// returned by [`AlgorithmId::as_str`] (`"MD5"`, `"SHA256"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum AlgorithmId {
    /// MD5 (the default).
    #[default]
    #[serde(rename = "MD5")]
    Md5,
    /// SHA-1.
    #[serde(rename = "SHA1")]
    Sha1,
    /// SHA-224.
    #[serde(rename = "SHA224")]
    Sha224,
    /// SHA-256.
    #[serde(rename = "SHA256")]
    Sha256,
    /// SHA-384.
    #[serde(rename = "SHA384")]
    Sha384,
    /// SHA-512.
    #[serde(rename = "SHA512")]
    Sha512,
}

const ALGORITHMS: &[(AlgorithmId, &str, usize)] = &[
    (AlgorithmId::Md5, "MD5", 16),
    (AlgorithmId::Sha1, "SHA1", 20),
    (AlgorithmId::Sha224, "SHA224", 28),
    (AlgorithmId::Sha256, "SHA256", 32),
    (AlgorithmId::Sha384, "SHA384", 48),
    (AlgorithmId::Sha512, "SHA512", 64),
];

impl AlgorithmId {
    /// Every supported algorithm, in table order.
    pub const ALL: [AlgorithmId; 6] = [
        AlgorithmId::Md5,
        AlgorithmId::Sha1,
        AlgorithmId::Sha224,
        AlgorithmId::Sha256,
        AlgorithmId::Sha384,
        AlgorithmId::Sha512,
    ];

    fn entry(self) -> &'static (AlgorithmId, &'static str, usize) {
        // Every variant has a row.
        &ALGORITHMS[self as usize]
    }

    /// Canonical literal, also used as the fingerprint prefix.
    pub fn as_str(self) -> &'static str {
        self.entry().1
    }

    /// Length in bytes of the raw digest.
    pub fn output_len(self) -> usize {
        self.entry().2
    }

    /// Looks up an algorithm by name, ignoring ASCII case, `-` and `_`.
    pub fn lookup(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        ALGORITHMS
            .iter()
            .find(|(_, literal, _)| *literal == normalized)
            .map(|(alg, _, _)| *alg)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| FingerprintError::InvalidAlgorithm(s.to_owned()))
    }
}

impl TryFrom<String> for AlgorithmId {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
