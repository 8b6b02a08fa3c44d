use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stableprint_canonical::{CanonicalSerializer, Canonicalizer};

use crate::algorithm::AlgorithmId;
use crate::error::FingerprintError;
use crate::format::OutputFormat;

/// Validated configuration for a single fingerprint computation.
///
/// Defaults: MD5, hex output, no prefix, default canonical encoding.
#[derive(Clone, Default)]
pub struct FingerprintConfig {
    /// Digest algorithm.
    pub digest: AlgorithmId,
    /// Output encoding of the raw digest.
    pub format: OutputFormat,
    /// Prepend `"<ALGORITHM>:"` to the output.
    pub prefix: bool,
    /// Replaces the default canonical encoding when set.
    pub serializer: Option<Arc<dyn CanonicalSerializer>>,
}

impl FingerprintConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the digest algorithm.
    pub fn with_digest(mut self, digest: AlgorithmId) -> Self {
        self.digest = digest;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables the algorithm prefix.
    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Installs a custom canonical serializer.
    pub fn with_serializer(mut self, serializer: Arc<dyn CanonicalSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Canonicalizer honoring the configured serializer.
    pub fn canonicalizer(&self) -> Canonicalizer {
        match &self.serializer {
            Some(serializer) => Canonicalizer::with_serializer(Arc::clone(serializer)),
            None => Canonicalizer::new(),
        }
    }
}

impl fmt::Debug for FingerprintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FingerprintConfig")
            .field("digest", &self.digest)
            .field("format", &self.format)
            .field("prefix", &self.prefix)
            .field("custom_serializer", &self.serializer.is_some())
            .finish()
    }
}

/// Loosely typed options, as read from a configuration map.
///
/// Missing keys take the defaults of [`FingerprintConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintOptions {
    /// Algorithm name, e.g. `"SHA256"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Format name, e.g. `"Base64Url"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Prepend the algorithm literal.
    pub prefix: bool,
}

impl FingerprintOptions {
    /// Validates the options into a typed configuration.
    ///
    /// The format is checked first, then the algorithm.
    pub fn validate(&self) -> Result<FingerprintConfig, FingerprintError> {
        let format = match &self.format {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };
        let digest = match &self.digest {
            Some(name) => name.parse()?,
            None => AlgorithmId::default(),
        };
        Ok(FingerprintConfig {
            digest,
            format,
            prefix: self.prefix,
            serializer: None,
        })
    }
}

impl TryFrom<&FingerprintOptions> for FingerprintConfig {
    type Error = FingerprintError;

    fn try_from(options: &FingerprintOptions) -> Result<Self, Self::Error> {
        options.validate()
    }
}

/// The `{data, digest, format, prefix}` request map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRequest {
    /// Value to fingerprint.
    pub data: serde_json::Value,
    /// Remaining keys.
    #[serde(flatten)]
    pub options: FingerprintOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_options_yield_defaults() {
        let config = FingerprintOptions::default().validate().unwrap();
        assert_eq!(config.digest, AlgorithmId::Md5);
        assert_eq!(config.format, OutputFormat::Hex);
        assert!(!config.prefix);
        assert!(config.serializer.is_none());
    }

    #[test]
    fn options_parse_from_map() {
        let map = json!({"digest": "SHA256", "format": "base64url", "prefix": true});
        let options: FingerprintOptions = serde_json::from_value(map).unwrap();
        let config = options.validate().unwrap();
        assert_eq!(config.digest, AlgorithmId::Sha256);
        assert_eq!(config.format, OutputFormat::Base64Url);
        assert!(config.prefix);
    }

    #[test]
    fn format_is_validated_before_digest() {
        let options = FingerprintOptions {
            digest: Some("nope".into()),
            format: Some("bogus".into()),
            prefix: false,
        };
        assert_eq!(
            options.validate().unwrap_err(),
            FingerprintError::InvalidFormat("bogus".into())
        );
    }

    #[test]
    fn request_flattens_options() {
        let request: FingerprintRequest =
            serde_json::from_value(json!({"data": {"a": 1}, "digest": "SHA1"})).unwrap();
        assert_eq!(request.data, json!({"a": 1}));
        assert_eq!(request.options.digest.as_deref(), Some("SHA1"));
        assert!(!request.options.prefix);
    }

    #[test]
    fn debug_hides_serializer_body() {
        let config = FingerprintConfig::new().with_prefix(true);
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("prefix: true"));
        assert!(rendered.contains("custom_serializer: false"));
    }
}
