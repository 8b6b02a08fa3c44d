use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::FingerprintError;

/// Encoding applied to raw digest bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputFormat {
    /// Digest bytes verbatim.
    Raw,
    /// Lowercase hexadecimal (the default).
    #[default]
    Hex,
    /// Standard MIME base64 alphabet, padded.
    Base64,
    /// URL and filesystem safe base64 alphabet, never padded.
    Base64Url,
}

const FORMATS: &[(OutputFormat, &str)] = &[
    (OutputFormat::Raw, "Raw"),
    (OutputFormat::Hex, "Hex"),
    (OutputFormat::Base64, "Base64"),
    (OutputFormat::Base64Url, "Base64Url"),
];

impl OutputFormat {
    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        FORMATS[self as usize].1
    }

    /// Looks up a format by name, ignoring ASCII case, `-` and `_`.
    /// `hexdigest` is accepted as an alias for `Hex`.
    pub fn lookup(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if normalized == "hexdigest" {
            return Some(OutputFormat::Hex);
        }
        FORMATS
            .iter()
            .find(|(_, literal)| literal.eq_ignore_ascii_case(&normalized))
            .map(|(format, _)| *format)
    }

    /// Returns `false` only for [`OutputFormat::Raw`].
    pub fn is_text(self) -> bool {
        !matches!(self, OutputFormat::Raw)
    }

    /// Encodes raw digest bytes.
    pub fn encode(self, raw: &[u8]) -> Vec<u8> {
        match self {
            OutputFormat::Raw => raw.to_vec(),
            OutputFormat::Hex => hex::encode(raw).into_bytes(),
            OutputFormat::Base64 => STANDARD.encode(raw).into_bytes(),
            OutputFormat::Base64Url => URL_SAFE_NO_PAD.encode(raw).into_bytes(),
        }
    }

    /// Decodes an encoded digest back into raw bytes.
    pub fn decode(self, encoded: &[u8]) -> Result<Vec<u8>, FingerprintError> {
        match self {
            OutputFormat::Raw => Ok(encoded.to_vec()),
            OutputFormat::Hex => hex::decode(encoded)
                .map_err(|err| FingerprintError::MalformedDigest(err.to_string())),
            OutputFormat::Base64 => STANDARD
                .decode(encoded)
                .map_err(|err| FingerprintError::MalformedDigest(err.to_string())),
            OutputFormat::Base64Url => URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|err| FingerprintError::MalformedDigest(err.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| FingerprintError::InvalidFormat(s.to_owned()))
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 5] = [0xfb, 0xff, 0x00, 0x3e, 0x3f];

    #[test]
    fn names_and_aliases() {
        assert_eq!("hex".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!("HexDigest".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert_eq!("base64-url".parse::<OutputFormat>().unwrap(), OutputFormat::Base64Url);
        assert_eq!("RAW".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert_eq!(
            "bogus".parse::<OutputFormat>(),
            Err(FingerprintError::InvalidFormat("bogus".into()))
        );
    }

    #[test]
    fn encodings() {
        assert_eq!(OutputFormat::Hex.encode(&SAMPLE), b"fbff003e3f".to_vec());
        assert_eq!(OutputFormat::Base64.encode(&SAMPLE), b"+/8APj8=".to_vec());
        assert_eq!(OutputFormat::Base64Url.encode(&SAMPLE), b"-_8APj8".to_vec());
        assert_eq!(OutputFormat::Raw.encode(&SAMPLE), SAMPLE.to_vec());
    }

    #[test]
    fn decode_reverses_encode() {
        for format in [
            OutputFormat::Raw,
            OutputFormat::Hex,
            OutputFormat::Base64,
            OutputFormat::Base64Url,
        ] {
            let encoded = format.encode(&SAMPLE);
            assert_eq!(format.decode(&encoded).unwrap(), SAMPLE.to_vec(), "{format}");
        }
    }

    #[test]
    fn malformed_text_is_reported() {
        assert!(matches!(
            OutputFormat::Hex.decode(b"zz"),
            Err(FingerprintError::MalformedDigest(_))
        ));
        assert!(matches!(
            OutputFormat::Base64Url.decode(b"+/=="),
            Err(FingerprintError::MalformedDigest(_))
        ));
    }
}
