//! Verify command implementation.

use stableprint_core::{
    split_prefix, verify, verify_prefixed, AlgorithmId, FingerprintConfig, OutputFormat,
};

use super::read_json;

pub fn run(
    input: Option<String>,
    expected: String,
    digest: Option<String>,
    format: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: OutputFormat = format.parse()?;
    let digest: AlgorithmId = match digest {
        Some(name) => name.parse()?,
        None => AlgorithmId::default(),
    };
    let config = FingerprintConfig::new().with_digest(digest).with_format(format);

    let value = read_json(input)?;
    let matched = if split_prefix(&expected).is_some() {
        verify_prefixed(&value, &expected, &config)?
    } else {
        verify(&value, expected.as_bytes(), &config)?
    };

    if matched {
        println!("OK");
        Ok(())
    } else {
        Err("fingerprint mismatch".into())
    }
}
