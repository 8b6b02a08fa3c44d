//! Hash command implementation.

use std::io::{self, Write};

use stableprint_core::{fingerprint, FingerprintOptions};
use tracing::debug;

use super::read_json;

pub fn run(
    input: Option<String>,
    digest: String,
    format: String,
    prefix: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject bad flags before reading a possibly large input.
    let config = FingerprintOptions {
        digest: Some(digest),
        format: Some(format),
        prefix,
    }
    .validate()?;
    debug!(?config, "hash:config");

    let value = read_json(input)?;
    let fp = fingerprint(&value, &config)?;

    let mut stdout = io::stdout().lock();
    if fp.format().is_text() {
        writeln!(stdout, "{}", fp)?;
    } else {
        stdout.write_all(fp.as_bytes())?;
    }
    Ok(())
}
