//! Stableprint CLI - compute and verify fingerprints of JSON documents.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{canonicalize, hash, verify};

#[derive(Parser)]
#[command(name = "stableprint")]
#[command(about = "Deterministic fingerprints of structured data")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Compute the fingerprint of input JSON
    Hash {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Digest algorithm (MD5, SHA1, SHA224, SHA256, SHA384, SHA512)
        #[arg(long, default_value = "MD5")]
        digest: String,
        /// Output format (raw, hex, base64, base64url)
        #[arg(long, default_value = "hex")]
        format: String,
        /// Prefix the output with the algorithm name
        #[arg(long)]
        prefix: bool,
    },
    /// Check input JSON against an expected fingerprint
    Verify {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Expected fingerprint; an `ALGORITHM:` prefix selects the digest
        #[arg(long)]
        expected: String,
        /// Digest algorithm used when the expected value has no prefix
        #[arg(long)]
        digest: Option<String>,
        /// Output format of the expected value
        #[arg(long, default_value = "hex")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let result = match cli.command {
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Hash {
            input,
            digest,
            format,
            prefix,
        } => hash::run(input, digest, format, prefix),
        Commands::Verify {
            input,
            expected,
            digest,
            format,
        } => verify::run(input, expected, digest, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
