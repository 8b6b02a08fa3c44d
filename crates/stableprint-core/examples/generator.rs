use serde_json::json;
use stableprint_core::{fingerprint, AlgorithmId, FingerprintConfig, OutputFormat};

fn main() {
    let record = json!({
        "id": 42,
        "name": "example",
        "ratio": 0.25,
        "tags": ["alpha", "beta"],
        "owner": null
    });

    for digest in AlgorithmId::ALL {
        let config = FingerprintConfig::new()
            .with_digest(digest)
            .with_format(OutputFormat::Base64Url)
            .with_prefix(true);
        match fingerprint(&record, &config) {
            Ok(fp) => println!("{}", fp),
            Err(err) => {
                eprintln!("fingerprint failed: {}", err);
                std::process::exit(1);
            }
        }
    }
}
