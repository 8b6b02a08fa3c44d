use std::fmt;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::algorithm::AlgorithmId;

#[derive(Clone)]
enum Hasher {
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

/// Incremental digest over one of the supported algorithms.
#[derive(Clone)]
pub struct DigestContext {
    algorithm: AlgorithmId,
    hasher: Hasher,
}

impl DigestContext {
    /// Starts a new digest.
    pub fn new(algorithm: AlgorithmId) -> Self {
        let hasher = match algorithm {
            AlgorithmId::Md5 => Hasher::Md5(Md5::new()),
            AlgorithmId::Sha1 => Hasher::Sha1(Sha1::new()),
            AlgorithmId::Sha224 => Hasher::Sha224(Sha224::new()),
            AlgorithmId::Sha256 => Hasher::Sha256(Sha256::new()),
            AlgorithmId::Sha384 => Hasher::Sha384(Sha384::new()),
            AlgorithmId::Sha512 => Hasher::Sha512(Sha512::new()),
        };
        Self { algorithm, hasher }
    }

    /// Algorithm this context computes.
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Feeds more bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        match &mut self.hasher {
            Hasher::Md5(h) => Digest::update(h, bytes),
            Hasher::Sha1(h) => Digest::update(h, bytes),
            Hasher::Sha224(h) => Digest::update(h, bytes),
            Hasher::Sha256(h) => Digest::update(h, bytes),
            Hasher::Sha384(h) => Digest::update(h, bytes),
            Hasher::Sha512(h) => Digest::update(h, bytes),
        }
    }

    /// Consumes the context and returns the raw digest bytes.
    pub fn finalize(self) -> Vec<u8> {
        match self.hasher {
            Hasher::Md5(h) => h.finalize().to_vec(),
            Hasher::Sha1(h) => h.finalize().to_vec(),
            Hasher::Sha224(h) => h.finalize().to_vec(),
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha384(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

impl fmt::Debug for DigestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestContext")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// One-shot digest of `bytes`.
pub fn digest(algorithm: AlgorithmId, bytes: &[u8]) -> Vec<u8> {
    let mut context = DigestContext::new(algorithm);
    context.update(bytes);
    context.finalize()
}
