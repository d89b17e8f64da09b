use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};
use std::fmt;
use std::str::FromStr;

pub const DIGEST_LEN: usize = 64;

pub trait PledgeHash: Send + Sync {
    fn hash(&self, data: &[u8]) -> [u8; DIGEST_LEN];

    fn hash_with_salt(&self, data: &[u8], salt: &[u8]) -> [u8; DIGEST_LEN] {
        let mut buf = Vec::with_capacity(salt.len() + data.len());
        buf.extend_from_slice(salt);
        buf.extend_from_slice(data);
        self.hash(&buf)
    }
}

#[derive(Clone, Copy, Default)]
pub struct Sha3PledgeHash;

impl PledgeHash for Sha3PledgeHash {
    fn hash(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Sha3_512::new();
        hasher.update(data);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

/// BLAKE3 in extendable-output mode, read out to 512 bits.
#[derive(Clone, Copy, Default)]
pub struct Blake3PledgeHash;

impl PledgeHash for Blake3PledgeHash {
    fn hash(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        let mut out = [0u8; DIGEST_LEN];
        hasher.finalize_xof().fill(&mut out);
        out
    }
}

static SHA3: Sha3PledgeHash = Sha3PledgeHash;
static BLAKE3: Blake3PledgeHash = Blake3PledgeHash;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "sha3-512")]
    Sha3_512,
    Blake3,
}

impl HashAlgorithm {
    pub fn hasher(self) -> &'static dyn PledgeHash {
        match self {
            HashAlgorithm::Sha3_512 => &SHA3,
            HashAlgorithm::Blake3 => &BLAKE3,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha3_512 => f.write_str("sha3-512"),
            HashAlgorithm::Blake3 => f.write_str("blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sha3" | "sha3-512" | "sha3_512" => Ok(HashAlgorithm::Sha3_512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!("unknown hash algorithm '{other}'")),
        }
    }
}
