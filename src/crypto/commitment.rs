use crate::crypto::hash::{HashAlgorithm, DIGEST_LEN};
use crate::graph::Color;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Nonce length in bytes. The pledge hiding property rests on these bytes.
pub const NONCE_LEN: usize = 128;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce(#[serde(with = "crate::utils::hex_serde::bytes")] Vec<u8>);

impl Nonce {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rng.fill_bytes(&mut bytes);
        Nonce(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Nonce(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Keep nonces out of logs.
impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({} bytes)", self.0.len())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pledge(#[serde(with = "crate::utils::hex_serde::array")] [u8; DIGEST_LEN]);

impl Pledge {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Pledge(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Pledge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_hex();
        write!(f, "Pledge({}…)", &encoded[..16])
    }
}

/// Hash commitment `H(name(colour) || nonce)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentScheme {
    algorithm: HashAlgorithm,
}

impl CommitmentScheme {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        CommitmentScheme { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn commit(&self, color: Color, nonce: &Nonce) -> Pledge {
        let digest = self
            .algorithm
            .hasher()
            .hash_with_salt(nonce.as_bytes(), color.name().as_bytes());
        Pledge(digest)
    }

    pub fn verify(&self, color: Color, nonce: &Nonce, pledge: &Pledge) -> bool {
        let expected = self.commit(color, nonce);
        expected.0[..].ct_eq(&pledge.0[..]).into()
    }

    pub fn pledge_coloring(&self, colors: &[Color], nonces: &[Nonce]) -> Vec<Pledge> {
        colors
            .iter()
            .zip(nonces)
            .map(|(&color, nonce)| self.commit(color, nonce))
            .collect()
    }
}
