use crate::crypto::{CommitmentScheme, HashAlgorithm, NONCE_LEN};
use crate::error::{ProtocolError, Result};
use crate::graph::DEFAULT_EDGE_PROBABILITY;
use crate::protocol::ProverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub nodes: u32,
    pub rounds: u32,
    pub edge_probability: f64,
    pub nonce_len: usize,
    pub hash: HashAlgorithm,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            nodes: 20,
            rounds: 400,
            edge_probability: DEFAULT_EDGE_PROBABILITY,
            nonce_len: NONCE_LEN,
            hash: HashAlgorithm::default(),
            parallel: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)
            .map_err(|err| ProtocolError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes == 0 {
            return Err(ProtocolError::InvalidConfig("nodes must be at least 1".into()));
        }
        if self.rounds == 0 {
            return Err(ProtocolError::InvalidConfig("rounds must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.edge_probability) {
            return Err(ProtocolError::InvalidConfig(format!(
                "edge_probability {} outside [0, 1]",
                self.edge_probability
            )));
        }
        if self.nonce_len == 0 {
            return Err(ProtocolError::InvalidConfig("nonce_len must be positive".into()));
        }
        Ok(())
    }

    pub fn prover_config(&self) -> ProverConfig {
        ProverConfig {
            nonce_len: self.nonce_len,
            scheme: CommitmentScheme::new(self.hash),
        }
    }
}
