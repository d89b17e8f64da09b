use crate::crypto::{CommitmentScheme, Nonce, NONCE_LEN};
use crate::error::{ProtocolError, Result};
use crate::graph::{Color, ColoredGraph};
use crate::protocol::messages::{Challenge, CommitmentTable, NodeOpening, Opening};
use crate::utils::permutation::ColorPermutation;
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverConfig {
    pub nonce_len: usize,
    pub scheme: CommitmentScheme,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            nonce_len: NONCE_LEN,
            scheme: CommitmentScheme::default(),
        }
    }
}

/// Holds the real colouring. Both the permutation and the nonces are drawn
/// from `rng`, which must be a cryptographic generator.
pub struct Prover<'g, R = ThreadRng> {
    graph: &'g ColoredGraph,
    config: ProverConfig,
    rng: R,
    next_round: u64,
}

impl<'g> Prover<'g, ThreadRng> {
    pub fn new(graph: &'g ColoredGraph, config: ProverConfig) -> Self {
        Prover::with_rng(graph, config, rand::rng())
    }
}

impl<'g, R: RngCore + CryptoRng> Prover<'g, R> {
    pub fn with_rng(graph: &'g ColoredGraph, config: ProverConfig, rng: R) -> Self {
        Prover {
            graph,
            config,
            rng,
            next_round: 0,
        }
    }

    pub fn commit_round(&mut self) -> CommittedRound {
        let permutation = ColorPermutation::random(&mut self.rng);
        self.commit_with_permutation(permutation)
    }

    pub fn commit_with_permutation(&mut self, permutation: ColorPermutation) -> CommittedRound {
        let round = self.next_round;
        self.next_round += 1;

        let permuted = permutation.apply_all(self.graph.coloring());
        let nonces: Vec<Nonce> = (0..permuted.len())
            .map(|_| Nonce::random(&mut self.rng, self.config.nonce_len))
            .collect();
        let pledges = self.config.scheme.pledge_coloring(&permuted, &nonces);
        debug!(round, nodes = pledges.len(), "prover committed to permuted colouring");

        CommittedRound {
            table: CommitmentTable { round, pledges },
            permuted,
            nonces,
        }
    }
}

/// Secret material of one committed round. Opening consumes it, so a round's
/// nonces and permutation answer exactly one challenge.
pub struct CommittedRound {
    table: CommitmentTable,
    permuted: Vec<Color>,
    nonces: Vec<Nonce>,
}

impl CommittedRound {
    pub fn round(&self) -> u64 {
        self.table.round
    }

    pub fn table(&self) -> &CommitmentTable {
        &self.table
    }

    pub fn open_edge(self, challenge: &Challenge) -> Result<Opening> {
        if challenge.round != self.table.round {
            return Err(ProtocolError::StaleRound {
                expected: self.table.round,
                found: challenge.round,
            });
        }
        let from = self.reveal(challenge.edge.from)?;
        let to = self.reveal(challenge.edge.to)?;
        Ok(Opening {
            round: self.table.round,
            from,
            to,
        })
    }

    fn reveal(&self, node: u32) -> Result<NodeOpening> {
        let index = node as usize;
        if index >= self.permuted.len() {
            return Err(ProtocolError::NodeOutOfRange {
                index: node,
                size: self.permuted.len() as u32,
            });
        }
        Ok(NodeOpening {
            node,
            color: self.permuted[index],
            nonce: self.nonces[index].clone(),
        })
    }
}
