use crate::graph::Color;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("graph size must be at least 1")]
    EmptyGraph,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("node index {index} out of range for graph of size {size}")]
    NodeOutOfRange { index: u32, size: u32 },
    #[error("edge ({0}, {0}) is a self-loop")]
    SelfLoop(u32),
    #[error("edge ({from}, {to}) connects two {color} nodes")]
    MonochromaticEdge { from: u32, to: u32, color: Color },
    #[error("({from}, {to}) is not an edge of the graph")]
    NotAnEdge { from: u32, to: u32 },
    #[error("no challengeable edge: the graph has no edges")]
    NoChallengeableEdge,
    #[error("commitment table has {found} pledges, graph has {expected} nodes")]
    TableSizeMismatch { expected: usize, found: usize },
    #[error("stale round material: expected round {expected}, got round {found}")]
    StaleRound { expected: u64, found: u64 },
    #[error("opening reveals nodes ({found_from}, {found_to}) but ({from}, {to}) was challenged")]
    OpeningMismatch {
        from: u32,
        to: u32,
        found_from: u32,
        found_to: u32,
    },
    #[error("no challenge is pending: choose a challenge before checking a round")]
    NoPendingChallenge,
    #[error("commitment table for round {found} differs from the one challenged in round {expected}")]
    TableMismatch { expected: u64, found: u64 },
    #[error("challenge on ({found_from}, {found_to}) was not issued; pending challenge is ({from}, {to})")]
    ChallengeMismatch {
        from: u32,
        to: u32,
        found_from: u32,
        found_to: u32,
    },
    #[error("round {found} replayed after round {previous}")]
    RoundOutOfOrder { previous: u64, found: u64 },
    #[error("pledge of node {node} in round {round} repeats a pledge from an earlier round")]
    ReusedPledge { round: u64, node: u32 },
    #[error("colour table is not a permutation")]
    InvalidPermutation,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
