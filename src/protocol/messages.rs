use crate::crypto::{Nonce, Pledge};
use crate::graph::{Color, Edge};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentTable {
    pub round: u64,
    pub pledges: Vec<Pledge>,
}

impl CommitmentTable {
    pub fn len(&self) -> usize {
        self.pledges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pledges.is_empty()
    }

    pub fn get(&self, node: u32) -> Option<&Pledge> {
        self.pledges.get(node as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub round: u64,
    pub edge: Edge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOpening {
    pub node: u32,
    pub color: Color,
    pub nonce: Nonce,
}

/// Revealed colours and nonces for both endpoints of the challenged edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub round: u64,
    pub from: NodeOpening,
    pub to: NodeOpening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    FromPledgeMismatch,
    ToPledgeMismatch,
    SameColor,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::FromPledgeMismatch => f.write_str("first endpoint does not open its pledge"),
            Rejection::ToPledgeMismatch => f.write_str("second endpoint does not open its pledge"),
            Rejection::SameColor => f.write_str("endpoints share a colour"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundVerdict {
    Accepted,
    Rejected(Rejection),
}

impl RoundVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RoundVerdict::Accepted)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub accepted: u64,
    pub rejected: u64,
}

impl Statistics {
    pub fn record(&mut self, verdict: RoundVerdict) {
        if verdict.is_accepted() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }

    pub fn rounds(&self) -> u64 {
        self.accepted + self.rejected
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{accepted: {}, rejected: {}}}",
            self.accepted, self.rejected
        )
    }
}
