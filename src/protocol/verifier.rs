use crate::crypto::{CommitmentScheme, Pledge};
use crate::error::{ProtocolError, Result};
use crate::graph::{ColoredGraph, Edge};
use crate::protocol::messages::{
    Challenge, CommitmentTable, NodeOpening, Opening, Rejection, RoundVerdict, Statistics,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Table received this round and the challenge issued against it.
struct PendingChallenge {
    table: CommitmentTable,
    challenge: Challenge,
}

pub struct Verifier<'g, R = StdRng> {
    graph: &'g ColoredGraph,
    scheme: CommitmentScheme,
    rng: R,
    statistics: Statistics,
    pending: Option<PendingChallenge>,
    last_replayed: Option<u64>,
    replayed_pledges: HashSet<Pledge>,
}

impl<'g> Verifier<'g, StdRng> {
    pub fn new(graph: &'g ColoredGraph, scheme: CommitmentScheme) -> Self {
        Verifier::with_rng(graph, scheme, StdRng::from_os_rng())
    }
}

impl<'g, R: Rng> Verifier<'g, R> {
    pub fn with_rng(graph: &'g ColoredGraph, scheme: CommitmentScheme, rng: R) -> Self {
        Verifier {
            graph,
            scheme,
            rng,
            statistics: Statistics::default(),
            pending: None,
            last_replayed: None,
            replayed_pledges: HashSet::new(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Picks an edge uniformly from the edge list and remembers the table it
    /// was issued against. A new challenge replaces any pending one.
    pub fn choose_challenge(&mut self, table: &CommitmentTable) -> Result<Challenge> {
        self.check_table(table)?;
        let edges = self.graph.edges();
        if edges.is_empty() {
            return Err(ProtocolError::NoChallengeableEdge);
        }
        let edge = edges[self.rng.random_range(0..edges.len())];
        self.issue_challenge(table, edge)
    }

    /// Challenges a specific edge of the graph instead of a random one.
    pub fn issue_challenge(&mut self, table: &CommitmentTable, edge: Edge) -> Result<Challenge> {
        self.check_table(table)?;
        if !self.graph.has_edge(edge.from, edge.to) {
            return Err(ProtocolError::NotAnEdge {
                from: edge.from,
                to: edge.to,
            });
        }
        let challenge = Challenge {
            round: table.round,
            edge: Edge::new(edge.from, edge.to),
        };
        debug!(
            round = table.round,
            from = challenge.edge.from,
            to = challenge.edge.to,
            "verifier challenged edge"
        );
        self.pending = Some(PendingChallenge {
            table: table.clone(),
            challenge,
        });
        Ok(challenge)
    }

    /// Checks the opening of the pending challenge. Accepts when both pledges
    /// open and the two colours differ. The pending challenge is consumed
    /// whatever the outcome, so each issued challenge is checked at most once.
    pub fn check_round(
        &mut self,
        table: &CommitmentTable,
        challenge: &Challenge,
        opening: &Opening,
    ) -> Result<RoundVerdict> {
        let pending = self.pending.take().ok_or(ProtocolError::NoPendingChallenge)?;
        if pending.table != *table {
            return Err(ProtocolError::TableMismatch {
                expected: pending.table.round,
                found: table.round,
            });
        }
        if pending.challenge != *challenge {
            return Err(ProtocolError::ChallengeMismatch {
                from: pending.challenge.edge.from,
                to: pending.challenge.edge.to,
                found_from: challenge.edge.from,
                found_to: challenge.edge.to,
            });
        }
        self.evaluate(table, challenge, opening)
    }

    /// Re-checks a recorded round. Rounds must arrive in strictly increasing
    /// order and no pledge may appear in two rounds.
    pub fn replay_round(
        &mut self,
        table: &CommitmentTable,
        challenge: &Challenge,
        opening: &Opening,
    ) -> Result<RoundVerdict> {
        if let Some(previous) = self.last_replayed {
            if table.round <= previous {
                return Err(ProtocolError::RoundOutOfOrder {
                    previous,
                    found: table.round,
                });
            }
        }
        self.check_table(table)?;
        for (node, pledge) in table.pledges.iter().enumerate() {
            if self.replayed_pledges.contains(pledge) {
                return Err(ProtocolError::ReusedPledge {
                    round: table.round,
                    node: node as u32,
                });
            }
        }
        let verdict = self.evaluate(table, challenge, opening)?;
        self.replayed_pledges.extend(table.pledges.iter().copied());
        self.last_replayed = Some(table.round);
        Ok(verdict)
    }

    fn evaluate(
        &mut self,
        table: &CommitmentTable,
        challenge: &Challenge,
        opening: &Opening,
    ) -> Result<RoundVerdict> {
        self.check_table(table)?;
        for found in [challenge.round, opening.round] {
            if found != table.round {
                return Err(ProtocolError::StaleRound {
                    expected: table.round,
                    found,
                });
            }
        }
        let edge = challenge.edge;
        if !self.graph.has_edge(edge.from, edge.to) {
            return Err(ProtocolError::NotAnEdge {
                from: edge.from,
                to: edge.to,
            });
        }
        if opening.from.node != edge.from || opening.to.node != edge.to {
            return Err(ProtocolError::OpeningMismatch {
                from: edge.from,
                to: edge.to,
                found_from: opening.from.node,
                found_to: opening.to.node,
            });
        }

        let verdict = if !self.opens(table, &opening.from) {
            RoundVerdict::Rejected(Rejection::FromPledgeMismatch)
        } else if !self.opens(table, &opening.to) {
            RoundVerdict::Rejected(Rejection::ToPledgeMismatch)
        } else if opening.from.color == opening.to.color {
            RoundVerdict::Rejected(Rejection::SameColor)
        } else {
            RoundVerdict::Accepted
        };

        if let RoundVerdict::Rejected(reason) = verdict {
            warn!(round = table.round, from = edge.from, to = edge.to, %reason, "round rejected");
        }
        self.statistics.record(verdict);
        Ok(verdict)
    }

    fn opens(&self, table: &CommitmentTable, opened: &NodeOpening) -> bool {
        table
            .get(opened.node)
            .is_some_and(|pledge| self.scheme.verify(opened.color, &opened.nonce, pledge))
    }

    fn check_table(&self, table: &CommitmentTable) -> Result<()> {
        let expected = self.graph.size() as usize;
        if table.len() != expected {
            return Err(ProtocolError::TableSizeMismatch {
                expected,
                found: table.len(),
            });
        }
        Ok(())
    }
}
