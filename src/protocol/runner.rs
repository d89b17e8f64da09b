use crate::error::Result;
use crate::graph::ColoredGraph;
use crate::protocol::messages::{Challenge, CommitmentTable, Opening, RoundVerdict, Statistics};
use crate::protocol::prover::{Prover, ProverConfig};
use crate::protocol::verifier::Verifier;
use rand::{CryptoRng, Rng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    RoundStart,
    Committed,
    Challenged,
    Verified,
    Done,
}

/// Everything exchanged during one round, handed to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub table: CommitmentTable,
    pub challenge: Challenge,
    pub opening: Opening,
    pub verdict: RoundVerdict,
}

pub struct ProtocolRunner<'g, P, V> {
    prover: Prover<'g, P>,
    verifier: Verifier<'g, V>,
    rounds: u32,
    state: RunnerState,
}

impl<'g, P, V> ProtocolRunner<'g, P, V>
where
    P: RngCore + CryptoRng,
    V: Rng,
{
    pub fn new(prover: Prover<'g, P>, verifier: Verifier<'g, V>, rounds: u32) -> Self {
        ProtocolRunner {
            prover,
            verifier,
            rounds,
            state: RunnerState::Idle,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn statistics(&self) -> Statistics {
        self.verifier.statistics()
    }

    pub fn run(&mut self) -> Result<Statistics> {
        self.run_with(|_| {})
    }

    pub fn run_with<F>(&mut self, mut observer: F) -> Result<Statistics>
    where
        F: FnMut(&RoundRecord),
    {
        for _ in 0..self.rounds {
            let record = self.run_round()?;
            observer(&record);
        }
        self.transition(RunnerState::Done);
        let statistics = self.verifier.statistics();
        info!(rounds = self.rounds, %statistics, "protocol run finished");
        Ok(statistics)
    }

    fn run_round(&mut self) -> Result<RoundRecord> {
        self.transition(RunnerState::RoundStart);
        let committed = self.prover.commit_round();
        let table = committed.table().clone();
        self.transition(RunnerState::Committed);

        let challenge = self.verifier.choose_challenge(&table)?;
        self.transition(RunnerState::Challenged);

        let opening = committed.open_edge(&challenge)?;
        let verdict = self.verifier.check_round(&table, &challenge, &opening)?;
        self.transition(RunnerState::Verified);

        Ok(RoundRecord {
            round: table.round,
            table,
            challenge,
            opening,
            verdict,
        })
    }

    fn transition(&mut self, next: RunnerState) {
        trace!(from = ?self.state, to = ?next, "runner state change");
        self.state = next;
    }
}

/// Counters shared between rounds running on different threads.
#[derive(Debug, Default)]
pub struct SharedStatistics {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl SharedStatistics {
    pub fn record(&self, verdict: RoundVerdict) {
        let counter = if verdict.is_accepted() {
            &self.accepted
        } else {
            &self.rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Statistics {
        Statistics {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Runs independent rounds on the rayon pool. Each worker split builds one
/// prover and one verifier and reuses them for its rounds; only the graph and
/// the counters are shared between threads.
pub fn run_parallel(
    graph: &ColoredGraph,
    rounds: u32,
    config: ProverConfig,
) -> Result<Statistics> {
    let shared = SharedStatistics::default();
    (0..rounds).into_par_iter().try_for_each_init(
        || (Prover::new(graph, config), Verifier::new(graph, config.scheme)),
        |(prover, verifier), _| -> Result<()> {
            let committed = prover.commit_round();
            let table = committed.table().clone();
            let challenge = verifier.choose_challenge(&table)?;
            let opening = committed.open_edge(&challenge)?;
            let verdict = verifier.check_round(&table, &challenge, &opening)?;
            shared.record(verdict);
            Ok(())
        },
    )?;
    let statistics = shared.snapshot();
    info!(rounds, %statistics, "parallel protocol run finished");
    Ok(statistics)
}

pub fn run_sequential(
    graph: &ColoredGraph,
    rounds: u32,
    config: ProverConfig,
) -> Result<Statistics> {
    let prover = Prover::new(graph, config);
    let verifier = Verifier::new(graph, config.scheme);
    ProtocolRunner::new(prover, verifier, rounds).run()
}

