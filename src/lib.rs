pub mod config;
pub mod crypto;
pub mod error;
pub mod graph;
pub mod protocol;
pub mod utils;

pub use config::SimulationConfig;
pub use crypto::*;
pub use error::{ProtocolError, Result};
pub use graph::*;
pub use protocol::{
	messages::{
		Challenge,
		CommitmentTable,
		NodeOpening,
		Opening,
		Rejection,
		RoundVerdict,
		Statistics,
	},
	prover::{CommittedRound, Prover, ProverConfig},
	runner::{run_parallel, run_sequential, ProtocolRunner, RoundRecord, RunnerState, SharedStatistics},
	verifier::Verifier,
};
pub use utils::permutation::ColorPermutation;
