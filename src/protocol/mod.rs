pub mod messages;
pub mod prover;
pub mod runner;
pub mod verifier;

pub use messages::{
    Challenge, CommitmentTable, NodeOpening, Opening, Rejection, RoundVerdict, Statistics,
};
pub use prover::{CommittedRound, Prover, ProverConfig};
pub use runner::{run_parallel, run_sequential, ProtocolRunner, RoundRecord, RunnerState};
pub use verifier::Verifier;
