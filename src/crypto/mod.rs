pub mod commitment;
pub mod hash;

pub use commitment::{CommitmentScheme, Nonce, Pledge, NONCE_LEN};
pub use hash::{Blake3PledgeHash, HashAlgorithm, PledgeHash, Sha3PledgeHash, DIGEST_LEN};
