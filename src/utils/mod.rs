pub mod hex_serde;
pub mod permutation;
pub mod serialization;

pub use permutation::ColorPermutation;
