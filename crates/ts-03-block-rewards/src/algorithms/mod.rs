//! # Algorithms
//!
//! - `availability`: bitmap to payable/missing slots, signing counts
//! - `resolver`: proportional per-signer dues for one committee
//! - `flat_split`: exact-sum even split for the pre-staking era

pub mod availability;
pub mod flat_split;
pub mod resolver;

pub use availability::{
    ballot_result, block_signers, increment_validator_signing_counts, signing_count_updates,
    BallotResult, IndexedSlot,
};
pub use flat_split::flat_split;
pub use resolver::{CommitteeRewardResolver, ShareRounding, SignerDue};
