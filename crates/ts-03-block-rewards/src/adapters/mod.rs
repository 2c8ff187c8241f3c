//! # Adapters
//!
//! - `memory_state`: in-memory account/delegation state with commission
//!   and delegator payout
//! - `memory_chain`: in-memory chain reader
//! - `voting_power`: stake-weighted voting power

pub mod memory_chain;
pub mod memory_state;
pub mod voting_power;

pub use memory_chain::InMemoryChain;
pub use memory_state::{InMemoryRewardState, SigningCounts};
pub use voting_power::StakeWeightedVotingPower;
