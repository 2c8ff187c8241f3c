//! # Ports Layer
//!
//! - **Inbound**: the settlement entry point block processing drives
//! - **Outbound**: chain reader, state mutator and voting power source

pub mod inbound;
pub mod outbound;

pub use inbound::RewardSettlementApi;
pub use outbound::{ChainReader, RewardState, VotingPowerComputer};
