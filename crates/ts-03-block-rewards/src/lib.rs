//! # Block Reward Subsystem (TS-03)
//!
//! Mints the block reward and credits it to the validators whose
//! signatures committed the parent block, weighted by voting power.
//!
//! ## Eras
//!
//! | Era | Who is paid | How |
//! |-----|-------------|-----|
//! | Genesis | nobody | - |
//! | Pre-staking | signers of the header's own shard | flat split, exact sum |
//! | Staking, beacon chain | cross-link committees, then the beacon committee | proportional to voting power |
//! | Staking, other shards | nobody (paid later via cross-links) | - |
//!
//! Settlement never starts before the header's commit signatures are final;
//! see [`readiness`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ts_03_block_rewards::{CommitSigsSignal, RewardAccumulator, RewardConfig, RewardSettlementApi};
//!
//! let accumulator = RewardAccumulator::new(RewardConfig::default(), computer);
//! let (notifier, signal) = CommitSigsSignal::channel();
//! // ... producer calls notifier.notify(true) once the commit bitmap is final
//! let settlement = accumulator
//!     .accumulate_rewards_and_count_sigs(&chain, &mut state, &header, &beacon, signal)
//!     .await?;
//! ```

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
mod plan;
pub mod ports;
pub mod readiness;
pub mod service;

pub use adapters::{InMemoryChain, InMemoryRewardState, SigningCounts, StakeWeightedVotingPower};
pub use algorithms::{
    ballot_result, block_signers, flat_split, increment_validator_signing_counts,
    signing_count_updates, BallotResult, CommitteeRewardResolver, IndexedSlot, ShareRounding,
    SignerDue,
};
pub use config::RewardConfig;
pub use domain::{
    BlockRewardPolicy, Delegation, DelegatorShareCache, DelegatorShares, FlatRateSchedule,
    LruMemo, PayoutRecord, RewardError, RewardResult, RewardSettlement, ValidatorSnapshot, Voter,
    VotingPowerCache, VotingRoster,
};
pub use ports::{ChainReader, RewardSettlementApi, RewardState, VotingPowerComputer};
pub use readiness::{CommitSigsNotifier, CommitSigsOutcome, CommitSigsSignal};
pub use service::RewardAccumulator;
