//! # Domain Layer
//!
//! Reward settlement entities, the reward schedule and the memoizing
//! lookups. No I/O.

pub mod cache;
pub mod errors;
pub mod payout;
pub mod roster;
pub mod schedule;
pub mod snapshot;

pub use cache::{DelegatorShareCache, LruMemo, VotingPowerCache};
pub use errors::{RewardError, RewardResult};
pub use payout::{PayoutRecord, RewardSettlement};
pub use roster::{Voter, VotingRoster};
pub use schedule::{BlockRewardPolicy, FlatRateSchedule};
pub use snapshot::{Delegation, DelegatorShares, ValidatorSnapshot};
