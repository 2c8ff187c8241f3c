//! # Block Reward Schedule
//!
//! Flat-rate block rewards in atto units. Block time forks lower the
//! per-block reward so the yearly issuance stays constant.

use shared_types::{Amount, BlockHeader, ChainConfig};

/// One token in atto units.
pub const ONE: Amount = 1_000_000_000_000_000_000;

/// Per-block reward before staking, split evenly among signers.
pub const PRE_STAKED_BLOCKS: Amount = 24 * ONE;

/// Per-block reward after staking at the base block time.
pub const STAKED_BLOCKS: Amount = 28 * ONE;

/// Per-block reward after the 5 second block time fork.
pub const FIVE_SEC_STAKED_BLOCKS: Amount = 17_500_000_000_000_000_000;

/// Per-block reward after the 2 second block time fork.
pub const TWO_SEC_STAKED_BLOCKS: Amount = 7 * ONE;

/// Chooses the reward minted by a block.
///
/// The staked reward is signed: an adjusted schedule may drive it below
/// zero, which settles nothing rather than failing.
pub trait BlockRewardPolicy: Send + Sync {
    fn staked_block_reward(&self, config: &ChainConfig, header: &BlockHeader) -> i128;

    fn pre_staked_block_reward(&self) -> Amount {
        PRE_STAKED_BLOCKS
    }
}

/// Flat rate by block time fork.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRateSchedule;

impl BlockRewardPolicy for FlatRateSchedule {
    fn staked_block_reward(&self, config: &ChainConfig, header: &BlockHeader) -> i128 {
        let reward = if config.is_two_seconds(header.epoch) {
            TWO_SEC_STAKED_BLOCKS
        } else if config.is_five_seconds(header.epoch) {
            FIVE_SEC_STAKED_BLOCKS
        } else {
            STAKED_BLOCKS
        };
        reward as i128
    }
}
