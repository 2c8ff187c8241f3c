//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators owned outside this subsystem. Chain data is read-only
//! during settlement; `RewardState` is the only thing mutated.

use crate::domain::roster::VotingRoster;
use crate::domain::snapshot::{DelegatorShares, ValidatorSnapshot};
use async_trait::async_trait;
use shared_types::{
    Address, Amount, BlockHeader, ChainConfig, ChainError, Committee, Epoch, Hash, ShardState,
};

/// Read access to a shard chain (or the beacon chain).
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fork schedule.
    fn config(&self) -> &ChainConfig;

    /// Header by hash; `None` if not in the database.
    async fn header_by_hash(&self, hash: &Hash) -> Result<Option<BlockHeader>, ChainError>;

    /// Committees elected for `epoch`.
    async fn read_shard_state(&self, epoch: Epoch) -> Result<ShardState, ChainError>;

    /// Delegations of the validator at `address`.
    async fn read_validator_snapshot(
        &self,
        address: &Address,
    ) -> Result<ValidatorSnapshot, ChainError>;

    /// Current head of this chain.
    async fn current_header(&self) -> Result<BlockHeader, ChainError>;
}

/// Account and delegation state mutated by settlement.
pub trait RewardState: Send {
    /// Credit `amount` to the validator, split across its delegators.
    fn add_reward(
        &mut self,
        snapshot: &ValidatorSnapshot,
        amount: Amount,
        shares: &DelegatorShares,
    ) -> Result<(), ChainError>;

    /// Credit `amount` directly to an account balance.
    fn add_balance(&mut self, address: Address, amount: Amount) -> Result<(), ChainError>;

    /// Record one block the validator was expected to sign, and whether it did.
    fn increment_signing_counts(
        &mut self,
        validator: Address,
        signed: bool,
    ) -> Result<(), ChainError>;
}

/// Computes a committee's voting roster from its slots' stake.
pub trait VotingPowerComputer: Send + Sync {
    fn compute(&self, committee: &Committee, epoch: Epoch) -> Result<VotingRoster, ChainError>;
}
