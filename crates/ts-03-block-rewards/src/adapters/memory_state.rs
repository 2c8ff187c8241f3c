//! # In-Memory Reward State
//!
//! Delegation payout:
//! 1. The operator keeps `commission_rate * reward` (rounded)
//! 2. The remainder is split by delegator share (truncated)
//! 3. Truncation dust goes to the operator
//!
//! The operator is the snapshot's first delegation (self-delegation).

use crate::domain::snapshot::{DelegatorShares, ValidatorSnapshot};
use crate::ports::outbound::RewardState;
use shared_types::{Address, Amount, ChainError};
use std::collections::{BTreeMap, HashMap};

/// Signed and expected block signatures of one validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningCounts {
    pub signed: u64,
    pub to_sign: u64,
}

/// In-memory state database.
#[derive(Debug, Default)]
pub struct InMemoryRewardState {
    balances: HashMap<Address, Amount>,
    /// Pending delegation rewards, by (validator, delegator).
    delegation_rewards: BTreeMap<(Address, Address), Amount>,
    signing: HashMap<Address, SigningCounts>,
}

impl InMemoryRewardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn delegation_reward(&self, validator: &Address, delegator: &Address) -> Amount {
        self.delegation_rewards
            .get(&(*validator, *delegator))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all pending delegation rewards of a validator.
    pub fn validator_reward(&self, validator: &Address) -> Amount {
        self.delegation_rewards
            .iter()
            .filter(|((v, _), _)| v == validator)
            .fold(0, |acc: Amount, (_, amount)| acc.saturating_add(*amount))
    }

    pub fn signing_counts(&self, validator: &Address) -> SigningCounts {
        self.signing.get(validator).copied().unwrap_or_default()
    }

    /// True if nothing was ever written.
    pub fn is_untouched(&self) -> bool {
        self.balances.is_empty() && self.delegation_rewards.is_empty() && self.signing.is_empty()
    }

    fn credit_delegation(&mut self, validator: Address, delegator: Address, amount: Amount) {
        let entry = self
            .delegation_rewards
            .entry((validator, delegator))
            .or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

impl RewardState for InMemoryRewardState {
    fn add_reward(
        &mut self,
        snapshot: &ValidatorSnapshot,
        amount: Amount,
        shares: &DelegatorShares,
    ) -> Result<(), ChainError> {
        let validator = snapshot.address;
        let operator = snapshot.operator();

        let commission = snapshot
            .commission_rate
            .mul_int(amount)
            .round_int()
            .min(amount);
        let pool = amount - commission;

        // one entry per delegator; repeated delegations are already summed
        let mut split: Vec<(Address, Amount)> = Vec::with_capacity(shares.len());
        let mut paid: Amount = 0;
        for (delegator, share) in shares {
            let reward = share.mul_int(pool).truncate_int();
            paid = paid.saturating_add(reward);
            split.push((*delegator, reward));
        }

        if paid > pool {
            return Err(ChainError::State(format!(
                "delegator payout {} exceeds reward pool {} for validator {}",
                paid,
                pool,
                hex::encode(validator)
            )));
        }

        for (delegator, reward) in split {
            self.credit_delegation(validator, delegator, reward);
        }
        self.credit_delegation(validator, operator, commission + (pool - paid));
        Ok(())
    }

    fn add_balance(&mut self, address: Address, amount: Amount) -> Result<(), ChainError> {
        let balance = self.balances.entry(address).or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(|| {
            ChainError::State(format!("balance overflow for {}", hex::encode(address)))
        })?;
        Ok(())
    }

    fn increment_signing_counts(
        &mut self,
        validator: Address,
        signed: bool,
    ) -> Result<(), ChainError> {
        let counts = self.signing.entry(validator).or_default();
        counts.to_sign += 1;
        if signed {
            counts.signed += 1;
        }
        Ok(())
    }
}
