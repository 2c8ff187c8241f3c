//! Validator delegation snapshots.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainError, Dec, Epoch};
use std::collections::BTreeMap;

/// Delegator address to fraction of the validator's total delegation.
pub type DelegatorShares = BTreeMap<Address, Dec>;

/// One delegation to a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: Address,
    pub amount: Amount,
}

/// A validator's delegations as of one epoch. Immutable once taken.
///
/// The first delegation is the operator's self-delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSnapshot {
    pub epoch: Epoch,
    pub address: Address,
    /// Fraction of each reward kept by the operator before delegator split.
    pub commission_rate: Dec,
    pub delegations: Vec<Delegation>,
}

impl ValidatorSnapshot {
    /// Sum of all delegated amounts.
    ///
    /// # Errors
    /// * `State` if the sum overflows
    pub fn total_delegation(&self) -> Result<Amount, ChainError> {
        self.delegations
            .iter()
            .try_fold(0, |acc: Amount, d| acc.checked_add(d.amount))
            .ok_or_else(|| {
                ChainError::State(format!(
                    "total delegation overflow for validator {}",
                    hex::encode(self.address)
                ))
            })
    }

    /// Address credited with commission and rounding dust.
    pub fn operator(&self) -> Address {
        self.delegations
            .first()
            .map_or(self.address, |d| d.delegator_address)
    }
}
