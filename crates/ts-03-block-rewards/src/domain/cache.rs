//! # Epoch-Scoped Memo Caches
//!
//! Voting rosters and delegator share maps are pure functions of
//! finalized epoch state, so entries never go stale; only capacity
//! evicts them.
//!
//! ## Concurrency
//!
//! Values are computed outside the lock. Two callers missing the same key
//! may both compute it; the second insert overwrites an equal value.

use crate::domain::errors::RewardResult;
use crate::domain::roster::VotingRoster;
use crate::domain::snapshot::{DelegatorShares, ValidatorSnapshot};
use crate::ports::outbound::VotingPowerComputer;
use lru::LruCache;
use parking_lot::Mutex;
use shared_types::{Address, Committee, Dec, Epoch, ShardId};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::info;

/// Bounded LRU memo handing out shared values.
pub struct LruMemo<K: Hash + Eq, V> {
    inner: Mutex<LruCache<K, Arc<V>>>,
}

impl<K: Hash + Eq, V> LruMemo<K, V> {
    /// Create with `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.inner.lock().put(key, value.clone());
        value
    }

    /// Cached value for `key`, or compute and store it.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Voting rosters keyed by (epoch, shard).
pub struct VotingPowerCache {
    memo: LruMemo<(Epoch, ShardId), VotingRoster>,
    computer: Arc<dyn VotingPowerComputer>,
}

impl VotingPowerCache {
    pub fn new(capacity: usize, computer: Arc<dyn VotingPowerComputer>) -> Self {
        Self {
            memo: LruMemo::new(capacity),
            computer,
        }
    }

    /// Roster for `committee` at `epoch`, computed on miss.
    pub fn lookup(&self, epoch: Epoch, committee: &Committee) -> RewardResult<Arc<VotingRoster>> {
        self.memo
            .get_or_try_insert_with((epoch, committee.shard_id), || {
                self.computer
                    .compute(committee, epoch)
                    .map_err(Into::into)
            })
    }

    /// Pre-seed a roster, e.g. one computed elsewhere.
    pub fn seed(&self, roster: VotingRoster) {
        self.memo.insert((roster.epoch, roster.shard_id), roster);
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

/// Delegator share maps keyed by (epoch, validator).
pub struct DelegatorShareCache {
    memo: LruMemo<(Epoch, Address), DelegatorShares>,
}

impl DelegatorShareCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            memo: LruMemo::new(capacity),
        }
    }

    /// Each delegator's `amount / total_delegation`.
    ///
    /// A validator with zero total delegation gets an empty map, which is
    /// not cached.
    ///
    /// # Errors
    /// * `Chain(State)` if the total delegation overflows
    pub fn lookup(&self, snapshot: &ValidatorSnapshot) -> RewardResult<Arc<DelegatorShares>> {
        let key = (snapshot.epoch, snapshot.address);
        if let Some(hit) = self.memo.get(&key) {
            return Ok(hit);
        }

        let total = Dec::from_int(snapshot.total_delegation()?);
        if total.is_zero() {
            info!(
                validator = %hex::encode(snapshot.address),
                epoch = snapshot.epoch,
                "[ts-03] zero total delegation during AddReward delegation payout"
            );
            return Ok(Arc::new(DelegatorShares::new()));
        }

        let mut shares = DelegatorShares::new();
        for delegation in &snapshot.delegations {
            let percentage = Dec::from_int(delegation.amount)
                .checked_quo(total)
                .unwrap_or_default();
            // repeated delegator entries accumulate
            let entry = shares.entry(delegation.delegator_address).or_default();
            *entry = entry.add(percentage);
        }
        Ok(self.memo.insert(key, shares))
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::Delegation;
    use shared_types::ChainError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingComputer {
        calls: AtomicUsize,
    }

    impl VotingPowerComputer for CountingComputer {
        fn compute(
            &self,
            committee: &Committee,
            epoch: Epoch,
        ) -> Result<VotingRoster, ChainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(VotingRoster::new(epoch, committee.shard_id))
        }
    }

    struct FailingComputer;

    impl VotingPowerComputer for FailingComputer {
        fn compute(&self, _: &Committee, epoch: Epoch) -> Result<VotingRoster, ChainError> {
            Err(ChainError::ShardStateUnavailable {
                epoch,
                reason: "pruned".into(),
            })
        }
    }

    fn snapshot(amounts: &[u128]) -> ValidatorSnapshot {
        ValidatorSnapshot {
            epoch: 5,
            address: [9; 20],
            commission_rate: Dec::zero(),
            delegations: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| Delegation {
                    delegator_address: [i as u8; 20],
                    amount: *amount,
                })
                .collect(),
        }
    }

    #[test]
    fn test_memo_evicts_least_recent() {
        let memo: LruMemo<u32, u32> = LruMemo::new(2);
        memo.insert(1, 10);
        memo.insert(2, 20);
        assert!(memo.get(&1).is_some());
        memo.insert(3, 30);
        assert!(memo.get(&2).is_none());
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let memo: LruMemo<u32, u32> = LruMemo::new(0);
        memo.insert(1, 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_voting_power_computed_once_per_epoch_and_shard() {
        let computer = Arc::new(CountingComputer {
            calls: AtomicUsize::new(0),
        });
        let cache = VotingPowerCache::new(16, computer.clone());
        let committee = Committee::new(1, vec![]);

        cache.lookup(3, &committee).unwrap();
        cache.lookup(3, &committee).unwrap();
        cache.lookup(4, &committee).unwrap();

        assert_eq!(computer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_seeded_roster_skips_computation() {
        let computer = Arc::new(CountingComputer {
            calls: AtomicUsize::new(0),
        });
        let cache = VotingPowerCache::new(16, computer.clone());
        cache.seed(VotingRoster::new(7, 2));

        let roster = cache.lookup(7, &Committee::new(2, vec![])).unwrap();
        assert_eq!(roster.shard_id, 2);
        assert_eq!(computer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_compute_failure_is_not_cached() {
        let cache = VotingPowerCache::new(16, Arc::new(FailingComputer));
        let err = cache.lookup(3, &Committee::new(1, vec![])).unwrap_err();
        assert!(matches!(err, crate::domain::RewardError::Chain(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delegator_shares_are_fractions_of_total() {
        let cache = DelegatorShareCache::new(1024);
        let shares = cache.lookup(&snapshot(&[300, 100])).unwrap();

        assert_eq!(shares[&[0u8; 20]], Dec::new_with_prec(75, 2));
        assert_eq!(shares[&[1u8; 20]], Dec::new_with_prec(25, 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_total_delegation_is_empty_and_uncached() {
        let cache = DelegatorShareCache::new(1024);
        let shares = cache.lookup(&snapshot(&[0, 0])).unwrap();
        assert!(shares.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_repeated_delegator_shares_are_summed() {
        let cache = DelegatorShareCache::new(1024);
        let mut snap = snapshot(&[100, 50, 50]);
        snap.delegations[2].delegator_address = [1; 20];

        let shares = cache.lookup(&snap).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[&[1u8; 20]], Dec::new_with_prec(5, 1));
    }

    #[test]
    fn test_total_delegation_overflow_is_error() {
        let cache = DelegatorShareCache::new(1024);
        let err = cache.lookup(&snapshot(&[u128::MAX, 1])).unwrap_err();
        assert!(matches!(
            err,
            crate::domain::RewardError::Chain(ChainError::State(_))
        ));
        assert!(cache.is_empty());
    }
}
