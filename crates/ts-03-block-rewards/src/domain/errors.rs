//! # Domain Errors
//!
//! Error types for reward settlement.

use shared_types::{Amount, BlsPublicKey, ChainError, Epoch, ShardId};
use thiserror::Error;
use ts_01_signature_aggregation::AggregationError;

/// Reward settlement error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewardError {
    /// Commit signatures were not ready within the timeout.
    #[error("Timeout waiting for commit sigs for reward calculation after {timeout_ms}ms")]
    CommitSigsTimeout { timeout_ms: u64 },

    /// Producer reported that commit signatures could not be collected.
    #[error("Failed to get commit sigs")]
    CommitSigsFailed,

    /// Flat split did not pay out exactly the block reward.
    #[error("Total paid out {paid} was not equal to block reward {expected}")]
    PayoutMismatch { expected: Amount, paid: Amount },

    /// Signer bitmap inconsistent with its committee.
    #[error("shard {shard_id} block {block_num} reward error with bitmap {bitmap}: {source}")]
    BlockSigners {
        shard_id: ShardId,
        block_num: u64,
        /// Hex of the offending bitmap.
        bitmap: String,
        #[source]
        source: AggregationError,
    },

    /// A payable signer has no entry in the committee's voting roster.
    #[error("No voting power for {key:?} in shard {shard_id} epoch {epoch}")]
    MissingVoter {
        key: BlsPublicKey,
        epoch: Epoch,
        shard_id: ShardId,
    },

    /// Collaborator lookup or state failure, propagated unchanged.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl RewardError {
    /// Transient synchronization failure; the caller may retry the round.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CommitSigsTimeout { .. } | Self::CommitSigsFailed)
    }

    /// Invariant violation; block processing must abort.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PayoutMismatch { .. })
    }
}

/// Result type for reward settlement.
pub type RewardResult<T> = Result<T, RewardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_readiness_errors_are_retryable() {
        assert!(RewardError::CommitSigsTimeout { timeout_ms: 9000 }.is_retryable());
        assert!(RewardError::CommitSigsFailed.is_retryable());
        assert!(!RewardError::PayoutMismatch {
            expected: 24,
            paid: 23
        }
        .is_retryable());
        assert!(!RewardError::Chain(ChainError::HeaderNotFound("ab".into())).is_retryable());
    }

    #[test]
    fn test_block_signers_context() {
        let err = RewardError::BlockSigners {
            shard_id: 2,
            block_num: 77,
            bitmap: "ff".into(),
            source: AggregationError::BitmapPadding { committee_size: 3 },
        };
        let message = err.to_string();
        assert!(message.contains("shard 2 block 77"));
        assert!(message.contains("bitmap ff"));
    }
}
