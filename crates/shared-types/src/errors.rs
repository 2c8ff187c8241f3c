//! # Error Types
//!
//! Errors raised by chain collaborators (header store, shard state reader,
//! validator snapshot reader, state database). Subsystems propagate these
//! unchanged.

use crate::entities::{Epoch, ShardId};
use thiserror::Error;

/// Lookup and IO failures from chain collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Header not present in the chain database.
    #[error("Block header not found: {0}")]
    HeaderNotFound(String),

    /// Shard state for the epoch could not be read.
    #[error("Cannot read shard state at epoch {epoch}: {reason}")]
    ShardStateUnavailable { epoch: Epoch, reason: String },

    /// The epoch's shard state has no committee for the shard.
    #[error("Committee for shard {shard_id} not found in epoch {epoch}")]
    CommitteeNotFound { shard_id: ShardId, epoch: Epoch },

    /// No validator snapshot stored for the address.
    #[error("Validator snapshot not found: {0}")]
    SnapshotNotFound(String),

    /// Cross-link list in a header failed to decode.
    #[error("Cross-link decoding failed: {0}")]
    CrossLinkDecode(String),

    /// State database rejected a mutation.
    #[error("State error: {0}")]
    State(String),
}
