//! Round state read by message construction

use serde::{Deserialize, Serialize};
use shared_types::{Hash, ShardId};

/// The consensus round a node is currently voting in.
///
/// Owned by the consensus loop; message construction only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    pub view_id: u64,
    pub block_num: u64,
    pub shard_id: ShardId,
    /// 32-byte hash of the block being agreed on.
    pub block_hash: Hash,
    /// Encoded block body; attached to `Prepared` messages.
    pub block: Vec<u8>,
}

impl RoundContext {
    pub fn new(view_id: u64, block_num: u64, shard_id: ShardId, block_hash: Hash) -> Self {
        Self {
            view_id,
            block_num,
            shard_id,
            block_hash,
            block: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: Vec<u8>) -> Self {
        self.block = block;
        self
    }
}
