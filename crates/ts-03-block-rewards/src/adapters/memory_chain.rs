//! In-memory chain reader for tests and local tooling.

use crate::domain::snapshot::ValidatorSnapshot;
use crate::ports::outbound::ChainReader;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, BlockHeader, ChainConfig, ChainError, Epoch, Hash, ShardState};
use std::collections::HashMap;

/// Chain data held in maps.
pub struct InMemoryChain {
    config: ChainConfig,
    headers: RwLock<HashMap<Hash, BlockHeader>>,
    shard_states: RwLock<HashMap<Epoch, ShardState>>,
    snapshots: RwLock<HashMap<Address, ValidatorSnapshot>>,
    current: RwLock<Option<BlockHeader>>,
}

impl InMemoryChain {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            headers: RwLock::new(HashMap::new()),
            shard_states: RwLock::new(HashMap::new()),
            snapshots: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
        }
    }

    pub fn insert_header(&self, header: BlockHeader) {
        self.headers.write().insert(header.hash, header);
    }

    /// Store `header` and make it the chain head.
    pub fn set_current_header(&self, header: BlockHeader) {
        self.insert_header(header.clone());
        *self.current.write() = Some(header);
    }

    pub fn insert_shard_state(&self, state: ShardState) {
        self.shard_states.write().insert(state.epoch, state);
    }

    pub fn insert_snapshot(&self, snapshot: ValidatorSnapshot) {
        self.snapshots.write().insert(snapshot.address, snapshot);
    }
}

#[async_trait]
impl ChainReader for InMemoryChain {
    fn config(&self) -> &ChainConfig {
        &self.config
    }

    async fn header_by_hash(&self, hash: &Hash) -> Result<Option<BlockHeader>, ChainError> {
        Ok(self.headers.read().get(hash).cloned())
    }

    async fn read_shard_state(&self, epoch: Epoch) -> Result<ShardState, ChainError> {
        self.shard_states
            .read()
            .get(&epoch)
            .cloned()
            .ok_or_else(|| ChainError::ShardStateUnavailable {
                epoch,
                reason: "not stored".into(),
            })
    }

    async fn read_validator_snapshot(
        &self,
        address: &Address,
    ) -> Result<ValidatorSnapshot, ChainError> {
        self.snapshots
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| ChainError::SnapshotNotFound(hex::encode(address)))
    }

    async fn current_header(&self) -> Result<BlockHeader, ChainError> {
        self.current
            .read()
            .clone()
            .ok_or_else(|| ChainError::HeaderNotFound("current head".into()))
    }
}
