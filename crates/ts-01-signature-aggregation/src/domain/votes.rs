//! # Vote Pool
//!
//! Individual prepare/commit votes received from committee members during
//! one FBFT round, keyed by committee index. Aggregation reads the pool in
//! ascending index order so every node combining the same votes produces
//! the same signature and bitmap bytes.

use super::bitmap::ParticipationBitmap;
use super::bls::aggregate_signatures;
use super::errors::AggregationError;
use crate::ports::outbound::QuorumVotes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{BlsPublicKey, BlsSignature};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Voting phases whose individual votes are collected and later combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotePhase {
    Prepare,
    Commit,
}

/// Combined signature over the collected votes plus who contributed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedVotes {
    pub signature: BlsSignature,
    pub bitmap: ParticipationBitmap,
}

impl AggregatedVotes {
    /// Signature bytes followed by bitmap bytes.
    pub fn to_payload(&self) -> Vec<u8> {
        let bitmap = self.bitmap.as_bytes();
        let mut payload = Vec::with_capacity(self.signature.0.len() + bitmap.len());
        payload.extend_from_slice(self.signature.as_bytes());
        payload.extend_from_slice(bitmap);
        payload
    }
}

/// In-memory vote store for one round's committee.
pub struct VotePool {
    participants: Vec<BlsPublicKey>,
    votes: RwLock<HashMap<VotePhase, BTreeMap<usize, BlsSignature>>>,
}

impl VotePool {
    pub fn new(participants: Vec<BlsPublicKey>) -> Self {
        Self {
            participants,
            votes: RwLock::new(HashMap::new()),
        }
    }

    /// Record `signature` from `voter` for `phase`.
    ///
    /// Returns `false` if the voter already voted in this phase; the first
    /// vote is kept.
    ///
    /// # Errors
    /// * `NotInCommittee` if `voter` is not a participant
    pub fn add_vote(
        &self,
        phase: VotePhase,
        voter: &BlsPublicKey,
        signature: BlsSignature,
    ) -> Result<bool, AggregationError> {
        let index = self
            .participants
            .iter()
            .position(|key| key == voter)
            .ok_or_else(|| AggregationError::NotInCommittee {
                key: voter.to_hex(),
            })?;

        let mut votes = self.votes.write();
        let phase_votes = votes.entry(phase).or_default();
        if phase_votes.contains_key(&index) {
            return Ok(false);
        }
        phase_votes.insert(index, signature);
        Ok(true)
    }

    pub fn vote_count(&self, phase: VotePhase) -> usize {
        self.votes.read().get(&phase).map_or(0, BTreeMap::len)
    }

    /// Drop all votes, e.g. when a new round starts.
    pub fn clear(&self) {
        self.votes.write().clear();
    }
}

impl QuorumVotes for VotePool {
    fn participants(&self) -> Vec<BlsPublicKey> {
        self.participants.clone()
    }

    fn aggregate_votes(&self, phase: VotePhase) -> Result<AggregatedVotes, AggregationError> {
        let (indices, signatures): (Vec<usize>, Vec<BlsSignature>) = {
            let votes = self.votes.read();
            votes
                .get(&phase)
                .map(|phase_votes| phase_votes.iter().map(|(i, sig)| (*i, *sig)).unzip())
                .unwrap_or_default()
        };

        let signature = aggregate_signatures(&signatures)?;
        let mut bitmap = ParticipationBitmap::new(self.participants.clone());
        for index in indices {
            bitmap.set_index(index, true)?;
        }

        debug!(
            ?phase,
            votes = bitmap.count_enabled(),
            committee = bitmap.len(),
            "Aggregated collected votes"
        );
        Ok(AggregatedVotes { signature, bitmap })
    }
}
