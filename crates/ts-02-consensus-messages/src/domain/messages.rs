//! Consensus wire messages
//!
//! A message is a `ConsensusEnvelope` (service type, phase, request
//! fields, envelope signature). On the wire it is prefixed with the
//! message category and consensus message type bytes.

use serde::{Deserialize, Serialize};
use shared_types::{BlsPublicKey, BlsSignature, Hash, ShardId, BLS_SIGNATURE_LEN};
use std::fmt;
use ts_01_signature_aggregation::AggregationError;

/// Message category byte for consensus traffic.
pub const CONSENSUS_CATEGORY: u8 = 0x00;

/// Consensus message type byte for regular (non view-change) traffic.
pub const NORMAL_MESSAGE: u8 = 0x00;

/// Service the envelope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    Consensus,
}

/// FBFT message phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Announce,
    Prepare,
    Prepared,
    Commit,
    Committed,
    ViewChange,
    NewView,
}

/// What a phase carries in its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// The proposed block hash.
    BlockHash,
    /// Aggregate signature over the block hash by the signing keys.
    SignedBlockHash,
    /// Aggregate signature over the caller's commit payload.
    SignedCommitPayload,
    /// Aggregate of collected prepare votes followed by their bitmap.
    AggregatedPrepareVotes,
    /// Aggregate of collected commit votes followed by their bitmap.
    AggregatedCommitVotes,
    /// Phase carries no payload here.
    Empty,
}

impl MessageType {
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            Self::Announce => PayloadKind::BlockHash,
            Self::Prepare => PayloadKind::SignedBlockHash,
            Self::Prepared => PayloadKind::AggregatedPrepareVotes,
            Self::Commit => PayloadKind::SignedCommitPayload,
            Self::Committed => PayloadKind::AggregatedCommitVotes,
            Self::ViewChange | Self::NewView => PayloadKind::Empty,
        }
    }

    /// Phases whose payload is `aggregate signature || bitmap`.
    pub fn carries_aggregate(self) -> bool {
        matches!(
            self.payload_kind(),
            PayloadKind::AggregatedPrepareVotes | PayloadKind::AggregatedCommitVotes
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Announce => "ANNOUNCE",
            Self::Prepare => "PREPARE",
            Self::Prepared => "PREPARED",
            Self::Commit => "COMMIT",
            Self::Committed => "COMMITTED",
            Self::ViewChange => "VIEWCHANGE",
            Self::NewView => "NEWVIEW",
        };
        f.write_str(name)
    }
}

/// Who sent a message: one key, or a bitmap over the quorum when a node
/// signs with several keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderIdentity {
    PubKey(BlsPublicKey),
    Bitmap(Vec<u8>),
}

/// Fields common to every consensus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusRequest {
    pub view_id: u64,
    pub block_num: u64,
    pub shard_id: ShardId,
    pub block_hash: Hash,
    pub sender: SenderIdentity,
    pub payload: Vec<u8>,
    /// Block body; only set on `Prepared`.
    pub block: Vec<u8>,
}

/// Signed envelope around a consensus request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusEnvelope {
    pub service_type: ServiceType,
    pub message_type: MessageType,
    pub request: ConsensusRequest,
    /// Aggregate signature by the sender keys over the unsigned encoding.
    /// Empty until signed.
    pub signature: Vec<u8>,
}

impl ConsensusEnvelope {
    pub fn new(message_type: MessageType, request: ConsensusRequest) -> Self {
        Self {
            service_type: ServiceType::Consensus,
            message_type,
            request,
            signature: Vec::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

/// Local view of a consensus message, used for round bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FbftMessage {
    pub message_type: MessageType,
    pub view_id: u64,
    pub block_num: u64,
    pub shard_id: ShardId,
    pub block_hash: Hash,
    pub block: Vec<u8>,
    pub payload: Vec<u8>,
    /// Sender keys, in quorum order.
    pub sender_pubkeys: Vec<BlsPublicKey>,
    /// Raw sender bitmap for multi-key senders.
    pub sender_bitmap: Option<Vec<u8>>,
    /// Aggregate signature split out of a `Prepared`/`Committed` payload.
    pub aggregate_signature: Option<BlsSignature>,
    /// Vote bitmap split out of a `Prepared`/`Committed` payload.
    pub vote_bitmap: Option<Vec<u8>>,
}

impl FbftMessage {
    pub fn has_single_sender(&self) -> bool {
        self.sender_bitmap.is_none()
    }
}

/// A message ready for broadcast to the quorum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkMessage {
    pub phase: MessageType,
    /// Framed wire bytes.
    pub bytes: Vec<u8>,
    pub fbft: FbftMessage,
    /// Set for phases that combine collected votes.
    pub optional_aggregate_signature: Option<BlsSignature>,
}

/// Prefix encoded envelope bytes with the consensus frame header.
pub fn frame_consensus_message(marshaled: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(marshaled.len() + 2);
    bytes.push(CONSENSUS_CATEGORY);
    bytes.push(NORMAL_MESSAGE);
    bytes.extend_from_slice(marshaled);
    bytes
}

/// Strip the consensus frame header.
pub fn unframe_consensus_message(bytes: &[u8]) -> Option<&[u8]> {
    match bytes {
        [CONSENSUS_CATEGORY, NORMAL_MESSAGE, rest @ ..] => Some(rest),
        _ => None,
    }
}

/// Split an `aggregate signature || bitmap` payload.
pub fn split_aggregate_payload(
    payload: &[u8],
) -> Result<(BlsSignature, Vec<u8>), AggregationError> {
    if payload.len() < BLS_SIGNATURE_LEN {
        return Err(AggregationError::InvalidFormat);
    }
    let (sig, bitmap) = payload.split_at(BLS_SIGNATURE_LEN);
    let signature = BlsSignature::from_slice(sig).ok_or(AggregationError::InvalidFormat)?;
    Ok((signature, bitmap.to_vec()))
}
