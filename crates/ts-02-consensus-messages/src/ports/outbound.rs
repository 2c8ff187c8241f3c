//! Driven ports (Outbound dependencies)

use crate::domain::{ConsensusEnvelope, FbftMessage, MessageResult};
use shared_types::BlsPublicKey;
use ts_01_signature_aggregation::SigningKey;

/// Quorum/committee source: ordered participants and collected votes.
pub use ts_01_signature_aggregation::QuorumVotes as QuorumDecider;

/// Signs an envelope and produces its encoded form.
pub trait EnvelopeSigner: Send + Sync {
    /// Sign `envelope` with `keys`, store the signature in it, and return
    /// the encoded signed envelope (without the wire frame header).
    fn sign_and_marshal(
        &self,
        envelope: &mut ConsensusEnvelope,
        keys: &[SigningKey],
    ) -> MessageResult<Vec<u8>>;
}

/// Reads an envelope back into round bookkeeping form.
pub trait FbftMessageParser: Send + Sync {
    /// Parse `envelope`, resolving a sender bitmap against `participants`.
    fn parse(
        &self,
        envelope: &ConsensusEnvelope,
        participants: &[BlsPublicKey],
    ) -> MessageResult<FbftMessage>;
}
