//! Driving ports (Inbound API)

use crate::domain::{MessageResult, MessageType, NetworkMessage};
use ts_01_signature_aggregation::SigningKey;

/// Consensus message construction API.
pub trait ConsensusMessageApi: Send + Sync {
    /// Build, sign and parse one message for `phase`.
    ///
    /// `payload_for_sign` is only read for `Commit`, which signs those
    /// exact bytes instead of the block hash.
    ///
    /// # Errors
    /// * `NoSigners` if `keys` is empty
    /// * `Aggregation` if the bitmap, signing or vote aggregation fails
    /// * `Encode` / `Parse` if the envelope cannot be signed or read back
    fn construct(
        &self,
        phase: MessageType,
        payload_for_sign: &[u8],
        keys: &[SigningKey],
    ) -> MessageResult<NetworkMessage>;
}
