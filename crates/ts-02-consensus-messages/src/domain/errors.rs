//! Error types for consensus message construction

use shared_types::BlsPublicKey;
use ts_01_signature_aggregation::AggregationError;

/// Message construction error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("No private keys provided")]
    NoSigners,

    /// Bitmap, signing or vote aggregation failure.
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Failed to encode consensus envelope: {0}")]
    Encode(String),

    #[error("Failed to parse consensus message: {0}")]
    Parse(String),

    #[error("Sender {0:?} is not a quorum participant")]
    UnknownSender(BlsPublicKey),
}

impl MessageError {
    /// Key or committee setup error (caller bug).
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::NoSigners | Self::UnknownSender(_) => true,
            Self::Aggregation(e) => e.is_configuration(),
            _ => false,
        }
    }
}

/// Result type for message construction
pub type MessageResult<T> = Result<T, MessageError>;
