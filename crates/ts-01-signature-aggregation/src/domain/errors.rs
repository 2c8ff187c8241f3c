//! # Aggregation Errors
//!
//! Error types for signing, aggregation and bitmap operations.

use thiserror::Error;

/// Errors that can occur while signing or aggregating.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// A signing key is not part of the committee the bitmap is built over.
    #[error("Key {key} is not a committee member")]
    NotInCommittee { key: String },

    /// Secret key bytes do not decode to a valid scalar.
    #[error("Malformed secret key material for {key}")]
    MalformedKey { key: String },

    /// Secret key does not derive the public key it is paired with.
    #[error("Secret key does not match public key {key}")]
    KeyMismatch { key: String },

    /// Cannot aggregate an empty list of signatures
    #[error("Cannot aggregate empty signature list")]
    EmptyAggregation,

    /// The signature format is invalid (wrong length, invalid encoding)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Bitmap byte length does not match the committee.
    #[error("Bitmap length mismatch: expected {expected} bytes, got {actual}")]
    BitmapLength { expected: usize, actual: usize },

    /// Bitmap has bits set past the last committee member.
    #[error("Bitmap sets bits beyond committee size {committee_size}")]
    BitmapPadding { committee_size: usize },

    /// Index outside the committee.
    #[error("Index {index} out of range for committee of {committee_size}")]
    IndexOutOfRange { index: usize, committee_size: usize },

    /// Underlying BLS library failure.
    #[error("BLS operation failed: {0}")]
    Blst(String),
}

impl AggregationError {
    /// Key or committee setup error (caller bug, non-retryable).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotInCommittee { .. })
    }

    /// Malformed key material or BLS failure.
    pub fn is_signing(&self) -> bool {
        matches!(
            self,
            Self::MalformedKey { .. } | Self::KeyMismatch { .. } | Self::Blst(_)
        )
    }

    /// Bitmap inconsistent with committee size.
    pub fn is_bitmap_decode(&self) -> bool {
        matches!(
            self,
            Self::BitmapLength { .. } | Self::BitmapPadding { .. } | Self::IndexOutOfRange { .. }
        )
    }
}
