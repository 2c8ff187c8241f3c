//! # Participation Bitmap
//!
//! Byte-packed bitmap over an ordered committee. Bit *i* is set iff
//! committee member *i* contributed to an aggregate signature (or is a
//! message sender).
//!
//! ## Encoding
//!
//! - Length is `ceil(committee_size / 8)` bytes
//! - Bit *i* lives in byte `i / 8` at position `i % 8`, least significant first
//! - Padding bits past the committee size must be zero
//!
//! The committee order is never changed; every validator reproduces the
//! same bytes for the same signer set.

use super::errors::AggregationError;
use bitvec::prelude::*;
use shared_types::BlsPublicKey;
use std::collections::HashMap;

/// Participation bitmap bound to its committee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipationBitmap {
    participants: Vec<BlsPublicKey>,
    positions: HashMap<BlsPublicKey, usize>,
    bits: BitVec<u8, Lsb0>,
}

impl ParticipationBitmap {
    /// Empty bitmap (no bits set) over `participants`.
    pub fn new(participants: Vec<BlsPublicKey>) -> Self {
        let size = participants.len();
        let mut bits = BitVec::<u8, Lsb0>::from_vec(vec![0u8; size.div_ceil(8)]);
        bits.truncate(size);
        Self {
            positions: index_participants(&participants),
            participants,
            bits,
        }
    }

    /// Decode a received bitmap against `participants`.
    ///
    /// # Errors
    /// * `BitmapLength` if the byte length does not match the committee
    /// * `BitmapPadding` if any bit past the last member is set
    pub fn from_bytes(
        participants: Vec<BlsPublicKey>,
        bytes: &[u8],
    ) -> Result<Self, AggregationError> {
        let size = participants.len();
        let expected = size.div_ceil(8);
        if bytes.len() != expected {
            return Err(AggregationError::BitmapLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes.to_vec());
        if bits[size..].any() {
            return Err(AggregationError::BitmapPadding {
                committee_size: size,
            });
        }
        bits.truncate(size);

        Ok(Self {
            positions: index_participants(&participants),
            participants,
            bits,
        })
    }

    /// Mark `key` as participating (or not).
    pub fn set_key(&mut self, key: &BlsPublicKey, enabled: bool) -> Result<(), AggregationError> {
        let index = *self
            .positions
            .get(key)
            .ok_or_else(|| AggregationError::NotInCommittee { key: key.to_hex() })?;
        self.bits.set(index, enabled);
        Ok(())
    }

    /// Mark the member at `index` as participating (or not).
    pub fn set_index(&mut self, index: usize, enabled: bool) -> Result<(), AggregationError> {
        if index >= self.bits.len() {
            return Err(AggregationError::IndexOutOfRange {
                index,
                committee_size: self.bits.len(),
            });
        }
        self.bits.set(index, enabled);
        Ok(())
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    /// Committee indices with their bit set, ascending.
    pub fn enabled_indices(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }

    /// Keys with their bit set, in committee order.
    pub fn enabled_keys(&self) -> Vec<BlsPublicKey> {
        self.bits
            .iter_ones()
            .map(|index| self.participants[index])
            .collect()
    }

    pub fn count_enabled(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn participants(&self) -> &[BlsPublicKey] {
        &self.participants
    }

    /// Committee size.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Packed wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

fn index_participants(participants: &[BlsPublicKey]) -> HashMap<BlsPublicKey, usize> {
    let mut positions = HashMap::with_capacity(participants.len());
    for (index, key) in participants.iter().enumerate() {
        // first occurrence wins
        positions.entry(*key).or_insert(index);
    }
    positions
}

/// Build a bitmap over `committee` with every signing key set.
///
/// # Errors
/// * `NotInCommittee` if any signing key is not a committee member
pub fn build_bitmap(
    committee: &[BlsPublicKey],
    signing_keys: &[BlsPublicKey],
) -> Result<ParticipationBitmap, AggregationError> {
    let mut bitmap = ParticipationBitmap::new(committee.to_vec());
    for key in signing_keys {
        bitmap.set_key(key, true)?;
    }
    Ok(bitmap)
}
