//! # Signature Aggregation Subsystem (TS-01)
//!
//! BLS12-381 threshold-signature plumbing for the FBFT consensus round.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Operations
//!
//! - `build_bitmap`: participation bitmap over an ordered committee
//! - `sign_and_aggregate`: sign one message with many keys, combine by point addition
//! - `aggregate_existing_votes`: combine previously collected prepare/commit votes
//!
//! ## Wire Sizes
//!
//! Uses blst's `min_pk` variant: 48-byte public keys (G1) and 96-byte
//! signatures (G2). Bitmaps are byte-packed, bit *i* at byte `i / 8`,
//! position `i % 8` (least significant first).

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::bitmap::{build_bitmap, ParticipationBitmap};
pub use domain::bls::{aggregate_signatures, sign_and_aggregate, verify_aggregate, DST};
pub use domain::errors::AggregationError;
pub use domain::keys::SigningKey;
pub use domain::votes::{AggregatedVotes, VotePhase, VotePool};
pub use ports::inbound::SignatureAggregationApi;
pub use ports::outbound::QuorumVotes;
pub use service::SignatureAggregator;
