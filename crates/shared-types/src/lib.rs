//! # Shared Types Crate
//!
//! This crate contains the domain entities consumed by every Tessera
//! subsystem: committee slots, shard states, block headers, cross-links,
//! the fork schedule and the fixed-point decimal used for voting power.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Order is authoritative**: Committees are ordered slot lists; bitmaps
//!   and payout ordering index into them, never into key or address order.
//! - **Deterministic arithmetic**: Shares and rewards use `Dec`, never floats.

pub mod chain_config;
pub mod entities;
pub mod errors;
pub mod numeric;

pub use chain_config::ChainConfig;
pub use entities::*;
pub use errors::*;
pub use numeric::Dec;
