//! # Integration Flows
//!
//! The block lifecycle across subsystems:
//!
//! 1. Committee members vote; the leader aggregates (TS-01)
//! 2. The leader broadcasts `Committed` with signature and bitmap (TS-02)
//! 3. The next block carries that bitmap; settlement pays the signers (TS-03)

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
mod flows;
