//! Domain layer for consensus message construction
//!
//! - messages: wire envelope, request fields, parsed round message
//! - round: the round state a message is built from
//! - errors: construction failures

mod errors;
mod messages;
mod round;

pub use errors::*;
pub use messages::*;
pub use round::*;
