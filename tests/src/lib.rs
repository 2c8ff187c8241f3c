//! # Tessera Test Suite
//!
//! Cross-subsystem flows that no single crate can test alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs   # keys, committees, chains
//!     └── flows.rs      # FBFT round -> commit bitmap -> reward settlement
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ts-tests
//! cargo test -p ts-tests integration::flows::
//! ```

pub mod integration;
