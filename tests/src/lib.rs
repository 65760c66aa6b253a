//! # SLP Validator Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs        # In-memory ledger building real transactions
//! └── integration/
//!     ├── validation_flows.rs  # Codec + engine verdicts over token DAGs
//!     └── concurrency.rs       # Shared computations, deep ancestry, dropped callers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p slp-tests
//!
//! # By category
//! cargo test -p slp-tests integration::validation_flows::
//! cargo test -p slp-tests integration::concurrency::
//!
//! # With engine logs
//! RUST_LOG=debug cargo test -p slp-tests -- --nocapture
//! ```

pub mod fixtures;
pub mod integration;
