//! # Shared Types Crate
//!
//! This crate contains the identifiers and amounts shared by every crate of
//! the token overlay workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `TokenId`, `TokenAmount` and `TokenTotal` are
//!   defined once here and re-exported by the codec and the engine.
//! - **Base-Ledger Types Are Borrowed**: transaction ids and outpoints are the
//!   `bitcoin` crate's own types; the overlay never redefines them.
//! - **No Silent Wrap**: per-output quantities are 256-bit, sums are 512-bit.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
