//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod memory_source;

pub use memory_source::{InMemoryTransactionSource, MissingPolicy};
