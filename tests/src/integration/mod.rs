//! # Integration Flows
//!
//! Cross-crate tests: messages encoded by the codec, validated by the engine
//! through the in-memory transaction source.

mod concurrency;
