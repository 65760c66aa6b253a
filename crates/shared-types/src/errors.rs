//! # Error Types
//!
//! Defines error types used across crates.

use thiserror::Error;

/// Errors raised while parsing a token identifier from text or bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdError {
    /// The input was not valid hexadecimal.
    #[error("Invalid token id hex: {0}")]
    InvalidHex(String),

    /// The decoded identifier did not have exactly 32 bytes.
    #[error("Invalid token id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}
