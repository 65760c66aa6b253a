//! # Codec Errors
//!
//! Error types for marker-output decoding and encoding.

use thiserror::Error;

/// Errors that can occur while decoding or encoding a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The script does not carry this protocol's marker.
    #[error("Not a protocol message: {0}")]
    NotProtocolMessage(String),

    /// The marker is present but the fields are missing or invalid.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// The requested output carries neither a quantity nor the baton.
    #[error("Output {vout} does not carry a token")]
    NotSlpOutput {
        /// Requested output index
        vout: u32,
    },

    /// The bytes are not a serialized transaction.
    #[error("Invalid transaction encoding: {0}")]
    InvalidTransaction(String),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage(reason.into())
    }

    pub(crate) fn not_protocol(reason: impl Into<String>) -> Self {
        Self::NotProtocolMessage(reason.into())
    }
}
