//! # Domain Errors
//!
//! Faults of the validation engine and reasons a transaction is invalid.
//!
//! A `ValidatorError` means the engine could not reach a verdict (the source
//! failed, timed out or returned garbage) and nothing is memoized. An
//! `InvalidReason` is a verdict and is recorded permanently.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{TokenId, Txid};
use slp_01_message_codec::CodecError;
use thiserror::Error;

/// Errors reported by a `TransactionSource`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The source does not know the transaction.
    #[error("Transaction not found: {0}")]
    NotFound(Txid),

    /// The source could not be reached or answered with an error.
    #[error("Network error: {0}")]
    Network(String),
}

/// Validation engine error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidatorError {
    /// The transaction source failed.
    #[error("Transaction source failed: {0}")]
    Source(#[from] SourceError),

    /// The transaction source did not answer in time.
    #[error("Fetch of {txid} timed out after {timeout_ms} ms")]
    FetchTimeout {
        /// Transaction being fetched
        txid: Txid,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// The source returned bytes that are not the requested transaction.
    #[error("Corrupt transaction {txid}: {reason}")]
    CorruptTransaction {
        /// Transaction requested
        txid: Txid,
        /// What was wrong with the bytes
        reason: String,
    },

    /// A transaction needed for a lookup does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Txid),

    /// The token id does not name a GENESIS transaction.
    #[error("Token {0} has no valid GENESIS transaction")]
    NotGenesis(TokenId),

    /// The task computing a verdict ended without producing one.
    #[error("Validation of {txid} aborted")]
    TaskAborted {
        /// Transaction being validated
        txid: Txid,
    },
}

/// Why a transaction is not a valid token transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidReason {
    /// The transaction could not be found, or the rules failed while an
    /// input ancestor was unknown.
    MissingAncestor,
    /// The marker output is recognized but violates the message rules.
    MalformedMessage,
    /// Output 0 does not carry a token message.
    NotProtocolMessage,
    /// A MINT does not spend exactly one minting baton of its token.
    InvalidMintAuthority,
    /// A contributing ancestor is invalid.
    InvalidParent,
    /// A SEND declares more output than its inputs provide.
    Inflation,
    /// Recorded invalid by `preload`.
    Imported,
}

impl InvalidReason {
    /// Stable lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingAncestor => "missing-ancestor",
            Self::MalformedMessage => "malformed-message",
            Self::NotProtocolMessage => "not-protocol-message",
            Self::InvalidMintAuthority => "invalid-mint-authority",
            Self::InvalidParent => "invalid-parent",
            Self::Inflation => "inflation",
            Self::Imported => "imported",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&CodecError> for InvalidReason {
    fn from(error: &CodecError) -> Self {
        match error {
            CodecError::NotProtocolMessage(_) | CodecError::InvalidTransaction(_) => {
                Self::NotProtocolMessage
            }
            CodecError::MalformedMessage(_) | CodecError::NotSlpOutput { .. } => {
                Self::MalformedMessage
            }
        }
    }
}
