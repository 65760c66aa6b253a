//! # Core Domain Entities
//!
//! Verdicts, fetched transactions and engine statistics.

use bitcoin::Transaction;
use serde::{Deserialize, Serialize};
use shared_types::OutPoint;
use slp_01_message_codec::{decode_transaction, parse_transaction, CodecError, TokenMessage};
use std::sync::Arc;

use super::errors::InvalidReason;

/// Final outcome of validating one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Valid token transaction.
    Valid,
    /// Not a valid token transaction.
    Invalid(InvalidReason),
}

impl Verdict {
    /// Whether this verdict is `Valid`.
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The reason, if invalid.
    pub fn invalid_reason(self) -> Option<InvalidReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

impl From<bool> for Verdict {
    /// `false` maps to `Invalid(Imported)`, the reason used for verdicts
    /// supplied from outside the engine.
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid(InvalidReason::Imported)
        }
    }
}

/// Tri-state validity as observed from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    /// No verdict yet.
    Unknown,
    /// Resolved valid.
    Valid,
    /// Resolved invalid.
    Invalid,
}

impl From<Option<Verdict>> for Validity {
    fn from(verdict: Option<Verdict>) -> Self {
        match verdict {
            None => Self::Unknown,
            Some(Verdict::Valid) => Self::Valid,
            Some(Verdict::Invalid(_)) => Self::Invalid,
        }
    }
}

/// A transaction retrieved from the source, parsed and decoded once.
#[derive(Debug, Clone)]
pub struct LoadedTransaction {
    /// Consensus-serialized bytes.
    pub raw: Vec<u8>,
    /// Parsed transaction.
    pub transaction: Transaction,
    /// Decode result of output 0.
    pub message: Result<TokenMessage, CodecError>,
}

impl LoadedTransaction {
    /// Parse `raw` and decode its marker output.
    pub fn from_raw(raw: Vec<u8>) -> Result<Self, CodecError> {
        let transaction = parse_transaction(&raw)?;
        let message = decode_transaction(&transaction);
        Ok(Self {
            raw,
            transaction,
            message,
        })
    }

    /// Decoded message, if output 0 carries a well-formed one.
    pub fn message(&self) -> Option<&TokenMessage> {
        self.message.as_ref().ok()
    }

    /// Outpoints spent by this transaction, coinbase-style null inputs excluded.
    pub fn spent_outpoints(&self) -> impl Iterator<Item = OutPoint> + '_ {
        self.transaction
            .input
            .iter()
            .map(|input| input.previous_output)
            .filter(|outpoint| !outpoint.is_null())
    }
}

/// Outcome of asking the source for a transaction. Memoized per record.
#[derive(Debug, Clone)]
pub enum Retrieval {
    /// The transaction exists.
    Found(Arc<LoadedTransaction>),
    /// The source does not know it.
    NotFound,
}

/// An input of the transaction under validation, paired with the decoded
/// message of the ancestor it spends.
#[derive(Debug, Clone, Copy)]
pub struct SpentOutput<'a> {
    /// Outpoint being spent.
    pub outpoint: OutPoint,
    /// Message carried by the ancestor transaction.
    pub message: &'a TokenMessage,
}

/// Snapshot of cache contents and source usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorStats {
    /// Records in the cache.
    pub records: usize,
    /// Records resolved valid.
    pub valid: usize,
    /// Records resolved invalid.
    pub invalid: usize,
    /// Records without a verdict.
    pub unresolved: usize,
    /// Calls issued to the transaction source.
    pub fetches: u64,
}
