//! Transaction-level helpers: parse serialized bytes and decode output 0.

use bitcoin::consensus::encode::deserialize;
use bitcoin::Transaction;

use crate::domain::{CodecError, TokenMessage};

use super::decode::decode;

/// Parse a consensus-serialized transaction.
pub fn parse_transaction(raw: &[u8]) -> Result<Transaction, CodecError> {
    deserialize(raw).map_err(|e| CodecError::InvalidTransaction(e.to_string()))
}

/// Decode the marker carried by output 0 of `transaction`.
pub fn decode_transaction(transaction: &Transaction) -> Result<TokenMessage, CodecError> {
    let marker = transaction
        .output
        .first()
        .ok_or_else(|| CodecError::not_protocol("transaction has no outputs"))?;
    decode(marker.script_pubkey.as_bytes())
}
