//! # Core Domain Entities
//!
//! Identifiers and quantities of the token overlay.
//!
//! ## Byte Order
//!
//! A `Txid` stores its hash in internal (little-endian) order and displays it
//! reversed. Token ids travel inside marker outputs in display order, so
//! `TokenId` stores display order and converting a GENESIS txid into its token
//! id reverses the bytes once.

use std::fmt;
use std::str::FromStr;

use bitcoin::hashes::Hash as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::errors::TokenIdError;

pub use bitcoin::{OutPoint, Txid};
pub use primitive_types::{U256, U512};

/// Quantity carried by a single output or declared by a single message field.
pub type TokenAmount = U256;

/// Sum of many `TokenAmount`s. Wide enough that no realistic sum can wrap.
pub type TokenTotal = U512;

/// Identifier of a token: the id of its GENESIS transaction, in display order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenId([u8; 32]);

impl TokenId {
    /// Wrap 32 bytes already in display order.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TokenIdError> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TokenIdError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Bytes in display order, as they appear in a marker output.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The txid of the GENESIS transaction that created this token.
    pub fn genesis_txid(&self) -> Txid {
        let mut internal = self.0;
        internal.reverse();
        Txid::from_byte_array(internal)
    }
}

impl From<Txid> for TokenId {
    fn from(txid: Txid) -> Self {
        let mut display = txid.to_byte_array();
        display.reverse();
        Self(display)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self)
    }
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| TokenIdError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the id of a serialized transaction (double SHA-256).
pub fn compute_txid(raw: &[u8]) -> Txid {
    let first = Sha256::digest(raw);
    let second: [u8; 32] = Sha256::digest(first).into();
    Txid::from_byte_array(second)
}

/// Widen a per-output quantity for summation.
pub fn widen(amount: TokenAmount) -> TokenTotal {
    TokenTotal::from(amount)
}
