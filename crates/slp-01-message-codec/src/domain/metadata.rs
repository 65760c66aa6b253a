//! # Token Metadata
//!
//! Human-facing view of a GENESIS message.

use serde::{Deserialize, Serialize};
use shared_types::{TokenAmount, TokenId};

use super::entities::GenesisMessage;

/// Descriptive information about a token, taken from its GENESIS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token id (the GENESIS txid).
    pub token_id: TokenId,
    /// Ticker symbol, lossily decoded as UTF-8.
    pub symbol: String,
    /// Name, lossily decoded as UTF-8.
    pub name: String,
    /// Document URI, lossily decoded as UTF-8.
    pub document_uri: String,
    /// Hex of the document hash, if declared.
    pub document_hash: Option<String>,
    /// Display divisor exponent.
    pub decimals: u8,
    /// Baton output of the GENESIS, if any.
    pub mint_baton_vout: Option<u32>,
    /// Initial supply in base units.
    pub initial_quantity: TokenAmount,
}

impl TokenMetadata {
    /// Build from a decoded GENESIS.
    pub fn from_genesis(token_id: TokenId, genesis: &GenesisMessage) -> Self {
        Self {
            token_id,
            symbol: String::from_utf8_lossy(&genesis.symbol).into_owned(),
            name: String::from_utf8_lossy(&genesis.name).into_owned(),
            document_uri: String::from_utf8_lossy(&genesis.document_uri).into_owned(),
            document_hash: genesis.document_hash.map(hex::encode),
            decimals: genesis.decimals,
            mint_baton_vout: genesis.mint_baton_vout,
            initial_quantity: genesis.initial_quantity,
        }
    }

    /// Render `amount` using this token's decimals.
    pub fn display_amount(&self, amount: TokenAmount) -> String {
        format_amount(amount, self.decimals)
    }

    /// Whether more supply can ever be minted.
    pub fn is_fixed_supply(&self) -> bool {
        self.mint_baton_vout.is_none()
    }
}

/// Render a base-unit quantity as a decimal string with `decimals` places.
///
/// Trailing zeros of the fractional part are kept so that the number of
/// places always equals `decimals`.
pub fn format_amount(amount: TokenAmount, decimals: u8) -> String {
    let digits = amount.to_string();
    let places = usize::from(decimals);
    if places == 0 {
        return digits;
    }
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - places);
    format!("{}.{}", whole, fraction)
}
