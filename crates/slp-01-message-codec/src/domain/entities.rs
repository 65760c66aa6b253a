//! # Core Domain Entities
//!
//! The decoded form of a marker-output message.
//!
//! ## Tagged Union
//!
//! Each transaction type carries only the fields that exist for it:
//!
//! | Variant | Fields |
//! |---------|--------|
//! | `Genesis` | metadata, decimals, baton vout, initial quantity |
//! | `Mint` | token id, baton vout, additional quantity |
//! | `Send` | token id, one quantity per receiving output |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{TokenAmount, TokenId, Txid};

use super::errors::CodecError;
use super::value_objects::{TOKEN_TYPE_FUNGIBLE, VALUE_OUTPUT_INDEX};

/// Protocol sub-type declared in the token-type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Fungible token (type 1). NFT variants are not supported.
    Fungible,
}

impl TokenType {
    /// Numeric value carried on the wire.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Fungible => TOKEN_TYPE_FUNGIBLE,
        }
    }
}

/// Operation performed by a token transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Creates a token and its initial supply.
    Genesis,
    /// Creates additional supply, authorized by the minting baton.
    Mint,
    /// Moves existing supply between outputs.
    Send,
}

impl TransactionType {
    /// The tag as emitted on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Genesis => "GENESIS",
            Self::Mint => "MINT",
            Self::Send => "SEND",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CodecError;

    /// Case-insensitive, as tags are matched on decode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genesis" => Ok(Self::Genesis),
            "mint" => Ok(Self::Mint),
            "send" => Ok(Self::Send),
            other => Err(CodecError::NotProtocolMessage(format!(
                "unknown transaction type {:?}",
                other
            ))),
        }
    }
}

/// GENESIS: issues a new token.
///
/// Text fields are kept as raw bytes so that decode and encode are exact
/// inverses; an empty field means "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisMessage {
    /// Ticker symbol.
    pub symbol: Vec<u8>,
    /// Human-readable name.
    pub name: Vec<u8>,
    /// URI of an external document describing the token.
    pub document_uri: Vec<u8>,
    /// SHA-256 of that document.
    pub document_hash: Option<[u8; 32]>,
    /// Display divisor exponent (0..=9).
    pub decimals: u8,
    /// Output carrying future minting authority, if any.
    pub mint_baton_vout: Option<u32>,
    /// Supply created at output 1.
    pub initial_quantity: TokenAmount,
}

/// MINT: creates additional supply of an existing token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintMessage {
    /// Token being minted.
    pub token_id: TokenId,
    /// Output receiving the baton for the next mint, if any.
    pub mint_baton_vout: Option<u32>,
    /// Supply created at output 1.
    pub additional_quantity: TokenAmount,
}

/// SEND: transfers existing supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Token being moved.
    pub token_id: TokenId,
    /// `outputs[i - 1]` is the quantity received by transaction output `i`.
    pub outputs: Vec<TokenAmount>,
}

impl SendMessage {
    /// Create a SEND message.
    pub fn new(token_id: TokenId, outputs: Vec<TokenAmount>) -> Self {
        Self { token_id, outputs }
    }

    /// Quantity assigned to transaction output `vout`, if it is declared.
    ///
    /// Output 0 is the marker itself and never carries value.
    pub fn quantity_at(&self, vout: u32) -> Option<TokenAmount> {
        let index = usize::try_from(vout).ok()?.checked_sub(1)?;
        self.outputs.get(index).copied()
    }
}

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenMessage {
    /// Token issuance.
    Genesis(GenesisMessage),
    /// Additional issuance.
    Mint(MintMessage),
    /// Transfer.
    Send(SendMessage),
}

impl TokenMessage {
    /// Operation carried by this message.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Genesis(_) => TransactionType::Genesis,
            Self::Mint(_) => TransactionType::Mint,
            Self::Send(_) => TransactionType::Send,
        }
    }

    /// Protocol sub-type. Only fungible tokens decode.
    pub fn token_type(&self) -> TokenType {
        TokenType::Fungible
    }

    /// Token this message belongs to, given the id of the transaction that
    /// carries it. A GENESIS refers to its own transaction.
    pub fn token_id(&self, containing_txid: &Txid) -> TokenId {
        match self {
            Self::Genesis(_) => TokenId::from(*containing_txid),
            Self::Mint(mint) => mint.token_id,
            Self::Send(send) => send.token_id,
        }
    }

    /// Output carrying minting authority (GENESIS and MINT only).
    pub fn mint_baton_vout(&self) -> Option<u32> {
        match self {
            Self::Genesis(genesis) => genesis.mint_baton_vout,
            Self::Mint(mint) => mint.mint_baton_vout,
            Self::Send(_) => None,
        }
    }

    /// Quantity created by a GENESIS or MINT.
    pub fn genesis_or_mint_quantity(&self) -> Option<TokenAmount> {
        match self {
            Self::Genesis(genesis) => Some(genesis.initial_quantity),
            Self::Mint(mint) => Some(mint.additional_quantity),
            Self::Send(_) => None,
        }
    }

    /// Quantity held by output `vout` according to this message alone.
    pub fn quantity_at(&self, vout: u32) -> Option<TokenAmount> {
        match self {
            Self::Genesis(_) | Self::Mint(_) if vout == VALUE_OUTPUT_INDEX => {
                self.genesis_or_mint_quantity()
            }
            Self::Genesis(_) | Self::Mint(_) => None,
            Self::Send(send) => send.quantity_at(vout),
        }
    }
}

/// What a single output holds of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputHolding {
    /// A value-carrying output.
    Quantity(TokenAmount),
    /// The minting baton.
    MintBaton,
}

/// Token attribution of one transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOwnership {
    /// Token the output belongs to.
    pub token_id: TokenId,
    /// Type of the transaction that created the output.
    pub transaction_type: TransactionType,
    /// Quantity or baton.
    pub holding: OutputHolding,
}
