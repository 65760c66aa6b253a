//! # SLP Message Codec (slp-01)
//!
//! Decodes and encodes the token-protocol message carried in output 0 of a
//! base-ledger transaction, and attributes individual outputs to tokens.
//!
//! ## Marker Layout
//!
//! ```text
//! OP_RETURN <"SLP\0"> <token type = 1> <"GENESIS" | "MINT" | "SEND"> <fields...>
//! ```
//!
//! | Type | Fields after the tag |
//! |------|----------------------|
//! | GENESIS | symbol, name, document URI, document hash, decimals, baton vout, quantity |
//! | MINT | token id, baton vout, quantity |
//! | SEND | token id, 1..=19 quantities |
//!
//! ## Decode Rules
//!
//! | Rule | Failure |
//! |------|---------|
//! | Header present and type 1 | `NotProtocolMessage` |
//! | Exact field count per type | `MalformedMessage` |
//! | Token id and document hash are 32 bytes | `MalformedMessage` |
//! | Decimals is one byte, at most 9 | `MalformedMessage` |
//! | Baton vout empty or one byte, at least 2 | `MalformedMessage` |
//! | Quantities at most 32 bytes | `MalformedMessage` |
//!
//! Decoding is a pure function of the script bytes.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): message types, constants, errors, metadata
//! - **Algorithms** (`algorithms/`): script field reader, decode, encode,
//!   output attribution

pub mod algorithms;
pub mod domain;

pub use algorithms::{
    attribute_output, decode, decode_output_ownership, decode_transaction, encode,
    parse_transaction,
};
pub use domain::{
    format_amount, CodecError, GenesisMessage, MintMessage, OutputHolding, OutputOwnership,
    SendMessage, TokenMessage, TokenMetadata, TokenType, TransactionType, LOKAD_ID,
    MAX_DECIMALS, MAX_SEND_OUTPUTS, MIN_BATON_VOUT, TOKEN_TYPE_FUNGIBLE, VALUE_OUTPUT_INDEX,
};
