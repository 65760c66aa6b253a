//! # Value Objects
//!
//! Wire constants of the SLP token type 1 marker output.

/// Protocol identifier pushed right after `OP_RETURN` ("SLP\0").
pub const LOKAD_ID: [u8; 4] = *b"SLP\x00";

/// Token type of fungible tokens, the only version in scope.
pub const TOKEN_TYPE_FUNGIBLE: u16 = 1;

/// Output that receives the quantity created by GENESIS and MINT.
pub const VALUE_OUTPUT_INDEX: u32 = 1;

/// Lowest output index a minting baton may be assigned to.
///
/// Output 0 is the marker and output 1 receives the created quantity.
pub const MIN_BATON_VOUT: u32 = 2;

/// Largest `decimals` value a GENESIS may declare.
pub const MAX_DECIMALS: u8 = 9;

/// Maximum number of quantities a SEND may declare.
pub const MAX_SEND_OUTPUTS: usize = 19;

/// Quantities wider than this do not fit a `TokenAmount`.
pub const MAX_QUANTITY_BYTES: usize = 32;

/// Width quantities are padded to on encode.
pub const QUANTITY_ENCODE_WIDTH: usize = 8;

/// Length of token ids and document hashes.
pub const HASH_LENGTH: usize = 32;

/// Script elements of a GENESIS, counting `OP_RETURN`.
pub const GENESIS_FIELD_COUNT: usize = 11;

/// Script elements of a MINT, counting `OP_RETURN`.
pub const MINT_FIELD_COUNT: usize = 7;

/// Elements preceding the first SEND quantity, counting `OP_RETURN`.
pub const SEND_QUANTITY_OFFSET: usize = 5;
