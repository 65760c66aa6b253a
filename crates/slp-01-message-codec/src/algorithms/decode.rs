//! # Marker Decoding
//!
//! Turns a marker-output script into a [`TokenMessage`].
//!
//! ## Failure Classes
//!
//! - `NotProtocolMessage`: the header does not identify a type-1 message, so
//!   the transaction is simply not a token transaction.
//! - `MalformedMessage`: the header matched but the body breaks the rules for
//!   its transaction type.

use crate::domain::{
    CodecError, GenesisMessage, MintMessage, SendMessage, TokenMessage, TransactionType,
    GENESIS_FIELD_COUNT, MAX_SEND_OUTPUTS, MINT_FIELD_COUNT, SEND_QUANTITY_OFFSET,
};

use super::fields::MarkerFields;

/// Decode the script of a transaction's output 0.
pub fn decode(script: &[u8]) -> Result<TokenMessage, CodecError> {
    let (transaction_type, fields) = MarkerFields::parse(script)?;
    match transaction_type {
        TransactionType::Genesis => decode_genesis(&fields).map(TokenMessage::Genesis),
        TransactionType::Mint => decode_mint(&fields).map(TokenMessage::Mint),
        TransactionType::Send => decode_send(&fields).map(TokenMessage::Send),
    }
}

fn decode_genesis(fields: &MarkerFields) -> Result<GenesisMessage, CodecError> {
    fields.expect_len(GENESIS_FIELD_COUNT, TransactionType::Genesis)?;
    Ok(GenesisMessage {
        symbol: fields.data(4)?.to_vec(),
        name: fields.data(5)?.to_vec(),
        document_uri: fields.data(6)?.to_vec(),
        document_hash: fields.document_hash(7)?,
        decimals: fields.decimals(8)?,
        mint_baton_vout: fields.mint_baton_vout(9)?,
        initial_quantity: fields.quantity(10)?,
    })
}

fn decode_mint(fields: &MarkerFields) -> Result<MintMessage, CodecError> {
    fields.expect_len(MINT_FIELD_COUNT, TransactionType::Mint)?;
    Ok(MintMessage {
        token_id: fields.token_id(4)?,
        mint_baton_vout: fields.mint_baton_vout(5)?,
        additional_quantity: fields.quantity(6)?,
    })
}

fn decode_send(fields: &MarkerFields) -> Result<SendMessage, CodecError> {
    let count = fields.len().saturating_sub(SEND_QUANTITY_OFFSET);
    if count == 0 {
        return Err(CodecError::malformed("SEND declares no output quantities"));
    }
    if count > MAX_SEND_OUTPUTS {
        return Err(CodecError::malformed(format!(
            "SEND declares {} output quantities, at most {} allowed",
            count, MAX_SEND_OUTPUTS
        )));
    }

    let token_id = fields.token_id(4)?;
    let outputs = (SEND_QUANTITY_OFFSET..fields.len())
        .map(|index| fields.quantity(index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SendMessage::new(token_id, outputs))
}
