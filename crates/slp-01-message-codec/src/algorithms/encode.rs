//! # Marker Encoding
//!
//! Builds the canonical marker-output script for a message: upper-case tag,
//! token type as a one-byte push, quantities as big-endian pushes of at least
//! eight bytes.

use bitcoin::opcodes::all::OP_RETURN;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::ScriptBuf;
use shared_types::TokenAmount;

use crate::domain::{
    CodecError, GenesisMessage, MintMessage, SendMessage, TokenMessage, LOKAD_ID, MAX_DECIMALS,
    MAX_SEND_OUTPUTS, MIN_BATON_VOUT, QUANTITY_ENCODE_WIDTH, TOKEN_TYPE_FUNGIBLE,
};

/// Encode `message` as an output-0 script.
///
/// Messages that would not decode back (decimals above 9, baton below 2,
/// empty or oversized SEND) are rejected.
pub fn encode(message: &TokenMessage) -> Result<ScriptBuf, CodecError> {
    let token_type = u8::try_from(TOKEN_TYPE_FUNGIBLE)
        .map_err(|_| CodecError::malformed("token type does not fit one byte"))?;

    let builder = Builder::new().push_opcode(OP_RETURN);
    let builder = push(builder, &LOKAD_ID)?;
    let builder = push(builder, &[token_type])?;
    let builder = push(builder, message.transaction_type().as_str().as_bytes())?;

    let builder = match message {
        TokenMessage::Genesis(genesis) => encode_genesis(builder, genesis)?,
        TokenMessage::Mint(mint) => encode_mint(builder, mint)?,
        TokenMessage::Send(send) => encode_send(builder, send)?,
    };
    Ok(builder.into_script())
}

fn encode_genesis(builder: Builder, genesis: &GenesisMessage) -> Result<Builder, CodecError> {
    if genesis.decimals > MAX_DECIMALS {
        return Err(CodecError::malformed(format!(
            "decimals {} exceeds {}",
            genesis.decimals, MAX_DECIMALS
        )));
    }
    let hash: &[u8] = match &genesis.document_hash {
        Some(hash) => hash,
        None => &[],
    };

    let builder = push(builder, &genesis.symbol)?;
    let builder = push(builder, &genesis.name)?;
    let builder = push(builder, &genesis.document_uri)?;
    let builder = push(builder, hash)?;
    let builder = push(builder, &[genesis.decimals])?;
    let builder = push(builder, &baton_field(genesis.mint_baton_vout)?)?;
    push(builder, &quantity_field(genesis.initial_quantity))
}

fn encode_mint(builder: Builder, mint: &MintMessage) -> Result<Builder, CodecError> {
    let builder = push(builder, mint.token_id.as_bytes())?;
    let builder = push(builder, &baton_field(mint.mint_baton_vout)?)?;
    push(builder, &quantity_field(mint.additional_quantity))
}

fn encode_send(builder: Builder, send: &SendMessage) -> Result<Builder, CodecError> {
    if send.outputs.is_empty() || send.outputs.len() > MAX_SEND_OUTPUTS {
        return Err(CodecError::malformed(format!(
            "SEND must declare 1 to {} quantities, got {}",
            MAX_SEND_OUTPUTS,
            send.outputs.len()
        )));
    }
    let mut builder = push(builder, send.token_id.as_bytes())?;
    for quantity in &send.outputs {
        builder = push(builder, &quantity_field(*quantity))?;
    }
    Ok(builder)
}

fn push(builder: Builder, data: &[u8]) -> Result<Builder, CodecError> {
    let bytes = PushBytesBuf::try_from(data.to_vec())
        .map_err(|e| CodecError::malformed(format!("field too large to push: {}", e)))?;
    Ok(builder.push_slice(bytes))
}

fn baton_field(vout: Option<u32>) -> Result<Vec<u8>, CodecError> {
    match vout {
        None => Ok(Vec::new()),
        Some(vout) if vout >= MIN_BATON_VOUT => u8::try_from(vout)
            .map(|byte| vec![byte])
            .map_err(|_| CodecError::malformed(format!("mint baton vout {} exceeds 255", vout))),
        Some(vout) => Err(CodecError::malformed(format!(
            "mint baton vout {} is below {}",
            vout, MIN_BATON_VOUT
        ))),
    }
}

/// Big-endian bytes of `amount`, left-padded to the encode width.
fn quantity_field(amount: TokenAmount) -> Vec<u8> {
    let mut full = [0u8; 32];
    amount.to_big_endian(&mut full);
    let width = ((amount.bits() + 7) / 8).max(QUANTITY_ENCODE_WIDTH);
    full[full.len() - width..].to_vec()
}
