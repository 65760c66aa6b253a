//! # Output Ownership
//!
//! Which token, if any, a given output of a token transaction holds, and
//! whether it holds a quantity or the minting baton.

use bitcoin::Transaction;
use shared_types::Txid;

use crate::domain::{CodecError, OutputHolding, OutputOwnership, TokenMessage};

use super::transaction::decode_transaction;

/// Attribute output `vout` of `transaction` to a token.
///
/// Fails with `NotSlpOutput` when the output does not exist or carries
/// nothing under the message's rules.
pub fn decode_output_ownership(
    transaction: &Transaction,
    vout: u32,
) -> Result<OutputOwnership, CodecError> {
    let message = decode_transaction(transaction)?;
    let exists = usize::try_from(vout)
        .map(|index| index < transaction.output.len())
        .unwrap_or(false);
    if !exists {
        return Err(CodecError::NotSlpOutput { vout });
    }
    attribute_output(&transaction.compute_txid(), &message, vout)
}

/// Attribute output `vout` of the transaction `txid` carrying `message`.
///
/// The caller is responsible for `vout` naming an existing output.
pub fn attribute_output(
    txid: &Txid,
    message: &TokenMessage,
    vout: u32,
) -> Result<OutputOwnership, CodecError> {
    let holding = if message.mint_baton_vout() == Some(vout) {
        OutputHolding::MintBaton
    } else {
        message
            .quantity_at(vout)
            .map(OutputHolding::Quantity)
            .ok_or(CodecError::NotSlpOutput { vout })?
    };

    Ok(OutputOwnership {
        token_id: message.token_id(txid),
        transaction_type: message.transaction_type(),
        holding,
    })
}
