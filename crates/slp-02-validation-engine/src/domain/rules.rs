//! # Validation Rules
//!
//! Pure checks applied once a transaction's ancestors are loaded.
//!
//! | Rule | Applies to | Failure |
//! |------|-----------|---------|
//! | Exactly one baton input of the same token | MINT | `InvalidMintAuthority` |
//! | Declared outputs do not exceed input total | SEND | `Inflation` |
//!
//! Parent validity is checked by the engine after these rules pass. Inputs
//! whose ancestor could not be found are left out of `spent`; a failure they
//! could explain is reported by [`blame_missing_inputs`] as `MissingAncestor`.

use shared_types::{widen, TokenAmount, TokenId, TokenTotal, Txid};
use slp_01_message_codec::TokenMessage;
use std::collections::BTreeSet;

use super::entities::SpentOutput;
use super::errors::InvalidReason;

/// Token value flowing into a SEND and the ancestors it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendInputs {
    /// Sum of quantities held by the spent outputs.
    pub total: TokenTotal,
    /// Ancestors that hold a quantity of the token at a spent output.
    pub parents: BTreeSet<Txid>,
}

/// Find the single input spending a minting baton of `token_id`.
///
/// A baton is the `mint_baton_vout` output of a GENESIS or MINT of the same
/// token. Zero or several such inputs make the MINT invalid.
pub fn find_mint_authority(
    token_id: &TokenId,
    spent: &[SpentOutput<'_>],
) -> Result<Txid, InvalidReason> {
    let mut batons = batons(token_id, spent);
    match (batons.next(), batons.next()) {
        (Some(baton), None) => Ok(baton.outpoint.txid),
        _ => Err(InvalidReason::InvalidMintAuthority),
    }
}

/// Sum the quantities a SEND of `token_id` receives from its inputs.
///
/// A SEND ancestor contributes the quantity it declared for the spent output;
/// a GENESIS or MINT ancestor contributes only through output 1. Inputs that
/// carry nothing of the token (other tokens, batons, undeclared outputs) are
/// ignored and do not become parents.
pub fn collect_send_inputs(token_id: &TokenId, spent: &[SpentOutput<'_>]) -> SendInputs {
    spent
        .iter()
        .filter(|input| is_same_token(token_id, input))
        .filter_map(|input| {
            input
                .message
                .quantity_at(input.outpoint.vout)
                .map(|quantity| (input.outpoint.txid, quantity))
        })
        .fold(SendInputs::default(), |mut acc, (txid, quantity)| {
            acc.total += widen(quantity);
            acc.parents.insert(txid);
            acc
        })
}

/// Reject a SEND whose declared outputs exceed its inputs. Burning (declaring
/// less than the inputs) is allowed.
pub fn check_conservation(outputs: &[TokenAmount], inputs: TokenTotal) -> Result<(), InvalidReason> {
    let declared = outputs
        .iter()
        .fold(TokenTotal::zero(), |sum, quantity| sum + widen(*quantity));
    if declared > inputs {
        return Err(InvalidReason::Inflation);
    }
    Ok(())
}

/// Re-attribute a rule failure when some inputs were dropped because their
/// ancestors are unknown.
///
/// An unknown input may have carried the missing value (`Inflation`) or the
/// missing baton (`InvalidMintAuthority` with no baton found). A MINT with two
/// batons is invalid regardless of what the unknown inputs held.
pub fn blame_missing_inputs(
    message: &TokenMessage,
    spent: &[SpentOutput<'_>],
    reason: InvalidReason,
) -> InvalidReason {
    match (reason, message) {
        (InvalidReason::Inflation, _) => InvalidReason::MissingAncestor,
        (InvalidReason::InvalidMintAuthority, TokenMessage::Mint(mint))
            if batons(&mint.token_id, spent).next().is_none() =>
        {
            InvalidReason::MissingAncestor
        }
        (reason, _) => reason,
    }
}

fn batons<'s, 'a>(
    token_id: &'s TokenId,
    spent: &'s [SpentOutput<'a>],
) -> impl Iterator<Item = &'s SpentOutput<'a>> + 's {
    spent.iter().filter(move |input| {
        is_same_token(token_id, input)
            && matches!(input.message, TokenMessage::Genesis(_) | TokenMessage::Mint(_))
            && input.message.mint_baton_vout() == Some(input.outpoint.vout)
    })
}

fn is_same_token(token_id: &TokenId, input: &SpentOutput<'_>) -> bool {
    input.message.token_id(&input.outpoint.txid) == *token_id
}
