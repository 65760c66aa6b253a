//! # Marker Field Reader
//!
//! Splits a marker-output script into its elements and validates the common
//! header (`OP_RETURN`, LOKAD id, token type, transaction type).
//!
//! ## Small-Integer Normalization
//!
//! `OP_1..=OP_16` become the one-byte push of the same value and `OP_0`
//! surfaces as the empty push, so every consumer sees a single canonical byte
//! string whichever encoding the script author chose.

use bitcoin::opcodes::all::{OP_PUSHNUM_1, OP_PUSHNUM_16, OP_RETURN};
use bitcoin::script::{Instruction, Script};
use shared_types::{TokenAmount, TokenId};

use crate::domain::{
    CodecError, TransactionType, HASH_LENGTH, LOKAD_ID, MAX_DECIMALS, MAX_QUANTITY_BYTES,
    MIN_BATON_VOUT, TOKEN_TYPE_FUNGIBLE,
};

/// One element of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Data(Vec<u8>),
    Opcode(u8),
}

/// Script elements of a marker output whose header has been accepted.
#[derive(Debug, Clone)]
pub(crate) struct MarkerFields {
    elements: Vec<Element>,
}

impl MarkerFields {
    /// Split `script` and validate the header.
    pub(crate) fn parse(script: &[u8]) -> Result<(TransactionType, Self), CodecError> {
        let (elements, truncated) = split(script);

        match elements.first() {
            Some(Element::Opcode(code)) if *code == OP_RETURN.to_u8() => {}
            _ => return Err(CodecError::not_protocol("script does not start with OP_RETURN")),
        }

        match elements.get(1) {
            Some(Element::Data(id)) if id.as_slice() == LOKAD_ID => {}
            _ => return Err(CodecError::not_protocol("missing LOKAD id")),
        }

        match elements.get(2) {
            Some(Element::Data(version)) if is_supported_token_type(version) => {}
            Some(_) => return Err(CodecError::not_protocol("unsupported token type")),
            None => return Err(CodecError::malformed("missing token type")),
        }

        let transaction_type = match elements.get(3) {
            Some(Element::Data(tag)) => std::str::from_utf8(tag)
                .map_err(|_| CodecError::not_protocol("transaction type is not ASCII"))?
                .parse::<TransactionType>()?,
            Some(Element::Opcode(_)) => {
                return Err(CodecError::not_protocol("transaction type is not a push"))
            }
            None => return Err(CodecError::malformed("missing transaction type")),
        };

        if truncated {
            return Err(CodecError::malformed("script ends inside a push"));
        }

        Ok((transaction_type, Self { elements }))
    }

    /// Number of elements, counting `OP_RETURN`.
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Require exactly `expected` elements.
    pub(crate) fn expect_len(
        &self,
        expected: usize,
        transaction_type: TransactionType,
    ) -> Result<(), CodecError> {
        if self.len() != expected {
            return Err(CodecError::malformed(format!(
                "{} expects {} fields, found {}",
                transaction_type,
                expected,
                self.len()
            )));
        }
        Ok(())
    }

    /// Bytes of the element at `index`.
    pub(crate) fn data(&self, index: usize) -> Result<&[u8], CodecError> {
        match self.elements.get(index) {
            Some(Element::Data(bytes)) => Ok(bytes),
            Some(Element::Opcode(code)) => Err(CodecError::malformed(format!(
                "field {} is opcode 0x{:02x}, not a push",
                index, code
            ))),
            None => Err(CodecError::malformed(format!("missing field {}", index))),
        }
    }

    pub(crate) fn token_id(&self, index: usize) -> Result<TokenId, CodecError> {
        let bytes = self.data(index)?;
        TokenId::from_slice(bytes).map_err(|e| CodecError::malformed(e.to_string()))
    }

    pub(crate) fn quantity(&self, index: usize) -> Result<TokenAmount, CodecError> {
        parse_quantity(self.data(index)?)
    }

    pub(crate) fn mint_baton_vout(&self, index: usize) -> Result<Option<u32>, CodecError> {
        match self.data(index)? {
            [] => Ok(None),
            [vout] if u32::from(*vout) >= MIN_BATON_VOUT => Ok(Some(u32::from(*vout))),
            [vout] => Err(CodecError::malformed(format!(
                "mint baton vout {} is below {}",
                vout, MIN_BATON_VOUT
            ))),
            other => Err(CodecError::malformed(format!(
                "mint baton vout must be 0 or 1 bytes, got {}",
                other.len()
            ))),
        }
    }

    pub(crate) fn decimals(&self, index: usize) -> Result<u8, CodecError> {
        match self.data(index)? {
            [decimals] if *decimals <= MAX_DECIMALS => Ok(*decimals),
            [decimals] => Err(CodecError::malformed(format!(
                "decimals {} exceeds {}",
                decimals, MAX_DECIMALS
            ))),
            other => Err(CodecError::malformed(format!(
                "decimals must be 1 byte, got {}",
                other.len()
            ))),
        }
    }

    pub(crate) fn document_hash(&self, index: usize) -> Result<Option<[u8; 32]>, CodecError> {
        match self.data(index)? {
            [] => Ok(None),
            bytes => bytes.try_into().map(Some).map_err(|_| {
                CodecError::malformed(format!(
                    "document hash must be 0 or {} bytes, got {}",
                    HASH_LENGTH,
                    bytes.len()
                ))
            }),
        }
    }
}

/// Interpret a quantity field as a big-endian unsigned integer.
///
/// Any width up to `MAX_QUANTITY_BYTES` is accepted; the empty field is zero.
pub(crate) fn parse_quantity(bytes: &[u8]) -> Result<TokenAmount, CodecError> {
    if bytes.len() > MAX_QUANTITY_BYTES {
        return Err(CodecError::malformed(format!(
            "quantity of {} bytes exceeds {}",
            bytes.len(),
            MAX_QUANTITY_BYTES
        )));
    }
    Ok(TokenAmount::from_big_endian(bytes))
}

fn is_supported_token_type(bytes: &[u8]) -> bool {
    match bytes {
        [low] => u16::from(*low) == TOKEN_TYPE_FUNGIBLE,
        [high, low] => u16::from_be_bytes([*high, *low]) == TOKEN_TYPE_FUNGIBLE,
        _ => false,
    }
}

/// Split a script into elements. The flag reports a push running past the end.
fn split(script: &[u8]) -> (Vec<Element>, bool) {
    let first_small = OP_PUSHNUM_1.to_u8();
    let last_small = OP_PUSHNUM_16.to_u8();

    let mut elements = Vec::new();
    for instruction in Script::from_bytes(script).instructions() {
        match instruction {
            Ok(Instruction::PushBytes(bytes)) => {
                elements.push(Element::Data(bytes.as_bytes().to_vec()))
            }
            Ok(Instruction::Op(opcode)) => {
                let code = opcode.to_u8();
                if (first_small..=last_small).contains(&code) {
                    elements.push(Element::Data(vec![code - first_small + 1]));
                } else {
                    elements.push(Element::Opcode(code));
                }
            }
            Err(_) => return (elements, true),
        }
    }
    (elements, false)
}
