//! # Test Fixtures
//!
//! A tiny in-memory ledger that builds real consensus-serialized
//! transactions, stores them in an `InMemoryTransactionSource` and hands out
//! engines wired to it.

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::transaction::Version;
use bitcoin::{Amount, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};
use shared_types::{OutPoint, TokenAmount, TokenId, Txid};
use slp_01_message_codec::{encode, GenesisMessage, MintMessage, SendMessage, TokenMessage};
use slp_02_validation_engine::{InMemoryTransactionSource, ValidationEngine, ValidatorConfig};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Dust value given to every non-marker output.
const DUST_SATS: u64 = 546;

/// Install a subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn genesis_message(quantity: u64, baton: Option<u32>) -> TokenMessage {
    TokenMessage::Genesis(GenesisMessage {
        symbol: b"TEST".to_vec(),
        name: b"Test Token".to_vec(),
        document_uri: b"https://example.org/test".to_vec(),
        document_hash: None,
        decimals: 2,
        mint_baton_vout: baton,
        initial_quantity: TokenAmount::from(quantity),
    })
}

pub fn mint_message(token_id: TokenId, quantity: u64, baton: Option<u32>) -> TokenMessage {
    TokenMessage::Mint(MintMessage {
        token_id,
        mint_baton_vout: baton,
        additional_quantity: TokenAmount::from(quantity),
    })
}

pub fn send_message(token_id: TokenId, outputs: &[u64]) -> TokenMessage {
    TokenMessage::Send(SendMessage::new(
        token_id,
        outputs.iter().copied().map(TokenAmount::from).collect(),
    ))
}

/// Serialize a transaction spending `inputs`, with `marker` as output 0 (if
/// any) followed by `value_outputs` dust outputs.
pub fn build_raw(inputs: &[OutPoint], marker: Option<ScriptBuf>, value_outputs: usize) -> Vec<u8> {
    let mut output: Vec<TxOut> = marker
        .into_iter()
        .map(|script_pubkey| TxOut {
            value: Amount::ZERO,
            script_pubkey,
        })
        .collect();
    output.extend((0..value_outputs).map(|_| TxOut {
        value: Amount::from_sat(DUST_SATS),
        script_pubkey: ScriptBuf::new(),
    }));

    let tx = Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: inputs
            .iter()
            .map(|outpoint| TxIn {
                previous_output: *outpoint,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::default(),
            })
            .collect(),
        output,
    };
    serialize(&tx)
}

/// Outputs needed after the marker so that output 1 and the baton exist.
fn outputs_for(baton: Option<u32>) -> usize {
    baton.map_or(1, |vout| vout as usize).max(1)
}

/// In-memory ledger of published transactions.
pub struct Ledger {
    source: Arc<InMemoryTransactionSource>,
    nonce: AtomicU32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        init_tracing();
        Self {
            source: Arc::new(InMemoryTransactionSource::new()),
            nonce: AtomicU32::new(0),
        }
    }

    pub fn source(&self) -> Arc<InMemoryTransactionSource> {
        Arc::clone(&self.source)
    }

    pub fn engine(&self) -> ValidationEngine<InMemoryTransactionSource> {
        self.engine_with(ValidatorConfig::for_testing())
    }

    pub fn engine_with(&self, config: ValidatorConfig) -> ValidationEngine<InMemoryTransactionSource> {
        ValidationEngine::new(self.source(), config)
    }

    /// A fresh coinbase-style output to pay fees from. Each call yields a
    /// distinct transaction.
    pub fn funding(&self) -> OutPoint {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let coinbase = Transaction {
            version: Version::ONE,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: Builder::new().push_int(i64::from(nonce)).into_script(),
                sequence: Sequence::MAX,
                witness: Witness::default(),
            }],
            output: vec![TxOut {
                value: Amount::from_sat(50_000),
                script_pubkey: ScriptBuf::new(),
            }],
        };
        let txid = self.source.insert(serialize(&coinbase));
        OutPoint::new(txid, 0)
    }

    /// Store a transaction and return its id.
    pub fn publish(&self, inputs: &[OutPoint], marker: Option<ScriptBuf>, value_outputs: usize) -> Txid {
        self.source.insert(build_raw(inputs, marker, value_outputs))
    }

    /// Publish a transaction carrying `message`.
    pub fn publish_message(&self, inputs: &[OutPoint], message: &TokenMessage, value_outputs: usize) -> Txid {
        let script = encode(message).unwrap();
        self.publish(inputs, Some(script), value_outputs)
    }

    /// Publish a GENESIS funded by a fresh coinbase. Returns its txid, which
    /// is also the token id.
    pub fn genesis(&self, quantity: u64, baton: Option<u32>) -> Txid {
        let funding = self.funding();
        self.publish_message(&[funding], &genesis_message(quantity, baton), outputs_for(baton))
    }

    pub fn mint(&self, inputs: &[OutPoint], token_id: TokenId, quantity: u64, baton: Option<u32>) -> Txid {
        self.publish_message(inputs, &mint_message(token_id, quantity, baton), outputs_for(baton))
    }

    pub fn send(&self, inputs: &[OutPoint], token_id: TokenId, outputs: &[u64]) -> Txid {
        self.publish_message(inputs, &send_message(token_id, outputs), outputs.len())
    }

    /// Publish a transaction whose output 0 is an arbitrary script.
    pub fn publish_script(&self, inputs: &[OutPoint], script: Vec<u8>) -> Txid {
        self.publish(inputs, Some(ScriptBuf::from_bytes(script)), 1)
    }
}

/// A marker script with a literal `tag` and arbitrary trailing pushes.
pub fn raw_marker(tag: &[u8], fields: &[&[u8]]) -> Vec<u8> {
    let mut builder = Builder::new()
        .push_opcode(bitcoin::opcodes::all::OP_RETURN)
        .push_slice(push(b"SLP\x00"))
        .push_slice(push(&[0x01]))
        .push_slice(push(tag));
    for field in fields {
        builder = builder.push_slice(push(field));
    }
    builder.into_script().into_bytes()
}

fn push(data: &[u8]) -> PushBytesBuf {
    PushBytesBuf::try_from(data.to_vec()).unwrap()
}

/// Token id of a GENESIS txid.
pub fn token(genesis_txid: Txid) -> TokenId {
    TokenId::from(genesis_txid)
}
