//! In-Memory Transaction Source Adapter
//!
//! Implements `TransactionSource` over a map of raw transactions. Used by
//! hosts that already hold the relevant transactions and by tests, which can
//! inject failures and latency and inspect how often each id was fetched.

use crate::domain::SourceError;
use crate::ports::outbound::TransactionSource;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{compute_txid, Txid};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// How the source reports an unknown id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Leave the id out of the answer.
    #[default]
    Omit,
    /// Fail the call with `SourceError::NotFound`.
    Error,
}

/// Transaction source backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryTransactionSource {
    transactions: RwLock<HashMap<Txid, Vec<u8>>>,
    failures: RwLock<HashMap<Txid, SourceError>>,
    fetch_counts: RwLock<HashMap<Txid, u64>>,
    total_calls: AtomicU64,
    latency: RwLock<Option<Duration>>,
    missing: RwLock<MissingPolicy>,
}

impl InMemoryTransactionSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw transaction under its computed txid.
    pub fn insert(&self, raw: Vec<u8>) -> Txid {
        let txid = compute_txid(&raw);
        self.transactions.write().insert(txid, raw);
        txid
    }

    /// Store bytes under an arbitrary id, whether or not they hash to it.
    pub fn insert_as(&self, txid: Txid, raw: Vec<u8>) {
        self.transactions.write().insert(txid, raw);
    }

    /// Make every fetch that includes `txid` fail with `error`.
    pub fn fail_with(&self, txid: Txid, error: SourceError) {
        self.failures.write().insert(txid, error);
    }

    /// Remove an injected failure.
    pub fn clear_failure(&self, txid: &Txid) {
        self.failures.write().remove(txid);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = Some(latency);
    }

    /// Choose how unknown ids are reported.
    pub fn set_missing_policy(&self, policy: MissingPolicy) {
        *self.missing.write() = policy;
    }

    /// Times `txid` was requested.
    pub fn fetch_count(&self, txid: &Txid) -> u64 {
        self.fetch_counts.read().get(txid).copied().unwrap_or(0)
    }

    /// Calls made to `fetch_raw_transactions`.
    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

#[async_trait]
impl TransactionSource for InMemoryTransactionSource {
    async fn fetch_raw_transactions(
        &self,
        txids: &[Txid],
    ) -> Result<Vec<(Txid, Vec<u8>)>, SourceError> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut counts = self.fetch_counts.write();
            for txid in txids {
                *counts.entry(*txid).or_insert(0) += 1;
            }
        }

        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = txids
            .iter()
            .find_map(|txid| self.failures.read().get(txid).cloned())
        {
            debug!("[slp-02] In-memory source failing fetch: {}", error);
            return Err(error);
        }

        let policy = *self.missing.read();
        let transactions = self.transactions.read();
        let mut found = Vec::with_capacity(txids.len());
        for txid in txids {
            match transactions.get(txid) {
                Some(raw) => found.push((*txid, raw.clone())),
                None if policy == MissingPolicy::Error => {
                    return Err(SourceError::NotFound(*txid))
                }
                None => {}
            }
        }
        Ok(found)
    }
}
