//! # Validation Engine Service
//!
//! Application service that walks a transaction's token ancestry and records
//! one verdict per txid.
//!
//! ## Flow
//!
//! ```text
//! verdict(X) ──resolved?──→ return
//!     │
//!     └─ claim record ──→ [task X]  fetch → decode → load input ancestors
//!                                      → apply rules → verdict(parents) → resolve
//!        or wait on record ←───────────────────────────────────────┘
//! ```
//!
//! Every txid is computed by its own spawned task, so deep ancestry costs
//! tasks rather than stack, and a caller dropping its future leaves the shared
//! computation running for the other waiters.

use async_trait::async_trait;
use futures::future::{try_join_all, BoxFuture, FutureExt};
use shared_types::{compute_txid, OutPoint, TokenId, Txid};
use slp_01_message_codec::{
    decode_output_ownership, OutputOwnership, TokenMessage, TokenMetadata,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::domain::{
    blame_missing_inputs, check_conservation, collect_send_inputs, find_mint_authority,
    InvalidReason, LoadedTransaction, RecordState, Retrieval, SourceError, SpentOutput,
    ValidationCache, ValidationRecord, ValidatorError, ValidatorStats, Validity, Verdict,
};
use crate::ports::{TokenValidator, TransactionSource};

/// Token validation engine.
///
/// Cheap to clone; clones share the cache and the source.
pub struct ValidationEngine<S: TransactionSource + 'static> {
    inner: Arc<EngineInner<S>>,
}

struct EngineInner<S> {
    source: Arc<S>,
    cache: ValidationCache,
    config: ValidatorConfig,
    fetch_permits: Semaphore,
    fetches: AtomicU64,
}

impl<S: TransactionSource + 'static> Clone for ValidationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TransactionSource + 'static> ValidationEngine<S> {
    /// Create an engine with an empty cache.
    pub fn new(source: Arc<S>, config: ValidatorConfig) -> Self {
        let fetch_permits = Semaphore::new(config.fetch_permits());
        Self {
            inner: Arc::new(EngineInner {
                source,
                cache: ValidationCache::new(),
                config,
                fetch_permits,
                fetches: AtomicU64::new(0),
            }),
        }
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &ValidatorConfig {
        &self.inner.config
    }

    /// Whether `txid` is a valid token transaction.
    pub async fn is_valid(&self, txid: Txid) -> Result<bool, ValidatorError> {
        Ok(self.verdict(txid).await?.is_valid())
    }

    /// Verdict for `txid`, computing it if needed.
    pub async fn verdict(&self, txid: Txid) -> Result<Verdict, ValidatorError> {
        self.validate(txid).await
    }

    /// Recorded reason `txid` is invalid. `None` if valid or not resolved.
    pub fn invalid_reason(&self, txid: &Txid) -> Option<InvalidReason> {
        self.inner.cache.get(txid)?.verdict()?.invalid_reason()
    }

    /// Recorded validity, without computing anything.
    pub fn validity(&self, txid: &Txid) -> Validity {
        self.inner
            .cache
            .get(txid)
            .map(|record| record.validity())
            .unwrap_or(Validity::Unknown)
    }

    /// Contributing parents of `txid`, once validation determined them.
    pub fn parents(&self, txid: &Txid) -> Option<BTreeSet<Txid>> {
        let record = self.inner.cache.get(txid)?;
        record.parents().cloned()
    }

    /// Decoded message of `txid`, if it has been fetched and decodes.
    pub fn message(&self, txid: &Txid) -> Option<TokenMessage> {
        let record = self.inner.cache.get(txid)?;
        match record.retrieval()? {
            Retrieval::Found(loaded) => loaded.message().cloned(),
            Retrieval::NotFound => None,
        }
    }

    /// Seed the cache with a transaction and a verdict known from elsewhere.
    ///
    /// An invalid verdict is recorded with reason `Imported`. A record that
    /// already holds a verdict, or is being validated, keeps its own.
    pub fn preload(&self, raw: Vec<u8>, valid: bool) -> Result<Txid, ValidatorError> {
        let txid = compute_txid(&raw);
        let loaded =
            LoadedTransaction::from_raw(raw).map_err(|e| ValidatorError::CorruptTransaction {
                txid,
                reason: e.to_string(),
            })?;

        let record = self.inner.cache.record(txid);
        let _ = record
            .retrieval_cell()
            .set(Retrieval::Found(Arc::new(loaded)));
        if record.seed(Verdict::from(valid)) {
            debug!("[slp-02] Preloaded {} as {}", txid, if valid { "valid" } else { "invalid" });
        } else {
            debug!("[slp-02] Preload of {} ignored, record already claimed", txid);
        }
        Ok(txid)
    }

    /// Validate `txids` concurrently and return the valid ones in request
    /// order.
    pub async fn validate_transactions(&self, txids: &[Txid]) -> Result<Vec<Txid>, ValidatorError> {
        let verdicts = try_join_all(txids.iter().map(|txid| self.validate(*txid))).await?;
        Ok(txids
            .iter()
            .zip(verdicts)
            .filter(|(_, verdict)| verdict.is_valid())
            .map(|(txid, _)| *txid)
            .collect())
    }

    /// Descriptive metadata of a token, read from its GENESIS.
    pub async fn token_metadata(&self, token_id: &TokenId) -> Result<TokenMetadata, ValidatorError> {
        let txid = token_id.genesis_txid();
        let record = self.inner.cache.record(txid);
        let loaded = match self.load(&record).await? {
            Retrieval::Found(loaded) => loaded,
            Retrieval::NotFound => return Err(ValidatorError::TransactionNotFound(txid)),
        };
        match loaded.message() {
            Some(TokenMessage::Genesis(genesis)) => {
                Ok(TokenMetadata::from_genesis(*token_id, genesis))
            }
            _ => Err(ValidatorError::NotGenesis(*token_id)),
        }
    }

    /// Token held by `outpoint`. `None` when the transaction is not valid or
    /// the output carries nothing.
    pub async fn token_output(
        &self,
        outpoint: &OutPoint,
    ) -> Result<Option<OutputOwnership>, ValidatorError> {
        if !self.is_valid(outpoint.txid).await? {
            return Ok(None);
        }
        let record = self.inner.cache.record(outpoint.txid);
        match self.load(&record).await? {
            Retrieval::Found(loaded) => {
                Ok(decode_output_ownership(&loaded.transaction, outpoint.vout).ok())
            }
            Retrieval::NotFound => Ok(None),
        }
    }

    /// Cache and source usage counters.
    pub fn stats(&self) -> ValidatorStats {
        let (valid, invalid, unresolved) = self.inner.cache.validity_counts();
        ValidatorStats {
            records: valid + invalid + unresolved,
            valid,
            invalid,
            unresolved,
            fetches: self.inner.fetches.load(Ordering::Relaxed),
        }
    }

    /// Join or start the computation for `txid` and wait for it to settle.
    ///
    /// Boxed so that `evaluate` can await parents through it.
    fn validate(&self, txid: Txid) -> BoxFuture<'static, Result<Verdict, ValidatorError>> {
        let engine = self.clone();
        async move {
            let record = engine.inner.cache.record(txid);
            if let Some(verdict) = record.verdict() {
                return Ok(verdict);
            }

            let mut settled = record.subscribe();
            if record.try_begin() {
                engine.spawn_validation(Arc::clone(&record));
            }

            let state = settled
                .wait_for(RecordState::is_settled)
                .await
                .map_err(|_| ValidatorError::TaskAborted { txid })?
                .clone();
            match state {
                RecordState::Resolved(verdict) => Ok(verdict),
                RecordState::Aborted(error) => Err(error),
                RecordState::Unresolved | RecordState::Validating => {
                    Err(ValidatorError::TaskAborted { txid })
                }
            }
        }
        .boxed()
    }

    /// Run `evaluate` for a claimed record on its own task and publish the
    /// outcome. A panic in the worker aborts the record instead of leaving
    /// waiters hanging.
    fn spawn_validation(&self, record: Arc<ValidationRecord>) {
        let engine = self.clone();
        tokio::spawn(async move {
            let txid = record.txid();
            let worker = {
                let record = Arc::clone(&record);
                tokio::spawn(async move { engine.evaluate(&record).await })
            };

            match worker.await {
                Ok(Ok(verdict)) => {
                    let stored = record.resolve(verdict);
                    match stored {
                        Verdict::Valid => debug!("[slp-02] {} is valid", txid),
                        Verdict::Invalid(reason) => {
                            info!("[slp-02] {} is invalid: {}", txid, reason)
                        }
                    }
                }
                Ok(Err(error)) => {
                    warn!("[slp-02] Validation of {} failed: {}", txid, error);
                    record.abort(error);
                }
                Err(join_error) => {
                    warn!("[slp-02] Validation task for {} ended: {}", txid, join_error);
                    record.abort(ValidatorError::TaskAborted { txid });
                }
            }
        });
    }

    /// Compute the verdict of one claimed record.
    async fn evaluate(&self, record: &ValidationRecord) -> Result<Verdict, ValidatorError> {
        let txid = record.txid();
        let loaded = match self.load(record).await? {
            Retrieval::Found(loaded) => loaded,
            Retrieval::NotFound => {
                debug!("[slp-02] {} not found", txid);
                return Ok(Verdict::Invalid(InvalidReason::MissingAncestor));
            }
        };

        let message = match &loaded.message {
            Ok(message) => message,
            Err(error) => {
                debug!("[slp-02] {} does not decode: {}", txid, error);
                return Ok(Verdict::Invalid(InvalidReason::from(error)));
            }
        };
        if let TokenMessage::Genesis(_) = message {
            record.set_parents(BTreeSet::new());
            return Ok(Verdict::Valid);
        }

        let ancestors = self.load_ancestors(&loaded).await?;
        let spent: Vec<SpentOutput<'_>> = loaded
            .spent_outpoints()
            .filter_map(|outpoint| {
                let message = ancestors.found.get(&outpoint.txid)?.message()?;
                Some(SpentOutput { outpoint, message })
            })
            .collect();

        let outcome = match message {
            TokenMessage::Mint(mint) => {
                find_mint_authority(&mint.token_id, &spent).map(|baton| BTreeSet::from([baton]))
            }
            TokenMessage::Send(send) => {
                let inputs = collect_send_inputs(&send.token_id, &spent);
                check_conservation(&send.outputs, inputs.total).map(|()| inputs.parents)
            }
            TokenMessage::Genesis(_) => Ok(BTreeSet::new()),
        };
        let parents = match outcome {
            Ok(parents) => parents,
            Err(reason) if ancestors.missing.is_empty() => return Ok(Verdict::Invalid(reason)),
            Err(reason) => {
                debug!(
                    "[slp-02] {} failed with {} ancestors unknown",
                    txid,
                    ancestors.missing.len()
                );
                return Ok(Verdict::Invalid(blame_missing_inputs(message, &spent, reason)));
            }
        };

        record.set_parents(parents.clone());
        let verdicts = try_join_all(parents.iter().map(|parent| self.validate(*parent))).await?;
        if verdicts.iter().any(|verdict| !verdict.is_valid()) {
            return Ok(Verdict::Invalid(InvalidReason::InvalidParent));
        }
        Ok(Verdict::Valid)
    }

    /// Load every distinct transaction spent by `loaded`. Ancestors the
    /// source does not know are listed separately.
    async fn load_ancestors(&self, loaded: &LoadedTransaction) -> Result<Ancestors, ValidatorError> {
        let txids: BTreeSet<Txid> = loaded.spent_outpoints().map(|outpoint| outpoint.txid).collect();
        let records: Vec<Arc<ValidationRecord>> = txids
            .iter()
            .map(|txid| self.inner.cache.record(*txid))
            .collect();
        let retrievals = try_join_all(records.iter().map(|record| self.load(record))).await?;

        let mut ancestors = Ancestors::default();
        for (txid, retrieval) in txids.into_iter().zip(retrievals) {
            match retrieval {
                Retrieval::Found(ancestor) => {
                    ancestors.found.insert(txid, ancestor);
                }
                Retrieval::NotFound => {
                    debug!("[slp-02] Ancestor {} not found", txid);
                    ancestors.missing.push(txid);
                }
            }
        }
        Ok(ancestors)
    }

    /// Memoized retrieval of a record's transaction. Concurrent callers share
    /// one fetch; a failed fetch is not memoized.
    async fn load(&self, record: &ValidationRecord) -> Result<Retrieval, ValidatorError> {
        record
            .retrieval_cell()
            .get_or_try_init(|| self.fetch(record.txid()))
            .await
            .cloned()
    }

    async fn fetch(&self, txid: Txid) -> Result<Retrieval, ValidatorError> {
        let _permit = self
            .inner
            .fetch_permits
            .acquire()
            .await
            .map_err(|_| ValidatorError::TaskAborted { txid })?;
        self.inner.fetches.fetch_add(1, Ordering::Relaxed);
        debug!("[slp-02] Fetching {}", txid);

        let timeout_ms = self.inner.config.fetch_timeout_ms;
        let answer = tokio::time::timeout(
            self.inner.config.fetch_timeout(),
            self.inner.source.fetch_raw_transactions(&[txid]),
        )
        .await
        .map_err(|_| ValidatorError::FetchTimeout { txid, timeout_ms })?;

        let raw = match answer {
            Ok(entries) => entries
                .into_iter()
                .find(|(id, _)| *id == txid)
                .map(|(_, raw)| raw),
            Err(SourceError::NotFound(_)) => None,
            Err(error) => return Err(error.into()),
        };
        let Some(raw) = raw else {
            return Ok(Retrieval::NotFound);
        };

        let actual = compute_txid(&raw);
        if actual != txid {
            warn!("[slp-02] Source returned {} when asked for {}", actual, txid);
            return Err(ValidatorError::CorruptTransaction {
                txid,
                reason: format!("bytes hash to {}", actual),
            });
        }
        let loaded = LoadedTransaction::from_raw(raw).map_err(|e| {
            ValidatorError::CorruptTransaction {
                txid,
                reason: e.to_string(),
            }
        })?;
        Ok(Retrieval::Found(Arc::new(loaded)))
    }
}

/// Transactions spent by the one being validated.
#[derive(Default)]
struct Ancestors {
    found: HashMap<Txid, Arc<LoadedTransaction>>,
    missing: Vec<Txid>,
}

#[async_trait]
impl<S: TransactionSource + 'static> TokenValidator for ValidationEngine<S> {
    async fn is_valid(&self, txid: Txid) -> Result<bool, ValidatorError> {
        ValidationEngine::is_valid(self, txid).await
    }

    fn invalid_reason(&self, txid: &Txid) -> Option<InvalidReason> {
        ValidationEngine::invalid_reason(self, txid)
    }

    async fn validate_transactions(&self, txids: &[Txid]) -> Result<Vec<Txid>, ValidatorError> {
        ValidationEngine::validate_transactions(self, txids).await
    }
}
