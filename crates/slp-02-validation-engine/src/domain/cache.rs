//! # Validation Cache
//!
//! One `ValidationRecord` per txid, created on first touch and kept for the
//! life of the engine.
//!
//! ## Record Lifecycle
//!
//! ```text
//! Unresolved ──try_begin──→ Validating ──resolve──→ Resolved(verdict)   (final)
//!      ↑                        │
//!      └──────try_begin──── Aborted(error) ←──abort──┘
//! ```
//!
//! - The retrieval (bytes, parse, decode) is a `OnceCell`: every caller shares
//!   one fetch and a "not found" answer is kept. Source faults leave the cell
//!   empty.
//! - The state is a `watch` channel: waiters are woken when the owning task
//!   publishes, and a late subscriber sees the current value immediately.
//! - `Resolved` is never overwritten.

use parking_lot::RwLock;
use shared_types::Txid;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};
use tokio::sync::{watch, OnceCell};

use super::entities::{Retrieval, Validity, Verdict};
use super::errors::ValidatorError;

/// Progress of one txid's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// Nobody has started validating.
    Unresolved,
    /// A task owns the computation.
    Validating,
    /// Final verdict.
    Resolved(Verdict),
    /// The last attempt failed; the next caller retries.
    Aborted(ValidatorError),
}

impl RecordState {
    /// Whether waiters can stop waiting.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Aborted(_))
    }
}

/// Everything known about one txid.
#[derive(Debug)]
pub struct ValidationRecord {
    txid: Txid,
    retrieval: OnceCell<Retrieval>,
    parents: OnceLock<BTreeSet<Txid>>,
    state: watch::Sender<RecordState>,
}

impl ValidationRecord {
    /// Create an unresolved record.
    pub fn new(txid: Txid) -> Self {
        let (state, _) = watch::channel(RecordState::Unresolved);
        Self {
            txid,
            retrieval: OnceCell::new(),
            parents: OnceLock::new(),
            state,
        }
    }

    pub fn txid(&self) -> Txid {
        self.txid
    }

    /// Final verdict, if resolved.
    pub fn verdict(&self) -> Option<Verdict> {
        match *self.state.borrow() {
            RecordState::Resolved(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn validity(&self) -> Validity {
        Validity::from(self.verdict())
    }

    /// Current state.
    pub fn state(&self) -> RecordState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<RecordState> {
        self.state.subscribe()
    }

    /// Claim the computation. True only for the caller that moved the record
    /// from `Unresolved` or `Aborted` to `Validating`.
    pub fn try_begin(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            RecordState::Unresolved | RecordState::Aborted(_) => {
                *state = RecordState::Validating;
                true
            }
            RecordState::Validating | RecordState::Resolved(_) => false,
        })
    }

    /// Publish `verdict` unless one is already recorded. Returns the verdict
    /// the record holds afterwards.
    pub fn resolve(&self, verdict: Verdict) -> Verdict {
        let mut stored = verdict;
        self.state.send_if_modified(|state| match state {
            RecordState::Resolved(existing) => {
                stored = *existing;
                false
            }
            _ => {
                *state = RecordState::Resolved(verdict);
                true
            }
        });
        stored
    }

    /// Record a verdict supplied from outside, if nobody is computing one.
    /// Returns false when the record is validating or already resolved.
    pub fn seed(&self, verdict: Verdict) -> bool {
        self.state.send_if_modified(|state| match state {
            RecordState::Unresolved | RecordState::Aborted(_) => {
                *state = RecordState::Resolved(verdict);
                true
            }
            RecordState::Validating | RecordState::Resolved(_) => false,
        })
    }

    /// Give up the computation after a fault, waking waiters with `error`.
    pub fn abort(&self, error: ValidatorError) {
        self.state.send_if_modified(|state| match state {
            RecordState::Validating => {
                *state = RecordState::Aborted(error);
                true
            }
            _ => false,
        });
    }

    pub(crate) fn retrieval_cell(&self) -> &OnceCell<Retrieval> {
        &self.retrieval
    }

    /// Memoized retrieval, if the transaction has been fetched or preloaded.
    pub fn retrieval(&self) -> Option<&Retrieval> {
        self.retrieval.get()
    }

    /// Contributing parents, once determined.
    pub fn parents(&self) -> Option<&BTreeSet<Txid>> {
        self.parents.get()
    }

    /// Record the parent set. The first write wins.
    pub fn set_parents(&self, parents: BTreeSet<Txid>) {
        let _ = self.parents.set(parents);
    }
}

/// Shared map of records.
#[derive(Debug, Default)]
pub struct ValidationCache {
    records: RwLock<HashMap<Txid, Arc<ValidationRecord>>>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `txid`, created if absent.
    pub fn record(&self, txid: Txid) -> Arc<ValidationRecord> {
        if let Some(record) = self.records.read().get(&txid) {
            return Arc::clone(record);
        }
        let mut records = self.records.write();
        Arc::clone(
            records
                .entry(txid)
                .or_insert_with(|| Arc::new(ValidationRecord::new(txid))),
        )
    }

    /// Existing record for `txid`.
    pub fn get(&self, txid: &Txid) -> Option<Arc<ValidationRecord>> {
        self.records.read().get(txid).cloned()
    }

    /// Number of txids with a record, resolved or not.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no record has been created yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Count records by validity: (valid, invalid, unresolved).
    pub fn validity_counts(&self) -> (usize, usize, usize) {
        self.records
            .read()
            .values()
            .fold((0, 0, 0), |(valid, invalid, unknown), record| {
                match record.validity() {
                    Validity::Valid => (valid + 1, invalid, unknown),
                    Validity::Invalid => (valid, invalid + 1, unknown),
                    Validity::Unknown => (valid, invalid, unknown + 1),
                }
            })
    }
}
