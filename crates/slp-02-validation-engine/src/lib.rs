//! # SLP Validation Engine (slp-02)
//!
//! Decides whether a transaction is a valid token transaction by walking the
//! ancestry that fed it token value.
//!
//! ## Validity Rules
//!
//! | Type | Valid when |
//! |------|------------|
//! | GENESIS | Always (once it decodes) |
//! | MINT | Exactly one input spends a baton of the same token, and that parent is valid |
//! | SEND | Declared outputs do not exceed the quantities spent, and every contributing parent is valid |
//!
//! Inputs whose transaction cannot be found are left out of the rules. If the
//! rules then fail for want of value or of a baton, the verdict is
//! `MissingAncestor` instead of `Inflation` or `InvalidMintAuthority`.
//! Spending less than the inputs hold burns the difference and is allowed.
//!
//! ## Memoization
//!
//! | Stored per txid | Written | Shared by |
//! |-----------------|---------|-----------|
//! | Raw bytes, parsed transaction, decode result | first successful fetch | all callers |
//! | "Not found" answer | first fetch | all callers |
//! | Verdict | once, by the task that computed it | all callers |
//! | Contributing parents | once | all callers |
//!
//! Source faults (network errors, timeouts, bytes that do not hash to the
//! requested id) are returned as `ValidatorError` and never memoized.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): verdicts, record cache, pure rules
//! - **Ports Layer** (`ports/`): `TokenValidator` inbound, `TransactionSource` outbound
//! - **Adapters Layer** (`adapters/`): in-memory transaction source
//! - **Application Layer** (`application/`): `ValidationEngine`

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryTransactionSource, MissingPolicy};
pub use application::ValidationEngine;
pub use config::ValidatorConfig;
pub use domain::{
    InvalidReason, LoadedTransaction, RecordState, Retrieval, SourceError, ValidationCache,
    ValidationRecord, ValidatorError, ValidatorStats, Validity, Verdict,
};
pub use ports::{TokenValidator, TransactionSource};
