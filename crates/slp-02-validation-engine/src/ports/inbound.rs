//! # Inbound Ports
//!
//! API trait defining what a token validator answers. The local engine
//! implements it; a remote validation service would implement the same
//! contract.

use async_trait::async_trait;
use shared_types::Txid;

use crate::domain::{InvalidReason, ValidatorError};

/// Token validator API - inbound port.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Whether `txid` is a valid token transaction.
    async fn is_valid(&self, txid: Txid) -> Result<bool, ValidatorError>;

    /// Reason `txid` was judged invalid. `None` when valid or not yet judged.
    fn invalid_reason(&self, txid: &Txid) -> Option<InvalidReason>;

    /// Validate many transactions, returning the valid ones in request order.
    async fn validate_transactions(&self, txids: &[Txid]) -> Result<Vec<Txid>, ValidatorError>;
}
