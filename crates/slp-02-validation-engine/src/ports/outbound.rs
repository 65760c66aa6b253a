//! # Outbound Ports
//!
//! Where raw transactions come from.

use async_trait::async_trait;
use shared_types::Txid;

use crate::domain::SourceError;

/// Source of consensus-serialized transactions - outbound port.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch raw transactions by id.
    ///
    /// Ids the source does not know may be omitted from the answer or
    /// reported as `SourceError::NotFound`. Extra entries are ignored.
    async fn fetch_raw_transactions(
        &self,
        txids: &[Txid],
    ) -> Result<Vec<(Txid, Vec<u8>)>, SourceError>;
}
