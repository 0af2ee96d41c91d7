//! Relay transport seams.
//!
//! Every call takes the full `Authorization` header value so the caller
//! decides which credential is current.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use solana_sdk::pubkey::Pubkey;

use crate::bundle::Bundle;
use crate::error::TransportError;
use crate::relay::types::{BundleResultEvent, InflightBundleStatuses, RelayAck, SentTransaction};

/// Stream of bundle result notifications.
pub type BundleResultStream = BoxStream<'static, Result<BundleResultEvent, TransportError>>;

/// Request/response relay operations.
#[async_trait]
pub trait BundleRelay: Send + Sync {
    /// Submit an assembled bundle.
    async fn send_bundle(
        &self,
        bundle: &Bundle,
        authorization: Option<&str>,
    ) -> Result<RelayAck, TransportError>;

    /// Current tip-receiving addresses.
    async fn get_tip_accounts(
        &self,
        authorization: Option<&str>,
    ) -> Result<Vec<Pubkey>, TransportError>;

    /// Submit one serialized transaction, optionally as a single-transaction bundle.
    async fn send_transaction(
        &self,
        wire: &[u8],
        bundle_only: bool,
        authorization: Option<&str>,
    ) -> Result<SentTransaction, TransportError>;
}

/// Streaming bundle result subscription.
#[async_trait]
pub trait BundleResultSource: Send + Sync {
    async fn subscribe_bundle_results(
        &self,
        authorization: Option<&str>,
    ) -> Result<BundleResultStream, TransportError>;
}

/// Polled bundle status lookup.
#[async_trait]
pub trait InflightStatusSource: Send + Sync {
    async fn get_inflight_bundle_statuses(
        &self,
        bundle_ids: &[String],
        authorization: Option<&str>,
    ) -> Result<InflightBundleStatuses, TransportError>;
}
