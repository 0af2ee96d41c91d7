//! Relay wire types.

use serde::{Deserialize, Deserializer, Serialize};
use solana_sdk::signature::Signature;

use crate::ledger::types::RpcContextual;

/// One notification from the bundle result subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleResultEvent {
    pub bundle_id: String,
    /// `None` when the relay sent an event without a result body.
    #[serde(default)]
    pub result: Option<BundleResultKind>,
}

impl BundleResultEvent {
    pub fn accepted(bundle_id: impl Into<String>, slot: u64) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            result: Some(BundleResultKind::Accepted(AcceptedResult {
                slot,
                validator_identity: String::new(),
            })),
        }
    }

    pub fn rejected(bundle_id: impl Into<String>, reason: Option<RejectedReason>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            result: Some(BundleResultKind::Rejected(RejectedResult { reason })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleResultKind {
    Accepted(AcceptedResult),
    Rejected(RejectedResult),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedResult {
    pub slot: u64,
    #[serde(default)]
    pub validator_identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedResult {
    /// `None` when the reason is missing or uses a shape this client does not
    /// know.
    #[serde(default, deserialize_with = "known_reason")]
    pub reason: Option<RejectedReason>,
}

fn known_reason<'de, D>(deserializer: D) -> Result<Option<RejectedReason>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value) {
        Ok(reason) => Some(reason),
        Err(e) => {
            tracing::debug!(error = %e, "Unrecognized bundle rejection reason");
            None
        }
    }))
}

/// Rejection sub-types reported on the result stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectedReason {
    StateAuctionBidRejected {
        auction_id: String,
        simulated_bid_lamports: u64,
    },
    WinningBatchBidRejected {
        auction_id: String,
        simulated_bid_lamports: u64,
    },
    SimulationFailure {
        tx_signature: String,
        #[serde(default)]
        msg: Option<String>,
    },
    InternalError {
        msg: String,
    },
    DroppedBundle {
        msg: String,
    },
}

/// Status string of `getInflightBundleStatuses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InflightStatus {
    Invalid,
    Pending,
    Failed,
    Landed,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflightBundleStatus {
    pub bundle_id: String,
    pub status: InflightStatus,
    #[serde(default)]
    pub landed_slot: Option<u64>,
}

/// `{context, value}` result of `getInflightBundleStatuses`.
pub type InflightBundleStatuses = RpcContextual<Vec<InflightBundleStatus>>;

/// Relay answer to `sendBundle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayAck {
    /// Raw acknowledgement value returned by the relay.
    pub acknowledgement: String,
    /// Relay-assigned bundle id, when the relay issues one.
    pub bundle_id: Option<String>,
}

/// Relay answer to `sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub signature: Signature,
    /// Taken from the `x-bundle-id` response header.
    pub bundle_id: Option<String>,
}
