//! Normalized bundle outcome.

use thiserror::Error;

/// Why the relay refused a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("bundle simulation failure on tx {signature}, message: {message}")]
    SimulationFailure { signature: String, message: String },

    #[error("bundle lost state auction, auction: {auction_id}, tip {bid_lamports} lamports")]
    StateAuctionBidRejected { auction_id: String, bid_lamports: u64 },

    #[error(
        "bundle won state auction but failed global auction, auction {auction_id}, tip {bid_lamports} lamports"
    )]
    WinningBatchBidRejected { auction_id: String, bid_lamports: u64 },

    #[error("internal error {message}")]
    InternalError { message: String },

    #[error("bundle dropped {message}")]
    Dropped { message: String },

    /// Polled status `Invalid`.
    #[error("bundle {bundle_id} is invalid")]
    Invalid { bundle_id: String },

    /// Polled status `Failed`.
    #[error("bundle {bundle_id} failed to land")]
    Failed { bundle_id: String },
}

impl RejectionReason {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::SimulationFailure { .. } => "simulation_failure",
            RejectionReason::StateAuctionBidRejected { .. } => "state_auction_bid_rejected",
            RejectionReason::WinningBatchBidRejected { .. } => "winning_batch_bid_rejected",
            RejectionReason::InternalError { .. } => "internal_error",
            RejectionReason::Dropped { .. } => "dropped",
            RejectionReason::Invalid { .. } => "invalid",
            RejectionReason::Failed { .. } => "failed",
        }
    }
}

/// Relay-side view of a bundle, shared by the stream and polling transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// Accepted for auction; ledger confirmation still required.
    Accepted { slot: Option<u64> },
    /// Polled status reports the bundle on chain.
    Landed { slot: Option<u64> },
    /// Relay still processing.
    Pending,
    /// Nothing known yet about this bundle.
    Unknown,
    /// Terminal refusal.
    Rejected(RejectionReason),
}

impl BundleOutcome {
    /// Terminal outcomes end reconciliation without a ledger check.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BundleOutcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            BundleOutcome::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
