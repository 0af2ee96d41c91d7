//! Pure mapping from relay notifications to [`BundleOutcome`].

use crate::outcome::types::{BundleOutcome, RejectionReason};
use crate::relay::types::{
    BundleResultEvent, BundleResultKind, InflightBundleStatus, InflightStatus, RejectedReason,
};

/// Classify one streamed bundle result event.
///
/// A rejection with no recognizable reason is reported as an internal
/// error rather than silently accepted.
pub fn classify_event(event: &BundleResultEvent) -> BundleOutcome {
    match &event.result {
        None => BundleOutcome::Unknown,
        Some(BundleResultKind::Accepted(accepted)) => BundleOutcome::Accepted {
            slot: Some(accepted.slot),
        },
        Some(BundleResultKind::Rejected(rejected)) => {
            BundleOutcome::Rejected(classify_rejection(&event.bundle_id, rejected.reason.as_ref()))
        }
    }
}

fn classify_rejection(bundle_id: &str, reason: Option<&RejectedReason>) -> RejectionReason {
    match reason {
        Some(RejectedReason::SimulationFailure { tx_signature, msg }) => {
            RejectionReason::SimulationFailure {
                signature: tx_signature.clone(),
                message: msg.clone().unwrap_or_default(),
            }
        }
        Some(RejectedReason::StateAuctionBidRejected {
            auction_id,
            simulated_bid_lamports,
        }) => RejectionReason::StateAuctionBidRejected {
            auction_id: auction_id.clone(),
            bid_lamports: *simulated_bid_lamports,
        },
        Some(RejectedReason::WinningBatchBidRejected {
            auction_id,
            simulated_bid_lamports,
        }) => RejectionReason::WinningBatchBidRejected {
            auction_id: auction_id.clone(),
            bid_lamports: *simulated_bid_lamports,
        },
        Some(RejectedReason::InternalError { msg }) => {
            RejectionReason::InternalError { message: msg.clone() }
        }
        Some(RejectedReason::DroppedBundle { msg }) => {
            RejectionReason::Dropped { message: msg.clone() }
        }
        None => RejectionReason::InternalError {
            message: format!("bundle {} rejected with unrecognized reason", bundle_id),
        },
    }
}

/// Classify the entry for `bundle_id` in a polled status list.
///
/// No matching entry means the relay does not know the bundle yet.
pub fn classify_inflight(statuses: &[InflightBundleStatus], bundle_id: &str) -> BundleOutcome {
    let Some(entry) = statuses.iter().find(|s| s.bundle_id == bundle_id) else {
        return BundleOutcome::Unknown;
    };

    match entry.status {
        InflightStatus::Pending => BundleOutcome::Pending,
        InflightStatus::Landed => BundleOutcome::Landed {
            slot: entry.landed_slot,
        },
        InflightStatus::Invalid => BundleOutcome::Rejected(RejectionReason::Invalid {
            bundle_id: bundle_id.to_string(),
        }),
        InflightStatus::Failed => BundleOutcome::Rejected(RejectionReason::Failed {
            bundle_id: bundle_id.to_string(),
        }),
        InflightStatus::Unrecognized => BundleOutcome::Rejected(RejectionReason::InternalError {
            message: format!("bundle {} reported an unknown status", bundle_id),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inflight(bundle_id: &str, status: InflightStatus) -> InflightBundleStatus {
        InflightBundleStatus {
            bundle_id: bundle_id.to_string(),
            status,
            landed_slot: None,
        }
    }

    #[test]
    fn test_accepted_event() {
        let event = BundleResultEvent::accepted("b1", 42);
        assert_eq!(classify_event(&event), BundleOutcome::Accepted { slot: Some(42) });
    }

    #[test]
    fn test_each_rejection_reason() {
        let cases = vec![
            (
                RejectedReason::SimulationFailure {
                    tx_signature: "5sig".to_string(),
                    msg: Some("insufficient funds".to_string()),
                },
                "bundle simulation failure on tx 5sig, message: insufficient funds",
            ),
            (
                RejectedReason::StateAuctionBidRejected {
                    auction_id: "a1".to_string(),
                    simulated_bid_lamports: 1000,
                },
                "bundle lost state auction, auction: a1, tip 1000 lamports",
            ),
            (
                RejectedReason::WinningBatchBidRejected {
                    auction_id: "a2".to_string(),
                    simulated_bid_lamports: 7,
                },
                "bundle won state auction but failed global auction, auction a2, tip 7 lamports",
            ),
            (
                RejectedReason::InternalError {
                    msg: "oops".to_string(),
                },
                "internal error oops",
            ),
            (
                RejectedReason::DroppedBundle {
                    msg: "expired".to_string(),
                },
                "bundle dropped expired",
            ),
        ];

        for (reason, expected) in cases {
            let event = BundleResultEvent::rejected("b1", Some(reason));
            let outcome = classify_event(&event);
            assert!(outcome.is_terminal());
            assert_eq!(outcome.rejection().unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_classification_is_repeatable() {
        let event = BundleResultEvent::rejected(
            "b1",
            Some(RejectedReason::DroppedBundle {
                msg: "x".to_string(),
            }),
        );
        assert_eq!(classify_event(&event), classify_event(&event));
    }

    #[test]
    fn test_unrecognized_reason_is_internal_error() {
        let outcome = classify_event(&BundleResultEvent::rejected("b9", None));
        assert!(matches!(
            outcome,
            BundleOutcome::Rejected(RejectionReason::InternalError { .. })
        ));
    }

    #[test]
    fn test_new_wire_reason_is_internal_error() {
        let json = r#"{"bundle_id": "b9", "result": {"rejected": {"reason": {"fee_too_low": {"min": 1000}}}}}"#;
        let event: BundleResultEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            classify_event(&event),
            BundleOutcome::Rejected(RejectionReason::InternalError {
                message: "bundle b9 rejected with unrecognized reason".to_string()
            })
        );
    }

    #[test]
    fn test_event_without_result_is_unknown() {
        let event = BundleResultEvent {
            bundle_id: "b1".to_string(),
            result: None,
        };
        assert_eq!(classify_event(&event), BundleOutcome::Unknown);
    }

    #[test]
    fn test_inflight_statuses() {
        let statuses = vec![
            inflight("pending", InflightStatus::Pending),
            inflight("invalid", InflightStatus::Invalid),
            inflight("failed", InflightStatus::Failed),
            InflightBundleStatus {
                bundle_id: "landed".to_string(),
                status: InflightStatus::Landed,
                landed_slot: Some(99),
            },
        ];

        assert_eq!(classify_inflight(&statuses, "pending"), BundleOutcome::Pending);
        assert_eq!(
            classify_inflight(&statuses, "landed"),
            BundleOutcome::Landed { slot: Some(99) }
        );
        assert_eq!(
            classify_inflight(&statuses, "invalid"),
            BundleOutcome::Rejected(RejectionReason::Invalid {
                bundle_id: "invalid".to_string()
            })
        );
        assert_eq!(
            classify_inflight(&statuses, "failed").rejection().unwrap().to_string(),
            "bundle failed failed to land"
        );
        assert_eq!(classify_inflight(&statuses, "missing"), BundleOutcome::Unknown);
    }

    #[test]
    fn test_unrecognized_inflight_status() {
        let statuses = vec![inflight("b1", InflightStatus::Unrecognized)];
        assert!(classify_inflight(&statuses, "b1").is_terminal());
    }
}
