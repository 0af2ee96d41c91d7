//! Confirmation results.

use std::time::Duration;
use tokio::time::Instant;

use crate::bundle::BundleSubmissionHandle;
use crate::error::{BundleError, BundleResult};
use crate::ledger::SignatureStatus;
use crate::outcome::RejectionReason;

/// Time budget for one submit-and-confirm call, fixed when the call starts.
///
/// Submission and reconciliation share it, so a slow relay answer eats into
/// the time left for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Budget starting now.
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn expires_at(&self) -> Instant {
        self.started + self.budget
    }
}

/// Terminal state of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalOutcome {
    /// Every signature reached the required commitment.
    Landed,
    /// The relay rejected the bundle.
    Failed(RejectionReason),
    /// The deadline fired first.
    TimedOut,
}

impl FinalOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            FinalOutcome::Landed => "landed",
            FinalOutcome::Failed(reason) => reason.label(),
            FinalOutcome::TimedOut => "timed_out",
        }
    }
}

/// Outcome of following one submission to a terminal state.
#[derive(Debug, Clone)]
pub struct ConfirmationResult {
    pub handle: BundleSubmissionHandle,
    pub final_outcome: FinalOutcome,
    /// Last observed status per signature, in handle order.
    pub statuses: Vec<Option<SignatureStatus>>,
    pub elapsed: Duration,
    pub deadline: Duration,
}

impl ConfirmationResult {
    pub fn is_landed(&self) -> bool {
        self.final_outcome == FinalOutcome::Landed
    }

    /// Keep landed results, turn the other terminal states into errors.
    pub fn into_landed(self) -> BundleResult<ConfirmationResult> {
        match self.final_outcome {
            FinalOutcome::Landed => Ok(self),
            FinalOutcome::Failed(reason) => Err(BundleError::Rejected(reason)),
            FinalOutcome::TimedOut => Err(BundleError::ConfirmationTimeout {
                deadline: self.deadline,
            }),
        }
    }
}
