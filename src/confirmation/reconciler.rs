//! Relay/ledger reconciliation state machine.
//!
//! # Responsibilities
//! - Wait for the relay's verdict on a submitted bundle
//! - Poll ledger signature statuses until every signature lands
//! - Stop on rejection, deadline or cancellation, whichever comes first

use futures_util::StreamExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::{interval, sleep_until, MissedTickBehavior, Sleep};

use crate::auth::CredentialStore;
use crate::bundle::BundleSubmissionHandle;
use crate::config::ConfirmationConfig;
use crate::confirmation::types::{ConfirmationResult, Deadline, FinalOutcome};
use crate::error::{BundleError, BundleResult, TransportError};
use crate::ledger::types::all_confirmed;
use crate::ledger::{LedgerRpc, SignatureStatus};
use crate::observability::metrics;
use crate::outcome::{classify_event, classify_inflight, BundleOutcome};
use crate::relay::{BundleResultStream, InflightStatusSource};

/// Result of waiting on one step while watching cancellation and the deadline.
enum Race<T> {
    Done(T),
    Cancelled,
    Expired,
}

async fn race<T, C>(
    cancel: &mut Pin<&mut C>,
    deadline: &mut Pin<&mut Sleep>,
    work: impl Future<Output = T>,
) -> Race<T>
where
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel.as_mut() => Race::Cancelled,
        _ = deadline.as_mut() => Race::Expired,
        value = work => Race::Done(value),
    }
}

/// No status seen yet for any signature of `handle`.
fn unseen(handle: &BundleSubmissionHandle) -> Vec<Option<SignatureStatus>> {
    vec![None; handle.signatures().len()]
}

enum Tick {
    Relay,
    Ledger,
}

/// Follows submissions to `Landed`, `Failed` or `TimedOut`.
#[derive(Clone)]
pub struct Reconciler {
    ledger: Arc<dyn LedgerRpc>,
    config: ConfirmationConfig,
    credentials: Option<CredentialStore>,
}

impl Reconciler {
    pub fn new(ledger: Arc<dyn LedgerRpc>, config: ConfirmationConfig) -> Self {
        Self {
            ledger,
            config,
            credentials: None,
        }
    }

    /// Authorize relay status polls with `credentials`.
    pub fn with_credentials(mut self, credentials: Option<CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn config(&self) -> &ConfirmationConfig {
        &self.config
    }

    /// Reconcile using a bundle result stream.
    ///
    /// Events for other bundles are skipped. A rejection ends immediately
    /// without touching the ledger. Accepted or result-less events move on to
    /// ledger polling. The stream must have been opened before submission.
    pub async fn reconcile_stream<C>(
        &self,
        handle: BundleSubmissionHandle,
        mut events: BundleResultStream,
        deadline: Deadline,
        cancel: C,
    ) -> BundleResult<ConfirmationResult>
    where
        C: Future<Output = ()>,
    {
        let expiry = sleep_until(deadline.expires_at());
        tokio::pin!(expiry);
        tokio::pin!(cancel);

        loop {
            let event = match race(&mut cancel, &mut expiry, events.next()).await {
                Race::Cancelled => return Err(self.cancelled(&handle)),
                Race::Expired => {
                    let statuses = unseen(&handle);
                    return Ok(self.finish(handle, FinalOutcome::TimedOut, statuses, deadline));
                }
                Race::Done(None) => return Err(BundleError::Transport(TransportError::StreamClosed)),
                Race::Done(Some(Err(e))) => return Err(BundleError::Transport(e)),
                Race::Done(Some(Ok(event))) => event,
            };

            if !handle.matches(&event.bundle_id) {
                tracing::trace!(bundle_id = %event.bundle_id, "Skipping result for another bundle");
                continue;
            }

            match classify_event(&event) {
                BundleOutcome::Rejected(reason) => {
                    let statuses = unseen(&handle);
                    return Ok(self.finish(handle, FinalOutcome::Failed(reason), statuses, deadline));
                }
                outcome => {
                    tracing::debug!(bundle_id = %event.bundle_id, outcome = ?outcome, "Relay result received");
                    break;
                }
            }
        }

        self.poll_ledger(handle, None, &mut cancel, &mut expiry, deadline)
            .await
    }

    /// Reconcile by polling relay status and ledger status side by side.
    ///
    /// Relay polling stops once the relay reports the bundle landed, and is
    /// skipped entirely when `status` is `None` or the handle has no relay id.
    pub async fn reconcile_polling<C>(
        &self,
        handle: BundleSubmissionHandle,
        status: Option<&dyn InflightStatusSource>,
        deadline: Deadline,
        cancel: C,
    ) -> BundleResult<ConfirmationResult>
    where
        C: Future<Output = ()>,
    {
        let expiry = sleep_until(deadline.expires_at());
        tokio::pin!(expiry);
        tokio::pin!(cancel);

        let status = status.filter(|_| handle.relay_bundle_id().is_some());
        self.poll_ledger(handle, status, &mut cancel, &mut expiry, deadline)
            .await
    }

    async fn poll_ledger<C>(
        &self,
        handle: BundleSubmissionHandle,
        mut relay: Option<&dyn InflightStatusSource>,
        cancel: &mut Pin<&mut C>,
        expiry: &mut Pin<&mut Sleep>,
        deadline: Deadline,
    ) -> BundleResult<ConfirmationResult>
    where
        C: Future<Output = ()>,
    {
        let mut relay_ticks = interval(self.config.relay_poll_interval());
        relay_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ledger_ticks = interval(self.config.ledger_poll_interval());
        ledger_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let required = self.config.required_commitment;
        let mut statuses = unseen(&handle);

        loop {
            let polling_relay = relay.is_some();
            let next = race(cancel, expiry, async {
                tokio::select! {
                    biased;
                    _ = relay_ticks.tick(), if polling_relay => Tick::Relay,
                    _ = ledger_ticks.tick() => Tick::Ledger,
                }
            })
            .await;

            let tick = match next {
                Race::Done(tick) => tick,
                Race::Cancelled => return Err(self.cancelled(&handle)),
                Race::Expired => {
                    return Ok(self.finish(handle, FinalOutcome::TimedOut, statuses, deadline))
                }
            };

            match tick {
                Tick::Relay => {
                    let (Some(source), Some(bundle_id)) = (relay, handle.relay_bundle_id()) else {
                        relay = None;
                        continue;
                    };
                    let authorization = self.authorization()?;
                    let ids = [bundle_id.to_string()];
                    let outcome = race(
                        cancel,
                        expiry,
                        source.get_inflight_bundle_statuses(&ids, authorization.as_deref()),
                    )
                    .await;
                    let polled = match outcome {
                        Race::Done(polled) => polled?,
                        Race::Cancelled => return Err(self.cancelled(&handle)),
                        Race::Expired => {
                            return Ok(self.finish(handle, FinalOutcome::TimedOut, statuses, deadline))
                        }
                    };

                    match classify_inflight(&polled.value, bundle_id) {
                        BundleOutcome::Rejected(reason) => {
                            return Ok(self.finish(
                                handle,
                                FinalOutcome::Failed(reason),
                                statuses,
                                deadline,
                            ))
                        }
                        BundleOutcome::Landed { slot } => {
                            tracing::debug!(bundle_id, slot = ?slot, "Relay reports bundle landed");
                            relay = None;
                        }
                        outcome => {
                            tracing::trace!(bundle_id, outcome = ?outcome, "Bundle still in flight");
                        }
                    }
                }
                Tick::Ledger => {
                    let outcome = race(
                        cancel,
                        expiry,
                        self.ledger.get_signature_statuses(handle.signatures()),
                    )
                    .await;
                    let polled = match outcome {
                        Race::Done(polled) => polled.map_err(BundleError::Ledger)?,
                        Race::Cancelled => return Err(self.cancelled(&handle)),
                        Race::Expired => {
                            return Ok(self.finish(handle, FinalOutcome::TimedOut, statuses, deadline))
                        }
                    };

                    statuses = polled;
                    if all_confirmed(&statuses, required) {
                        return Ok(self.finish(handle, FinalOutcome::Landed, statuses, deadline));
                    }
                    tracing::trace!(
                        seen = statuses.iter().filter(|s| s.is_some()).count(),
                        total = statuses.len(),
                        required = %required,
                        "Waiting for signatures"
                    );
                }
            }
        }
    }

    fn authorization(&self) -> BundleResult<Option<String>> {
        Ok(self
            .credentials
            .as_ref()
            .map(CredentialStore::authorization)
            .transpose()?)
    }

    fn cancelled(&self, handle: &BundleSubmissionHandle) -> BundleError {
        metrics::record_bundle_outcome("cancelled");
        tracing::info!(
            bundle_id = handle.relay_bundle_id().unwrap_or(handle.relay_acknowledgement()),
            "Confirmation cancelled"
        );
        BundleError::Cancelled
    }

    fn finish(
        &self,
        handle: BundleSubmissionHandle,
        final_outcome: FinalOutcome,
        statuses: Vec<Option<SignatureStatus>>,
        deadline: Deadline,
    ) -> ConfirmationResult {
        let elapsed = deadline.started().elapsed();
        let bundle_id = handle
            .relay_bundle_id()
            .unwrap_or(handle.relay_acknowledgement())
            .to_string();

        metrics::record_bundle_outcome(final_outcome.label());
        match &final_outcome {
            FinalOutcome::Landed => {
                metrics::record_confirmation_latency(elapsed);
                tracing::info!(bundle_id = %bundle_id, elapsed = ?elapsed, "Bundle landed");
            }
            FinalOutcome::Failed(reason) => {
                tracing::warn!(bundle_id = %bundle_id, reason = %reason, "Bundle rejected");
            }
            FinalOutcome::TimedOut => {
                tracing::warn!(bundle_id = %bundle_id, deadline = ?deadline.budget(), "Bundle confirmation timed out");
            }
        }

        ConfirmationResult {
            handle,
            final_outcome,
            statuses,
            elapsed,
            deadline: deadline.budget(),
        }
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}
