//! Session wiring for authentication, submission and confirmation.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use crate::auth::{AuthKeypair, AuthTransport, Authenticator, CredentialStore, RefreshError, Role};
use crate::bundle::{
    assemble, AssemblyError, Bundle, BundleSubmissionHandle, BundleSubmitter, BundleTransaction,
};
use crate::config::{AuthConfig, ConfirmationConfig};
use crate::confirmation::{ConfirmationResult, Deadline, Reconciler};
use crate::error::{BundleError, BundleResult};
use crate::ledger::LedgerRpc;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics;
use crate::relay::{tips, BundleRelay, BundleResultSource, InflightStatusSource};

/// Where relay-side bundle verdicts come from.
#[derive(Clone)]
pub enum StatusSource {
    /// Push notifications over a result subscription.
    Stream(Arc<dyn BundleResultSource>),
    /// `getInflightBundleStatuses` polling.
    Polling(Arc<dyn InflightStatusSource>),
}

impl std::fmt::Debug for StatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusSource::Stream(_) => f.write_str("Stream"),
            StatusSource::Polling(_) => f.write_str("Polling"),
        }
    }
}

struct AuthSetup {
    transport: Arc<dyn AuthTransport>,
    keypair: AuthKeypair,
    config: AuthConfig,
    role: Role,
}

/// Builder for [`RelaySession`].
pub struct RelaySessionBuilder {
    relay: Arc<dyn BundleRelay>,
    status: StatusSource,
    ledger: Arc<dyn LedgerRpc>,
    confirmation: ConfirmationConfig,
    auth: Option<AuthSetup>,
}

impl RelaySessionBuilder {
    pub fn new(relay: Arc<dyn BundleRelay>, status: StatusSource, ledger: Arc<dyn LedgerRpc>) -> Self {
        Self {
            relay,
            status,
            ledger,
            confirmation: ConfirmationConfig::default(),
            auth: None,
        }
    }

    pub fn confirmation(mut self, config: ConfirmationConfig) -> Self {
        self.confirmation = config;
        self
    }

    /// Authenticate during `connect` and keep the token fresh afterwards.
    pub fn authenticate_with(
        mut self,
        transport: Arc<dyn AuthTransport>,
        keypair: AuthKeypair,
        config: AuthConfig,
        role: Role,
    ) -> Self {
        self.auth = Some(AuthSetup {
            transport,
            keypair,
            config,
            role,
        });
        self
    }

    /// Open the session.
    ///
    /// The returned receiver carries refresh-loop errors and, on close, the
    /// loop's cancellation. It closes immediately for unauthenticated sessions.
    pub async fn connect(
        self,
    ) -> BundleResult<(RelaySession, mpsc::UnboundedReceiver<RefreshError>)> {
        let shutdown = Shutdown::new();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();

        let (credentials, authenticator) = match self.auth {
            Some(setup) => {
                let credentials = CredentialStore::new();
                let mut authenticator = Authenticator::new(
                    setup.transport,
                    setup.keypair,
                    credentials.clone(),
                    &setup.config,
                );
                authenticator
                    .authenticate(setup.role, shutdown.subscribe(), errors_tx)
                    .await?;
                (Some(credentials), Some(authenticator))
            }
            None => (None, None),
        };

        let session = RelaySession {
            submitter: BundleSubmitter::new(Arc::clone(&self.relay), credentials.clone()),
            reconciler: Reconciler::new(self.ledger, self.confirmation)
                .with_credentials(credentials.clone()),
            relay: self.relay,
            status: self.status,
            credentials,
            authenticator,
            shutdown,
        };
        tracing::debug!(status = ?session.status, authenticated = session.credentials.is_some(), "Relay session opened");

        Ok((session, errors_rx))
    }
}

/// One authenticated connection to one relay.
pub struct RelaySession {
    relay: Arc<dyn BundleRelay>,
    status: StatusSource,
    submitter: BundleSubmitter,
    reconciler: Reconciler,
    credentials: Option<CredentialStore>,
    authenticator: Option<Authenticator>,
    shutdown: Shutdown,
}

impl RelaySession {
    pub fn credentials(&self) -> Option<&CredentialStore> {
        self.credentials.as_ref()
    }

    /// Signal that fires when the session closes.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.subscribe()
    }

    /// Configured default deadline for confirmations.
    pub fn default_deadline(&self) -> Duration {
        self.reconciler.config().deadline()
    }

    fn authorization(&self) -> BundleResult<Option<String>> {
        Ok(self
            .credentials
            .as_ref()
            .map(CredentialStore::authorization)
            .transpose()?)
    }

    /// Submit an assembled bundle without waiting for a verdict.
    pub async fn submit(&self, bundle: &Bundle) -> BundleResult<BundleSubmissionHandle> {
        self.submitter.submit(bundle).await
    }

    /// Assemble, submit and follow `transactions` until they land.
    ///
    /// Rejection, timeout and session shutdown are returned as errors.
    pub async fn submit_and_confirm<T: BundleTransaction>(
        &self,
        transactions: &[T],
        deadline: Duration,
    ) -> BundleResult<ConfirmationResult> {
        self.submit_and_confirm_with_cancel(transactions, deadline, std::future::pending())
            .await
    }

    /// Like [`submit_and_confirm`](Self::submit_and_confirm), also aborting when
    /// `cancel` resolves.
    ///
    /// The deadline starts before the subscription and the `sendBundle` call;
    /// cancelling during submission abandons the in-flight request.
    pub async fn submit_and_confirm_with_cancel<T, C>(
        &self,
        transactions: &[T],
        deadline: Duration,
        cancel: C,
    ) -> BundleResult<ConfirmationResult>
    where
        T: BundleTransaction,
        C: Future<Output = ()>,
    {
        let deadline = Deadline::after(deadline);
        let bundle = assemble(transactions)?;
        let cancel = self.cancellation(cancel);
        tokio::pin!(cancel);

        let result = match &self.status {
            StatusSource::Stream(source) => {
                let authorization = self.authorization()?;
                let submission = async {
                    let events = source
                        .subscribe_bundle_results(authorization.as_deref())
                        .await?;
                    let handle = self.submitter.submit(&bundle).await?;
                    Ok::<_, BundleError>((events, handle))
                };
                let (events, handle) =
                    within_deadline(deadline, cancel.as_mut(), submission).await?;
                self.reconciler
                    .reconcile_stream(handle, events, deadline, cancel)
                    .await?
            }
            StatusSource::Polling(source) => {
                let handle =
                    within_deadline(deadline, cancel.as_mut(), self.submitter.submit(&bundle))
                        .await?;
                self.reconciler
                    .reconcile_polling(handle, Some(source.as_ref()), deadline, cancel)
                    .await?
            }
        };
        result.into_landed()
    }

    /// Send one transaction as a single-transaction bundle and follow it.
    pub async fn send_transaction_and_confirm<T: BundleTransaction>(
        &self,
        transaction: &T,
        deadline: Duration,
    ) -> BundleResult<ConfirmationResult> {
        let deadline = Deadline::after(deadline);
        let encode = |source| AssemblyError::Encode { index: 0, source };
        let signature = transaction.fee_payer_signature().map_err(encode)?;
        let wire = transaction.to_wire().map_err(encode)?;
        let cancel = self.cancellation(std::future::pending());
        tokio::pin!(cancel);

        let authorization = self.authorization()?;
        let send = async {
            self.relay
                .send_transaction(&wire, true, authorization.as_deref())
                .await
                .map_err(BundleError::from)
        };
        let sent = within_deadline(deadline, cancel.as_mut(), send).await?;
        metrics::record_bundle_submitted(1);
        tracing::info!(
            signature = %sent.signature,
            bundle_id = ?sent.bundle_id,
            "Transaction submitted as bundle"
        );

        let handle = BundleSubmissionHandle::new(sent.signature.to_string(), vec![signature], sent.bundle_id);
        let status = match &self.status {
            StatusSource::Polling(source) => Some(source.as_ref()),
            StatusSource::Stream(_) => None,
        };
        self.reconciler
            .reconcile_polling(handle, status, deadline, cancel)
            .await?
            .into_landed()
    }

    /// Random tip account from the relay's current list.
    pub async fn pick_tip_account(&self) -> BundleResult<Pubkey> {
        let authorization = self.authorization()?;
        tips::pick_tip_account(self.relay.as_ref(), authorization.as_deref()).await
    }

    /// Transfer of `lamports` from `from` to a freshly picked tip account.
    pub async fn tip_instruction(&self, from: &Pubkey, lamports: u64) -> BundleResult<Instruction> {
        let tip_account = self.pick_tip_account().await?;
        Ok(tips::tip_instruction(from, &tip_account, lamports))
    }

    /// Stop the refresh task and wait for it to exit.
    pub async fn close(mut self) {
        self.shutdown.trigger();
        if let Some(authenticator) = self.authenticator.as_mut() {
            authenticator.join().await;
        }
        tracing::debug!("Relay session closed");
    }

    fn cancellation<C>(&self, cancel: C) -> impl Future<Output = ()>
    where
        C: Future<Output = ()>,
    {
        let mut session = self.shutdown.subscribe();
        async move {
            tokio::select! {
                _ = cancel => {}
                _ = session.triggered() => {}
            }
        }
    }
}

/// Run a submission step under the call's deadline and cancellation.
async fn within_deadline<T, C>(
    deadline: Deadline,
    cancel: Pin<&mut C>,
    work: impl Future<Output = BundleResult<T>>,
) -> BundleResult<T>
where
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            metrics::record_bundle_outcome("cancelled");
            tracing::info!("Submission cancelled before the relay answered");
            Err(BundleError::Cancelled)
        }
        _ = sleep_until(deadline.expires_at()) => {
            metrics::record_bundle_outcome("timed_out");
            tracing::warn!(deadline = ?deadline.budget(), "Deadline passed before the relay answered");
            Err(BundleError::ConfirmationTimeout {
                deadline: deadline.budget(),
            })
        }
        result = work => result,
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl std::fmt::Debug for RelaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("status", &self.status)
            .field("submitter", &self.submitter)
            .field("reconciler", &self.reconciler)
            .field("closed", &self.shutdown.is_triggered())
            .finish()
    }
}
