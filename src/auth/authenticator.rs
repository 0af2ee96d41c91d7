//! Challenge-response handshake and background token refresh.
//!
//! # Responsibilities
//! - Request a challenge, sign it, exchange it for tokens
//! - Install the access token into the [`CredentialStore`]
//! - Keep the token fresh until the session shuts down

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::auth::credential::{Credential, CredentialStore};
use crate::auth::keypair::AuthKeypair;
use crate::auth::transport::{AuthTransport, Role, Token};
use crate::config::AuthConfig;
use crate::error::TransportError;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::resilience::Backoff;

/// Handshake failures. All are fatal to `authenticate`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth challenge request failed: {0}")]
    Challenge(#[source] TransportError),

    #[error("failed to sign auth challenge: {0}")]
    Sign(String),

    #[error("auth token exchange failed: {0}")]
    TokenExchange(#[source] TransportError),

    #[error("keypair unavailable: {0}")]
    Keypair(String),

    #[error("a refresh task is already running for this session")]
    AlreadyAuthenticated,
}

/// Out-of-band errors from the refresh loop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("failed to refresh access token (attempt {attempt}): {source}")]
    Refresh {
        attempt: u32,
        #[source]
        source: TransportError,
    },

    #[error("token refresh cancelled by session shutdown")]
    Cancelled,
}

/// Runs the handshake once and owns the session's single refresh task.
pub struct Authenticator {
    transport: Arc<dyn AuthTransport>,
    keypair: Arc<AuthKeypair>,
    credentials: CredentialStore,
    refresh_margin: Duration,
    backoff: Backoff,
    refresh_task: Option<JoinHandle<()>>,
}

impl Authenticator {
    pub fn new(
        transport: Arc<dyn AuthTransport>,
        keypair: AuthKeypair,
        credentials: CredentialStore,
        config: &AuthConfig,
    ) -> Self {
        Self {
            transport,
            keypair: Arc::new(keypair),
            credentials,
            refresh_margin: config.refresh_margin(),
            backoff: config.backoff(),
            refresh_task: None,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Whether the refresh task is alive.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Perform the handshake and start the refresh loop.
    ///
    /// The loop runs until `shutdown` fires. Refresh failures and the final
    /// cancellation are reported on `errors`.
    pub async fn authenticate(
        &mut self,
        role: Role,
        shutdown: ShutdownSignal,
        errors: mpsc::UnboundedSender<RefreshError>,
    ) -> Result<(), AuthError> {
        if self.is_refreshing() {
            return Err(AuthError::AlreadyAuthenticated);
        }

        let pubkey = self.keypair.pubkey();
        let server_challenge = self
            .transport
            .generate_auth_challenge(role, &pubkey)
            .await
            .map_err(AuthError::Challenge)?;

        let challenge = format!("{}-{}", pubkey, server_challenge);
        let signed = self.keypair.sign_challenge(&challenge)?;

        let tokens = self
            .transport
            .generate_auth_tokens(&challenge, &pubkey, &signed)
            .await
            .map_err(AuthError::TokenExchange)?;

        self.install(&tokens.access);
        tracing::info!(pubkey = %pubkey, role = ?role, "Authenticated with relay");

        let refresh = RefreshLoop {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.clone(),
            refresh_token: tokens.refresh.value,
            margin: self.refresh_margin,
            backoff: self.backoff,
            shutdown,
            errors,
        };
        self.refresh_task = Some(tokio::spawn(refresh.run()));
        Ok(())
    }

    /// Wait for the refresh task to end. Call after triggering shutdown.
    pub async fn join(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Token refresh task ended abnormally");
            }
        }
    }

    fn install(&self, token: &Token) {
        self.credentials
            .replace(Credential::new(token.value.clone(), token.expires_at));
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("keypair", &self.keypair)
            .field("refresh_margin", &self.refresh_margin)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

struct RefreshLoop {
    transport: Arc<dyn AuthTransport>,
    credentials: CredentialStore,
    refresh_token: String,
    margin: Duration,
    backoff: Backoff,
    shutdown: ShutdownSignal,
    errors: mpsc::UnboundedSender<RefreshError>,
}

impl RefreshLoop {
    async fn run(self) {
        let RefreshLoop {
            transport,
            credentials,
            refresh_token,
            margin,
            backoff,
            mut shutdown,
            errors,
        } = self;
        let mut failures: u32 = 0;

        loop {
            let delay = if failures == 0 {
                credentials
                    .current()
                    .map(|credential| credential.refresh_delay(margin))
                    .unwrap_or(Duration::ZERO)
            } else {
                backoff.delay(failures)
            };

            tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                _ = sleep(delay) => {}
            }

            let result = tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                result = transport.refresh_access_token(&refresh_token) => result,
            };

            match result {
                Ok(token) => {
                    failures = 0;
                    credentials.replace(Credential::new(token.value, token.expires_at));
                    metrics::record_token_refresh(true);
                    tracing::debug!(
                        next_refresh_in = ?credentials.current().map(|c| c.refresh_delay(margin)),
                        "Access token refreshed"
                    );
                }
                Err(source) => {
                    failures = failures.saturating_add(1);
                    metrics::record_token_refresh(false);
                    tracing::warn!(attempt = failures, error = %source, "Access token refresh failed");
                    let _ = errors.send(RefreshError::Refresh {
                        attempt: failures,
                        source,
                    });
                }
            }
        }

        tracing::debug!("Token refresh loop stopped");
        let _ = errors.send(RefreshError::Cancelled);
    }
}
