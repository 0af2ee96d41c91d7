//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ledger::types::Commitment;
use crate::resilience::Backoff;

/// Minimum headroom between a token refresh and the token's expiry.
pub const MIN_REFRESH_MARGIN_SECS: u64 = 15;

/// Smallest delay between two token refresh retries.
pub const MIN_RETRY_BASE_DELAY_MS: u64 = 100;

/// Smallest relay or ledger polling interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Root configuration for the relay client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Block-engine relay endpoint.
    pub relay: BlockEngineConfig,

    /// Ledger JSON-RPC endpoint.
    pub ledger: LedgerConfig,

    /// Authentication and token refresh settings.
    pub auth: AuthConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Block-engine relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockEngineConfig {
    /// Base URL of the block engine (e.g., "https://mainnet.block-engine.jito.wtf").
    pub url: String,

    /// Optional rate-limit UUID appended as `?uuid=` to every call.
    pub uuid: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BlockEngineConfig {
    fn default() -> Self {
        Self {
            url: "https://mainnet.block-engine.jito.wtf".to_string(),
            uuid: None,
            request_timeout_secs: 10,
        }
    }
}

impl BlockEngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Ledger JSON-RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Commitment used for blockhash queries.
    pub commitment: Commitment,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: Commitment::Confirmed,
            request_timeout_secs: 10,
        }
    }
}

impl LedgerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Seconds before expiry at which the access token is refreshed.
    pub refresh_margin_secs: u64,

    /// Base delay for refresh retry backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for refresh retry backoff in milliseconds.
    pub retry_max_delay_ms: u64,

    /// Path to a solana-keygen JSON keypair used to sign challenges.
    pub keypair_path: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_margin_secs: MIN_REFRESH_MARGIN_SECS,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 10_000,
            keypair_path: None,
        }
    }
}

impl AuthConfig {
    /// Refresh headroom, never below [`MIN_REFRESH_MARGIN_SECS`].
    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs.max(MIN_REFRESH_MARGIN_SECS))
    }

    /// Retry backoff, with the base delay floored at [`MIN_RETRY_BASE_DELAY_MS`].
    pub fn backoff(&self) -> Backoff {
        Backoff::from_millis(
            self.retry_base_delay_ms.max(MIN_RETRY_BASE_DELAY_MS),
            self.retry_max_delay_ms,
        )
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Interval between `getInflightBundleStatuses` polls in milliseconds.
    pub relay_poll_interval_ms: u64,

    /// Interval between `getSignatureStatuses` polls in milliseconds.
    pub ledger_poll_interval_ms: u64,

    /// Default deadline for a submit-and-confirm call in seconds.
    pub deadline_secs: u64,

    /// Confirmation level every bundle signature must reach.
    pub required_commitment: Commitment,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            relay_poll_interval_ms: 5_000,
            ledger_poll_interval_ms: 1_000,
            deadline_secs: 30,
            required_commitment: Commitment::Confirmed,
        }
    }
}

impl ConfirmationConfig {
    pub fn relay_poll_interval(&self) -> Duration {
        Duration::from_millis(self.relay_poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn ledger_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ledger_poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
