//! Crate-level error taxonomy.
//!
//! Every public operation returns [`BundleError`] to its immediate caller.
//! Refresh-loop failures are the only exception: they travel on the
//! session's refresh error channel as [`crate::auth::RefreshError`].

use std::time::Duration;

use thiserror::Error;

use crate::auth::AuthError;
use crate::bundle::AssemblyError;
use crate::outcome::RejectionReason;

/// Failures raised by a relay, ledger or auth transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Invalid transport configuration (bad URL, client build failure).
    #[error("transport configuration invalid: {0}")]
    Config(String),

    /// The request could not be dispatched or the connection failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success HTTP status without a JSON-RPC error body.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The remote answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No valid credential was available for an authenticated call.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The bundle result stream ended before a result arrived.
    #[error("bundle result stream closed")]
    StreamClosed,
}

/// Errors returned by bundle submission and confirmation.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Challenge, signing or token exchange failed.
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// A transaction could not be turned into a packet.
    #[error("bundle assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    /// A relay call failed.
    #[error("relay transport error: {0}")]
    Transport(#[from] TransportError),

    /// A ledger signature or blockhash query failed.
    #[error("ledger query failed: {0}")]
    Ledger(TransportError),

    /// The relay rejected the bundle. Never retried.
    #[error("bundle rejected: {0}")]
    Rejected(#[from] RejectionReason),

    /// The relay returned an empty tip account list.
    #[error("relay returned no tip accounts")]
    NoTipAccounts,

    /// The deadline elapsed before every signature landed.
    #[error("bundle not confirmed within {deadline:?}")]
    ConfirmationTimeout { deadline: Duration },

    /// The caller or the session cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::Rpc {
            code: -32602,
            message: "invalid params".to_string(),
        };
        assert_eq!(err.to_string(), "rpc error -32602: invalid params");

        let err = BundleError::ConfirmationTimeout {
            deadline: Duration::from_secs(15),
        };
        assert!(err.to_string().contains("15s"));
    }

    #[test]
    fn test_rejection_converts() {
        let err: BundleError = RejectionReason::Dropped {
            message: "expired".to_string(),
        }
        .into();
        assert!(matches!(err, BundleError::Rejected(_)));
        assert_eq!(err.to_string(), "bundle rejected: bundle dropped expired");
    }
}
