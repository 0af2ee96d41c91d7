//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Token refresh failure:
//!     → backoff.rs (jittered exponential delay before the next attempt)
//!     → refresh loop sleeps, then retries with the same refresh token
//! ```
//!
//! # Design Decisions
//! - Only the refresh loop retries; rejected bundles are never retried
//! - Confirmation polling keeps fixed intervals (relay 5s, ledger 1s by default)

pub mod backoff;

pub use backoff::Backoff;
