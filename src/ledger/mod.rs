//! Ledger RPC subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler
//!     → LedgerRpc::get_signature_statuses (every ledger tick)
//!     → client.rs (getSignatureStatuses over JSON-RPC)
//!     → types.rs (nullable SignatureStatus with confirmation level)
//! ```
//!
//! # Design Decisions
//! - The reconciler only sees the `LedgerRpc` trait so tests can script
//!   ledger answers
//! - Query errors are returned as-is; the reconciler decides they are fatal

pub mod client;
pub mod types;

pub use client::{LedgerClient, LedgerRpc};
pub use types::{Commitment, LatestBlockhash, SignatureStatus};
