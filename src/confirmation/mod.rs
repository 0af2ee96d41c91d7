//! Bundle confirmation subsystem.
//!
//! # Data Flow
//! ```text
//! BundleSubmissionHandle
//!     → reconciler.rs
//!         stream:  next event → classify → (rejected: Failed) | ledger polling
//!         polling: relay tick (5s) ┐
//!                  ledger tick (1s) ┴→ classify / all_confirmed
//!     → types.rs (ConfirmationResult: Landed | Failed | TimedOut)
//! ```
//!
//! # Design Decisions
//! - Every wait races the caller's cancellation and the deadline
//! - The deadline is fixed before submission and shared with it
//! - Cancellation is an error, never a partial result
//! - Ledger query errors are fatal; the query is not retried
//! - Polling intervals are fixed and configurable

pub mod reconciler;
pub mod types;

pub use reconciler::Reconciler;
pub use types::{ConfirmationResult, Deadline, FinalOutcome};
