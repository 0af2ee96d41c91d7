//! Bundle result classification.
//!
//! # Data Flow
//! ```text
//! BundleResultEvent (stream)  ─┐
//!                              ├→ classifier.rs → BundleOutcome
//! InflightBundleStatus (poll) ─┘
//! ```
//!
//! # Design Decisions
//! - Both relay vocabularies are normalized here; the reconciler only sees
//!   `BundleOutcome`
//! - Classification is pure: no I/O, no state
//! - An unrecognized rejection is an `InternalError`, never an acceptance

pub mod classifier;
pub mod types;

pub use classifier::{classify_event, classify_inflight};
pub use types::{BundleOutcome, RejectionReason};
