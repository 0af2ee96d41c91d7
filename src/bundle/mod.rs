//! Bundle assembly and submission.
//!
//! # Data Flow
//! ```text
//! [signed transactions]
//!     → assembler.rs (bincode wire form, one packet per transaction)
//!     → submitter.rs (BundleRelay::send_bundle with current credential)
//!     → BundleSubmissionHandle (ack, fee-payer signatures, relay bundle id)
//! ```
//!
//! # Design Decisions
//! - Order is preserved end to end; packet `i` is transaction `i`
//! - Assembly is all-or-nothing and names the failing index
//! - Signature 0 of each transaction is the reconciliation key

pub mod assembler;
pub mod submitter;
pub mod types;

pub use assembler::{assemble, AssemblyError};
pub use submitter::BundleSubmitter;
pub use types::{
    Bundle, BundleSubmissionHandle, BundleTransaction, EncodeError, Packet, PacketMeta,
    MAX_BUNDLE_TRANSACTIONS,
};
