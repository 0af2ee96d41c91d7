//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! RelaySessionBuilder::connect:
//!     Shutdown::new → authenticate → spawn refresh loop (holds a ShutdownSignal)
//!
//! RelaySession::close / drop:
//!     Shutdown::trigger → refresh loop exits → pending confirmations return Cancelled
//! ```
//!
//! # Design Decisions
//! - One coordinator per session; the session owns it
//! - Signals subscribed after the trigger still observe it
//! - Callers can pass their own signal to abort a single confirmation

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
