//! Block-engine relay client library.
//!
//! Authenticates against a bundle relay, submits ordered transaction bundles
//! and follows them until their signatures land on the ledger.

pub mod auth;
pub mod bundle;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod jsonrpc;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod outcome;
pub mod relay;
pub mod resilience;
pub mod session;

pub use config::schema::ClientConfig;
pub use error::{BundleError, BundleResult, TransportError};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use session::{RelaySession, RelaySessionBuilder, StatusSource};
