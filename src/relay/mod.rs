//! Relay integration subsystem.
//!
//! # Data Flow
//! ```text
//! Bundle
//!     → transport.rs (BundleRelay::send_bundle)
//!     → block_engine.rs (sendBundle over JSON-RPC, uuid + bearer attached)
//!     → relay bundle id
//!
//! Confirmation
//!     → BundleResultSource (stream) or InflightStatusSource (poll)
//!     → types.rs (wire events) → outcome classifier
//! ```
//!
//! # Design Decisions
//! - Transports are traits; the session never names a concrete client
//! - Authorization is passed per call, read from the credential store
//!   at call time

pub mod block_engine;
pub mod tips;
pub mod transport;
pub mod types;

pub use block_engine::BlockEngineClient;
pub use tips::{choose_tip_account, pick_tip_account, tip_instruction};
pub use transport::{BundleRelay, BundleResultSource, BundleResultStream, InflightStatusSource};
pub use types::{BundleResultEvent, InflightBundleStatuses, RelayAck, SentTransaction};
