//! Relay session.
//!
//! # Data Flow
//! ```text
//! RelaySessionBuilder::connect
//!     → Authenticator::authenticate (optional, spawns refresh task)
//!     → RelaySession
//!         submit_and_confirm: assemble → [subscribe] → submit → Reconciler
//!         close / drop: shutdown signal → refresh task exits
//! ```
//!
//! # Design Decisions
//! - The session owns the refresh task and guarantees it stops
//! - In streaming mode the result subscription is opened before the bundle
//!   is sent so an early verdict cannot be missed

pub mod relay_session;

pub use relay_session::{RelaySession, RelaySessionBuilder, StatusSource};
