//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → sections handed to the block-engine client, ledger client,
//!       authenticator and reconciler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AuthConfig;
pub use schema::BlockEngineConfig;
pub use schema::ClientConfig;
pub use schema::ConfirmationConfig;
pub use schema::LedgerConfig;
pub use schema::ObservabilityConfig;
