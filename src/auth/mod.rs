//! Relay authentication subsystem.
//!
//! # Data Flow
//! ```text
//! AuthKeypair (file or BUNDLE_RELAY_KEYPAIR)
//!     → authenticator.rs (challenge → sign "<pubkey>-<challenge>" → tokens)
//!     → credential.rs (CredentialStore snapshot swap)
//!     → submitter / status sources read the bearer per call
//!
//! refresh loop: sleep(expiry - margin) → refresh → swap → repeat
//! ```
//!
//! # Security Constraints
//! - Tokens and secret keys never appear in logs or Debug output
//! - An expired credential is never handed to a transport
//! - One refresh task per session, stopped by the session shutdown signal

pub mod authenticator;
pub mod credential;
pub mod keypair;
pub mod transport;

pub use authenticator::{AuthError, Authenticator, RefreshError};
pub use credential::{Credential, CredentialStore};
pub use keypair::AuthKeypair;
pub use transport::{AuthTransport, Role, Token, TokenPair};
