//! JSON-RPC 2.0 over HTTP.
//!
//! # Data Flow
//! ```text
//! relay::BlockEngineClient / ledger::LedgerClient
//!     → client.rs (envelope, id, auth header, uuid query)
//!     → reqwest POST
//!     → result | error object | HTTP status mapped to TransportError
//! ```

pub mod client;

pub use client::{CallOptions, JsonRpcClient, RpcResponse};
