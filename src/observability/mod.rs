//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! auth / bundle / confirmation produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Bearer tokens and key material are never logged
//! - Every state transition of a bundle emits one event
//! - No exporter is installed here; the embedding application picks one

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
