//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (path, destination, entries)
//!     → tower_http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs (fmt layer on stdout, filtered by level)
//! ```
//!
//! # Design Decisions
//! - Mapping diagnostics (empty table, duplicate paths) are events, never errors
//! - Per-request resolution logs at debug/trace to keep the hot path quiet

pub mod logging;

pub use logging::init_logging;
