//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → resolver.rs (exact lookup in the table)
//!     → Return: Redirect(destination) or Delegate
//!
//! Table Compilation (at load time):
//!     PathMapping (ordered records)
//!     → table.rs (fold, last write wins)
//!     → Freeze as immutable LookupTable
//! ```
//!
//! # Design Decisions
//! - Tables built once per load, immutable at runtime
//! - Exact match only: no prefixes, no patterns
//! - Deterministic: same path always resolves the same way
//! - A miss is explicit (`Delegate`) rather than a silent default

pub mod resolver;
pub mod table;

pub use resolver::{build_resolver, RedirectHandler, Resolution, Resolver};
pub use table::{LookupTable, PathMapping};
