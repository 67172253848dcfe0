//! Path-to-URL redirect library.
//!
//! Requests whose path has an entry in a lookup table are answered with
//! `302 Found`; everything else is handed to a fallback handler.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{load_from_json, load_from_structured_data, ConfigParseError, ServerConfig};
pub use http::{FallbackHandler, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{build_resolver, LookupTable, RedirectHandler, Resolution};
