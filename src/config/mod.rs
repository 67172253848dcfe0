//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! server config (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!
//! mapping document (YAML/JSON)
//!     → loader.rs (parse records, fold last-write-wins)
//!     → routing::build_resolver
//!     → RedirectHandler (immutable)
//!
//! On change of the mapping document:
//!     watcher.rs detects change
//!     → loader.rs loads new mapping
//!     → new RedirectHandler sent to the server
//!     → atomic swap of Arc<RedirectHandler>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All server config fields have defaults to allow minimal configs
//! - Mapping documents are checked for shape only; destinations are opaque

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{
    load_config, load_from_format, load_from_json, load_from_structured_data, load_mapping_file,
    ConfigError, ConfigParseError, MappingFormat,
};
pub use schema::{ListenerConfig, RedirectConfig, ServerConfig};
pub use validation::ValidationError;
