//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, hot-swappable handler)
//!     → routing layer resolves the path
//!     → Redirect: 302 Found with Location
//!     → Delegate: fallback.rs handler produces the response
//! ```

pub mod fallback;
pub mod server;

pub use fallback::{handler_fn, FallbackHandler, FixedResponse, NotFound, ServiceFallback};
pub use server::HttpServer;
