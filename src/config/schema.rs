//! Configuration schema definitions.
//!
//! This module defines the server configuration (TOML) and the redirect
//! record shared by the server config and the structured mapping documents.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Structured mapping document to load, and whether to watch it.
    pub mappings: MappingsConfig,

    /// Inline redirects, consulted after the mapping file.
    pub redirects: Vec<RedirectConfig>,

    /// Response used when no mapping matches.
    pub fallback: FallbackConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (covers the fallback too) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Mapping document settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MappingsConfig {
    /// Path to a YAML or JSON mapping document. Format follows the extension.
    pub file: Option<String>,

    /// Reload the document when it changes on disk.
    pub watch: bool,
}

/// A single path → destination record.
///
/// This is the record shape of the structured mapping documents:
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
///
/// Fields other than `path` and `url` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedirectConfig {
    /// Exact request path to match.
    pub path: String,

    /// Redirect destination, written verbatim into `Location`.
    pub url: String,
}

/// Fallback response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// HTTP status code of the fallback response.
    pub status: u16,

    /// Plain-text body of the fallback response.
    pub body: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            status: 404,
            body: "Not Found".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.fallback.status, 404);
        assert!(config.mappings.file.is_none());
        assert!(!config.mappings.watch);
        assert!(config.redirects.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [mappings]
            file = "paths.yaml"
            watch = true

            [fallback]
            status = 200
            body = "Hello, world!"

            [[redirects]]
            path = "/urlshort-godoc"
            url = "https://godoc.org/github.com/gophercises/urlshort"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.mappings.file.as_deref(), Some("paths.yaml"));
        assert!(config.mappings.watch);
        assert_eq!(config.fallback.body, "Hello, world!");
        assert_eq!(config.redirects.len(), 1);
        assert_eq!(config.redirects[0].path, "/urlshort-godoc");
    }
}
