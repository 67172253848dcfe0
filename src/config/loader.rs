//! Configuration loading.
//!
//! Two kinds of input are handled here:
//! - the server configuration (TOML), read → parsed → validated;
//! - structured mapping documents (YAML or JSON lists of `path`/`url`
//!   records), parsed → folded → handed to [`build_resolver`].
//!
//! A failed load never yields a partial mapping.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{RedirectConfig, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::http::fallback::FallbackHandler;
use crate::routing::{build_resolver, LookupTable, PathMapping, RedirectHandler};

/// Structured mapping data could not be turned into a path mapping.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("invalid YAML mapping document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON mapping document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Mapping {
        path: PathBuf,
        #[source]
        source: ConfigParseError,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encoding of a structured mapping document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingFormat {
    #[default]
    Yaml,
    Json,
}

impl MappingFormat {
    /// Pick the format from a file extension: `.json` is JSON, anything
    /// else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => MappingFormat::Json,
            _ => MappingFormat::Yaml,
        }
    }
}

/// Load and validate the server configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a structured mapping document into its ordered records.
pub fn parse_mapping(data: &[u8], format: MappingFormat) -> Result<PathMapping, ConfigParseError> {
    let mapping: PathMapping = match format {
        // Empty and null documents (`~`, `null`) carry no records.
        MappingFormat::Yaml if is_blank_yaml(data) => Vec::new(),
        MappingFormat::Yaml => serde_yaml::from_slice::<Option<PathMapping>>(data)?.unwrap_or_default(),
        MappingFormat::Json => serde_json::from_slice(data)?,
    };

    tracing::debug!(records = mapping.len(), ?format, "Parsed mapping document");
    Ok(mapping)
}

/// True when a YAML document holds only whitespace and comments.
fn is_blank_yaml(data: &[u8]) -> bool {
    data.split(|b| *b == b'\n').all(|line| {
        let line = line.trim_ascii();
        line.is_empty() || line.starts_with(b"#")
    })
}

/// Fold a parsed mapping into a lookup table, reporting what it holds.
fn fold_mapping(mapping: PathMapping) -> LookupTable {
    let records = mapping.len();
    let table = LookupTable::fold(mapping);

    if table.is_empty() {
        tracing::warn!("Mapping document contains no paths; every request will use the fallback");
    } else {
        tracing::debug!(
            records,
            entries = table.len(),
            "Built lookup table"
        );
    }

    table
}

/// Parse YAML mapping data and build a handler that falls back to `fallback`.
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
pub fn load_from_structured_data<F>(
    data: &[u8],
    fallback: F,
) -> Result<RedirectHandler<F>, ConfigParseError>
where
    F: FallbackHandler,
{
    load_from_format(data, MappingFormat::Yaml, fallback)
}

/// Same as [`load_from_structured_data`] for a JSON array of records.
pub fn load_from_json<F>(data: &[u8], fallback: F) -> Result<RedirectHandler<F>, ConfigParseError>
where
    F: FallbackHandler,
{
    load_from_format(data, MappingFormat::Json, fallback)
}

/// Parse mapping data in the given format and build a handler.
pub fn load_from_format<F>(
    data: &[u8],
    format: MappingFormat,
    fallback: F,
) -> Result<RedirectHandler<F>, ConfigParseError>
where
    F: FallbackHandler,
{
    let mapping = parse_mapping(data, format)?;
    Ok(build_resolver(fold_mapping(mapping), fallback))
}

/// Read a mapping document from disk, picking the format from its extension.
pub fn load_mapping_file<F>(path: &Path, fallback: F) -> Result<RedirectHandler<F>, ConfigError>
where
    F: FallbackHandler,
{
    let mapping = read_mapping_file(path)?;
    Ok(build_resolver(fold_mapping(mapping), fallback))
}

/// Read and parse a mapping document without building a handler.
pub fn read_mapping_file(path: &Path) -> Result<PathMapping, ConfigError> {
    let data = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_mapping(&data, MappingFormat::from_path(path)).map_err(|source| ConfigError::Mapping {
        path: path.to_path_buf(),
        source,
    })
}

/// Inline redirects from the server configuration as a lookup table.
pub fn inline_table(redirects: &[RedirectConfig]) -> LookupTable {
    LookupTable::fold(redirects.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fallback::NotFound;
    use crate::routing::Resolution;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let yaml = b"- path: /yaml\n  url: https://example.com/yaml\n";
        let handler = load_from_structured_data(yaml, NotFound).unwrap();

        assert_eq!(
            handler.resolve("/yaml"),
            Resolution::Redirect("https://example.com/yaml")
        );
        assert_eq!(handler.resolve("/other"), Resolution::Delegate);
    }

    #[test]
    fn test_yaml_duplicates_last_write_wins() {
        let yaml = b"
- path: /a
  url: x
- path: /a
  url: y
";
        let handler = load_from_structured_data(yaml, NotFound).unwrap();
        assert_eq!(handler.resolve("/a"), Resolution::Redirect("y"));
        assert_eq!(handler.resolver().table().len(), 1);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let yaml = b"- path: /a\n  url: https://a.example\n  note: ignored\n";
        let handler = load_from_structured_data(yaml, NotFound).unwrap();
        assert_eq!(handler.resolve("/a"), Resolution::Redirect("https://a.example"));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let err = load_from_structured_data(b"not: a-valid-shape", NotFound).unwrap_err();
        assert!(matches!(err, ConfigParseError::Yaml(_)));
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = load_from_structured_data(b"- path: /a\n", NotFound).unwrap_err();
        assert!(err.to_string().contains("url"), "diagnostic should name the field: {err}");
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        assert!(load_from_structured_data(b"- path: [unclosed\n  url: x", NotFound).is_err());
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let yaml = b"- path: /a\n  url:\n    nested: value\n";
        assert!(load_from_structured_data(yaml, NotFound).is_err());
    }

    #[test]
    fn test_empty_documents_give_empty_table() {
        for doc in [&b""[..], b"\n  \n", b"# nothing here\n", b"[]", b"---\n", b"~\n", b"null\n"] {
            let handler = load_from_structured_data(doc, NotFound).unwrap();
            assert!(handler.resolver().table().is_empty());
            assert_eq!(handler.resolve("/"), Resolution::Delegate);
        }
    }

    #[test]
    fn test_json_matches_yaml() {
        let yaml = b"- path: /a\n  url: https://a.example\n- path: /b\n  url: https://b.example\n";
        let json = br#"[{"path": "/a", "url": "https://a.example"}, {"path": "/b", "url": "https://b.example"}]"#;

        let from_yaml = load_from_structured_data(yaml, NotFound).unwrap();
        let from_json = load_from_json(json, NotFound).unwrap();
        assert_eq!(from_yaml.resolver().table(), from_json.resolver().table());
    }

    #[test]
    fn test_json_wrong_shape_is_rejected() {
        let err = load_from_json(br#"{"path": "/a", "url": "x"}"#, NotFound).unwrap_err();
        assert!(matches!(err, ConfigParseError::Json(_)));
    }

    #[test]
    fn test_map_and_document_resolve_identically() {
        let mut map = HashMap::new();
        map.insert("/urlshort".to_string(), "https://github.com/gophercises/urlshort".to_string());
        map.insert("/urlshort-final".to_string(), "https://github.com/gophercises/urlshort/tree/solution".to_string());
        let from_map = build_resolver(map, NotFound);

        let yaml = b"
- path: /urlshort
  url: https://github.com/gophercises/urlshort
- path: /urlshort-final
  url: https://github.com/gophercises/urlshort/tree/solution
";
        let from_yaml = load_from_structured_data(yaml, NotFound).unwrap();

        for path in ["/urlshort", "/urlshort-final", "/urlshort/", "/", "/missing"] {
            assert_eq!(from_map.resolve(path), from_yaml.resolve(path), "path {path}");
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(MappingFormat::from_path(Path::new("paths.json")), MappingFormat::Json);
        assert_eq!(MappingFormat::from_path(Path::new("paths.JSON")), MappingFormat::Json);
        assert_eq!(MappingFormat::from_path(Path::new("paths.yaml")), MappingFormat::Yaml);
        assert_eq!(MappingFormat::from_path(Path::new("paths")), MappingFormat::Yaml);
    }

    #[test]
    fn test_load_mapping_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"[{"path": "/docs", "url": "https://docs.example"}]"#).unwrap();

        let handler = load_mapping_file(file.path(), NotFound).unwrap();
        assert_eq!(handler.resolve("/docs"), Resolution::Redirect("https://docs.example"));
    }

    #[test]
    fn test_load_mapping_file_errors() {
        let err = load_mapping_file(Path::new("/nonexistent/paths.yaml"), NotFound).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"not: a-valid-shape").unwrap();
        let err = load_mapping_file(file.path(), NotFound).unwrap_err();
        assert!(matches!(err, ConfigError::Mapping { source: ConfigParseError::Yaml(_), .. }));
    }

    #[test]
    fn test_load_config_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    }
}
