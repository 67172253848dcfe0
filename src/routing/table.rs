//! Path lookup table.
//!
//! # Responsibilities
//! - Fold an ordered path mapping into an exact-match table
//! - Resolve duplicate paths with last-write-wins
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, read without locks)
//! - Destinations are stored verbatim; they are not validated as URLs
//! - Keys are compared byte-for-byte (no case folding, no normalisation)

use std::collections::HashMap;

use crate::config::RedirectConfig;

/// Ordered list of `(path, destination)` records as they appeared in configuration.
pub type PathMapping = Vec<RedirectConfig>;

/// Exact-match map from request path to redirect destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<String, String>,
}

impl LookupTable {
    /// Create an empty table. Every lookup against it misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a path mapping into a table. Later records for the same path
    /// overwrite earlier ones.
    pub fn fold(mapping: PathMapping) -> Self {
        let mut entries = HashMap::with_capacity(mapping.len());

        for record in mapping {
            if let Some(previous) = entries.insert(record.path.clone(), record.url) {
                tracing::debug!(
                    path = %record.path,
                    overridden = %previous,
                    "Duplicate path, later entry wins"
                );
            }
        }

        Self { entries }
    }

    /// Destination configured for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(path, destination)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }
}

impl From<HashMap<String, String>> for LookupTable {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl From<PathMapping> for LookupTable {
    fn from(mapping: PathMapping) -> Self {
        Self::fold(mapping)
    }
}

impl<P, D> FromIterator<(P, D)> for LookupTable
where
    P: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(p, d)| (p.into(), d.into()))
                .collect(),
        }
    }
}
