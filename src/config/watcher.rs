//! Mapping file watcher for hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{parse_mapping, MappingFormat};
use crate::http::fallback::FallbackHandler;
use crate::routing::{LookupTable, RedirectHandler};

/// A watcher that rebuilds the redirect handler when the mapping file changes.
///
/// Every successful reload produces a brand-new handler; a failed reload
/// sends nothing, so whatever is installed stays active.
pub struct ConfigWatcher {
    path: PathBuf,
    fallback: Arc<dyn FallbackHandler>,
    update_tx: mpsc::UnboundedSender<RedirectHandler>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt handlers.
    pub fn new(
        path: &Path,
        fallback: Arc<dyn FallbackHandler>,
    ) -> (Self, mpsc::UnboundedReceiver<RedirectHandler>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                fallback,
                update_tx,
            },
            update_rx,
        )
    }

    /// Reload the mapping file once and send the new handler.
    ///
    /// Returns `false` if the file could not be loaded or is empty.
    pub fn reload(&self) -> bool {
        reload(&self.path, &self.fallback, &self.update_tx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            fallback,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Mapping file change detected, reloading...");
                        reload(&path, &fallback, &update_tx);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Mapping watcher started");
        Ok(watcher)
    }
}

fn reload(
    path: &Path,
    fallback: &Arc<dyn FallbackHandler>,
    tx: &mpsc::UnboundedSender<RedirectHandler>,
) -> bool {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(path = ?path, "Failed to read mapping: {}. Keeping current mapping.", e);
            return false;
        }
    };

    // Editors truncate before rewriting; the write that follows fires another event.
    if data.is_empty() {
        tracing::debug!(path = ?path, "Mapping file is empty, waiting for the next write");
        return false;
    }

    match parse_mapping(&data, MappingFormat::from_path(path)) {
        Ok(mapping) => {
            let table = LookupTable::fold(mapping);
            if table.is_empty() {
                tracing::warn!(path = ?path, "Reloaded mapping contains no paths");
            }
            tracing::info!(entries = table.len(), "Mapping reloaded");
            let handler = RedirectHandler::with_shared_fallback(table, fallback.clone());
            tx.send(handler).is_ok()
        }
        Err(e) => {
            tracing::error!(path = ?path, "Failed to reload mapping: {}. Keeping current mapping.", e);
            false
        }
    }
}
