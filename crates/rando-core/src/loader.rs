//! Background catalog parsing.
//!
//! The catalog is parsed once on a blocking worker while the host finishes
//! starting up. Starting a run joins the task, waiting only if the parse is
//! still in flight. The result is shared read-only through an [`Arc`].

use std::sync::Arc;

use rando_types::Catalog;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::catalog::{CatalogError, DEFAULT_CATALOG, parse_catalog};

/// Handle to an in-flight catalog parse.
#[derive(Debug)]
pub struct CatalogLoader {
    handle: JoinHandle<Result<Catalog, CatalogError>>,
}

impl CatalogLoader {
    /// Start parsing `source` on the blocking pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(source: String) -> Self {
        debug!(bytes = source.len(), "Catalog parse started");
        let handle = tokio::task::spawn_blocking(move || parse_catalog(&source));
        Self { handle }
    }

    /// Start parsing the embedded default catalog.
    pub fn spawn_default() -> Self {
        Self::spawn(String::from(DEFAULT_CATALOG))
    }

    /// Whether the parse has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the parse and return the shared catalog.
    ///
    /// # Errors
    ///
    /// Returns the parse error, or [`CatalogError::Join`] if the worker
    /// panicked or was cancelled.
    pub async fn join(self) -> Result<Arc<Catalog>, CatalogError> {
        if !self.is_finished() {
            info!("Catalog parse still running, waiting");
        }
        let catalog = self.handle.await.map_err(|e| CatalogError::Join {
            message: e.to_string(),
        })??;
        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_catalog_loads_in_background() {
        let loader = CatalogLoader::spawn_default();
        let catalog = loader.join().await.unwrap();
        assert!(catalog.item_count() > 0);
    }

    #[tokio::test]
    async fn parse_errors_surface_on_join() {
        let loader = CatalogLoader::spawn(String::from("items: {"));
        assert!(matches!(loader.join().await, Err(CatalogError::Yaml { .. })));
    }
}
