//! Tag catalog cache and tag operations
//!
//! The catalog is only ever read back from the remote index. Mutations go to
//! the remote first and are followed by a [`TagStore::refresh`], so the local
//! view never holds a tag the index does not know about.
//!
//! Bulk operations are sequential: each call waits for the previous one, and a
//! failure on one path does not stop the rest.

mod prompts;
mod summary;

pub use prompts::prompt_tokens;
pub use summary::BulkTagSummary;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::{QueryClient, RemoteCallError};

type Result<T> = std::result::Result<T, RemoteCallError>;

/// Local cache of the remote tag catalog
pub struct TagStore<C> {
    client: Arc<C>,
    catalog: watch::Sender<Arc<Vec<String>>>,
}

impl<C: QueryClient> TagStore<C> {
    /// Create a store with an empty catalog, without contacting the index
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        let (catalog, _) = watch::channel(Arc::new(Vec::new()));
        Self { client, catalog }
    }

    /// Create a store and populate it from the index
    ///
    /// A failed initial refresh is logged and leaves the catalog empty.
    pub async fn connect(client: Arc<C>) -> Self {
        let store = Self::new(client);
        let _ = store.refresh().await;
        store
    }

    /// Snapshot of the known tags
    #[must_use]
    pub fn tags(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.catalog.borrow())
    }

    /// Receiver notified on every catalog replacement
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<String>>> {
        self.catalog.subscribe()
    }

    /// Replace the catalog with the index's tag list
    ///
    /// # Errors
    ///
    /// Returns the remote failure; the catalog is left unchanged.
    pub async fn refresh(&self) -> Result<usize> {
        match self.client.list_tags().await {
            Ok(tags) => {
                let count = tags.len();
                self.catalog.send_replace(Arc::new(tags));
                debug!(count, "tag catalog refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "refreshing tag catalog failed");
                Err(e)
            }
        }
    }

    /// Create a tag on the index and reload the catalog
    ///
    /// # Errors
    ///
    /// Returns the remote failure of either call.
    pub async fn create(&self, tag: &str) -> Result<()> {
        if let Err(e) = self.client.create_tag(tag).await {
            warn!(%tag, error = %e, "creating tag failed");
            return Err(e);
        }
        info!(%tag, "tag created");
        self.refresh().await.map(|_| ())
    }

    /// Attach `tag` to every path, one call at a time
    pub async fn bulk_tag(&self, tag: &str, paths: &[String]) -> BulkTagSummary {
        let mut summary = BulkTagSummary::new();
        for path in paths {
            match self.client.attach_tag(path, tag).await {
                Ok(()) => summary.add_success(),
                Err(e) => {
                    warn!(%tag, %path, error = %e, "attaching tag failed");
                    summary.add_error(format!("{path}: {e}"));
                }
            }
        }
        info!(%tag, success = summary.success, errors = summary.errors, "bulk tag finished");
        summary
    }

    /// Detach `tag` from every path, one call at a time
    pub async fn bulk_untag(&self, tag: &str, paths: &[String]) -> BulkTagSummary {
        let mut summary = BulkTagSummary::new();
        for path in paths {
            match self.client.detach_tag(path, tag).await {
                Ok(()) => summary.add_success(),
                Err(e) => {
                    warn!(%tag, %path, error = %e, "detaching tag failed");
                    summary.add_error(format!("{path}: {e}"));
                }
            }
        }
        info!(%tag, success = summary.success, errors = summary.errors, "bulk untag finished");
        summary
    }

    /// Ask the index to tag matching images automatically
    ///
    /// # Errors
    ///
    /// Returns the remote failure after logging it.
    pub async fn auto_tag(&self, tag: &str, paths: &[String], strict: bool) -> Result<()> {
        match self.client.auto_tag(tag, paths, strict).await {
            Ok(()) => {
                info!(%tag, count = paths.len(), strict, "auto-tag requested");
                Ok(())
            }
            Err(e) => {
                warn!(%tag, count = paths.len(), error = %e, "auto-tag failed");
                Err(e)
            }
        }
    }

    /// Tags the index reads from the image's embedded metadata
    ///
    /// # Errors
    ///
    /// Returns the remote failure.
    pub async fn tags_of(&self, path: &str) -> Result<Vec<String>> {
        self.client.extract_tags(path).await.inspect_err(|e| {
            warn!(%path, error = %e, "reading image tags failed");
        })
    }

    /// Raw generation-parameter text of an image
    ///
    /// # Errors
    ///
    /// Returns the remote failure.
    pub async fn parameters_of(&self, path: &str) -> Result<String> {
        self.client.extract_parameters(path).await.inspect_err(|e| {
            warn!(%path, error = %e, "reading image parameters failed");
        })
    }

    /// Prompt tokens of an image, usable as tag suggestions
    ///
    /// # Errors
    ///
    /// Returns the remote failure.
    pub async fn suggest_tags(&self, path: &str) -> Result<Vec<String>> {
        let parameters = self.parameters_of(path).await?;
        Ok(prompt_tokens(&parameters)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}
