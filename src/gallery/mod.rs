//! Gallery state and query composition
//!
//! [`GalleryStore`] owns the loaded collection, the typed text filter and the
//! multi-select. Every acquisition path (single file, flat or recursive
//! directory scan, text/tag search against the remote index, log import)
//! resolves a complete list of records first and then replaces the collection
//! in one step.
//!
//! # State and observers
//!
//! The state lives in a `tokio::sync::watch` channel. Each mutator publishes
//! exactly one new [`GalleryState`], so readers (via [`GalleryStore::snapshot`]
//! or a [`GalleryStore::subscribe`] receiver) see either the old collection or
//! the fully resolved new one. Derived views are computed from one borrowed
//! state, which keeps the filtered and selected views consistent with the
//! collection they came from.
//!
//! # Racing loads
//!
//! Loads are not queued or cancelled. Every load and every reset takes a
//! ticket before its first suspension point. With `discard_stale_loads`
//! enabled, a load that completes after a newer one has already been published
//! is discarded and reports [`LoadOutcome::Superseded`]. With it disabled the
//! last completion wins.
//!
//! # Failures
//!
//! Remote and filesystem failures leave the state untouched, are logged and
//! are returned to the caller. A record that cannot be resolved is dropped and
//! counted; its siblings still load.

mod filter;
mod import;
mod selection;

pub use filter::{AsSearchFields, SearchFields, TextFilter, TextFilterExt};
pub use import::{parse_line, parse_log};
pub use selection::{Selection, SelectionError};

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::QueryClient;
use crate::fs::{DirEntry, FileSystem};
use crate::picker::{FileFilter, Picker};
use crate::resolver::PathResolver;
use crate::scanner::DirectoryScanner;
use crate::{GalleryError, ImageRecord};

type Result<T> = std::result::Result<T, GalleryError>;

/// Result of an operation that may replace the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced
    Replaced {
        /// Records now in the collection
        loaded: usize,
        /// Records dropped because they could not be resolved
        dropped: usize,
    },
    /// A picker returned no selection; nothing changed
    Cancelled,
    /// A newer load was published first; this result was discarded
    Superseded,
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }

    #[must_use]
    pub const fn loaded(&self) -> Option<usize> {
        match self {
            Self::Replaced { loaded, .. } => Some(*loaded),
            _ => None,
        }
    }
}

/// Behaviour switches for [`GalleryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryOptions {
    /// Discard load results that complete after a newer load was published
    pub discard_stale_loads: bool,
    /// Leave records without a local file out of `save`
    pub skip_unbacked_on_save: bool,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            discard_stale_loads: true,
            skip_unbacked_on_save: false,
        }
    }
}

/// One consistent view of the gallery
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    pub collection: Arc<Vec<ImageRecord>>,
    pub filter: TextFilter,
    pub selection: Selection,
    generation: u64,
}

impl GalleryState {
    /// Records matching the text filter, in collection order
    #[must_use]
    pub fn filtered(&self) -> Vec<ImageRecord> {
        self.collection.matching(&self.filter).cloned().collect()
    }

    /// Collection indices of the records matching the text filter
    #[must_use]
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.collection
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches(*record))
            .map(|(index, _)| index)
            .collect()
    }

    /// Records at the selected indices, in collection order
    #[must_use]
    pub fn selected(&self) -> Vec<ImageRecord> {
        self.selection
            .indices()
            .iter()
            .filter_map(|&i| self.collection.get(i))
            .cloned()
            .collect()
    }

    /// Ticket of the operation that produced the current collection
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// The gallery orchestration core
pub struct GalleryStore<C, F> {
    client: Arc<C>,
    fs: F,
    resolver: PathResolver,
    options: GalleryOptions,
    state: watch::Sender<GalleryState>,
    tickets: AtomicU64,
}

impl<C: QueryClient, F: FileSystem> GalleryStore<C, F> {
    /// Create an empty gallery
    #[must_use]
    pub fn new(client: Arc<C>, fs: F, resolver: PathResolver) -> Self {
        let (state, _) = watch::channel(GalleryState::default());
        Self {
            client,
            fs,
            resolver,
            options: GalleryOptions::default(),
            state,
            tickets: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: GalleryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> GalleryOptions {
        self.options
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Clone of the current state
    #[must_use]
    pub fn snapshot(&self) -> GalleryState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every published change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GalleryState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn collection(&self) -> Arc<Vec<ImageRecord>> {
        Arc::clone(&self.state.borrow().collection)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().collection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn filtered(&self) -> Vec<ImageRecord> {
        self.state.borrow().filtered()
    }

    #[must_use]
    pub fn selected(&self) -> Vec<ImageRecord> {
        self.state.borrow().selected()
    }

    /// Paths of the selected records, for tag operations
    #[must_use]
    pub fn selected_paths(&self) -> Vec<String> {
        self.selected().into_iter().map(|r| r.path).collect()
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    #[must_use]
    pub fn filter(&self) -> String {
        self.state.borrow().filter.as_str().to_string()
    }

    // ------------------------------------------------------------------
    // Collection-replacing operations
    // ------------------------------------------------------------------

    /// Replace the collection with a single file
    ///
    /// # Errors
    ///
    /// Never fails; an unresolvable path loads an empty collection and is
    /// counted as dropped.
    pub async fn load_file(&self, path: &str) -> Result<LoadOutcome> {
        self.replace_with("file", async {
            Ok::<_, GalleryError>(self.resolver.resolve_all(&[path]))
        })
        .await
    }

    /// Replace the collection with the media files directly inside `dir`
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Fs` if `dir` cannot be listed; the collection is unchanged.
    pub async fn load_dir(&self, dir: &str) -> Result<LoadOutcome> {
        self.replace_with("dir", async {
            let entries = DirectoryScanner::new(&self.fs).scan_flat(dir).await?;
            Ok::<_, GalleryError>(self.records_for(&entries))
        })
        .await
    }

    /// Replace the collection with the media files anywhere below `dir`
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Fs` if `dir` cannot be listed; the collection is unchanged.
    pub async fn load_dir_recursive(&self, dir: &str) -> Result<LoadOutcome> {
        self.replace_with("dir_recursive", async {
            let entries = DirectoryScanner::new(&self.fs).scan_recursive(dir).await?;
            Ok::<_, GalleryError>(self.records_for(&entries))
        })
        .await
    }

    /// Replace the collection with the result of a free-text search
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Remote` if the search fails; the collection is unchanged.
    pub async fn search(&self, text: &str) -> Result<LoadOutcome> {
        self.replace_with("search", async {
            let paths = self.client.search(text).await?;
            Ok::<_, GalleryError>(self.resolver.resolve_all(&paths))
        })
        .await
    }

    /// Replace the collection with the images matching a tag set
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Remote` if the search fails; the collection is unchanged.
    pub async fn search_by_tags(&self, tags: &[String]) -> Result<LoadOutcome> {
        self.replace_with("tag_search", async {
            let paths = self.client.search_by_tags(tags).await?;
            Ok::<_, GalleryError>(self.resolver.resolve_all(&paths))
        })
        .await
    }

    /// Replace the collection with a boolean tag search
    ///
    /// The remote response is used as is; no local tag filtering is applied.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Remote` if the search fails; the collection is unchanged.
    pub async fn search_by_tags_advanced(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> Result<LoadOutcome> {
        self.replace_with("advanced_tag_search", async {
            let paths = self
                .client
                .search_by_tags_advanced(positive, negative)
                .await?;
            Ok::<_, GalleryError>(self.resolver.resolve_all(&paths))
        })
        .await
    }

    /// Replace the collection with the records of a download log file
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Fs` if the file cannot be read; the collection is unchanged.
    pub async fn import_log(&self, path: &str) -> Result<LoadOutcome> {
        self.replace_with("import", async {
            let content = self.fs.read_text(path).await?;
            Ok::<_, GalleryError>((parse_log(&content), 0))
        })
        .await
    }

    /// Replace the collection with the records of an in-memory log
    #[must_use]
    pub fn import_text(&self, content: &str) -> LoadOutcome {
        let ticket = self.next_ticket();
        self.publish("import_text", ticket, parse_log(content), 0)
    }

    /// Empty the collection and clear the selection
    pub fn reset(&self) {
        let ticket = self.next_ticket();
        let _ = self.publish("reset", ticket, Vec::new(), 0);
    }

    // ------------------------------------------------------------------
    // Picker-driven variants
    // ------------------------------------------------------------------

    /// Ask for an image file and load it
    ///
    /// # Errors
    ///
    /// Same as [`GalleryStore::load_file`].
    pub async fn open_file<P: Picker>(&self, picker: &P) -> Result<LoadOutcome> {
        match picker.pick_file(&FileFilter::IMAGES).await {
            Some(path) => self.load_file(&path).await,
            None => Ok(cancelled("open_file")),
        }
    }

    /// Ask for a directory and load its media files
    ///
    /// # Errors
    ///
    /// Same as [`GalleryStore::load_dir`].
    pub async fn open_dir<P: Picker>(&self, picker: &P) -> Result<LoadOutcome> {
        match picker.pick_directory().await {
            Some(dir) => self.load_dir(&dir).await,
            None => Ok(cancelled("open_dir")),
        }
    }

    /// Ask for a directory and load its media files recursively
    ///
    /// # Errors
    ///
    /// Same as [`GalleryStore::load_dir_recursive`].
    pub async fn open_dir_recursive<P: Picker>(&self, picker: &P) -> Result<LoadOutcome> {
        match picker.pick_directory().await {
            Some(dir) => self.load_dir_recursive(&dir).await,
            None => Ok(cancelled("open_dir_recursive")),
        }
    }

    /// Ask for a log file and import it
    ///
    /// # Errors
    ///
    /// Same as [`GalleryStore::import_log`].
    pub async fn open_import_log<P: Picker>(&self, picker: &P) -> Result<LoadOutcome> {
        match picker.pick_text_file().await {
            Some(path) => self.import_log(&path).await,
            None => Ok(cancelled("open_import_log")),
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Persist the paths of the current collection on the remote index
    ///
    /// Imported records contribute empty paths unless
    /// `skip_unbacked_on_save` is set.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Remote` if the remote save fails.
    pub async fn save(&self) -> Result<String> {
        let skip_unbacked = self.options.skip_unbacked_on_save;
        let paths: Vec<String> = self
            .collection()
            .iter()
            .filter(|record| !skip_unbacked || record.is_backed())
            .map(|record| record.path.clone())
            .collect();

        match self.client.save(&paths).await {
            Ok(confirmation) => {
                info!(count = paths.len(), "saved working set");
                Ok(confirmation)
            }
            Err(e) => {
                warn!(count = paths.len(), error = %e, "saving working set failed");
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Filter and selection
    // ------------------------------------------------------------------

    /// Replace the typed text filter
    pub fn set_filter(&self, text: &str) {
        self.state.send_if_modified(|state| {
            if state.filter.as_str() == text {
                return false;
            }
            state.filter = TextFilter::new(text);
            true
        });
    }

    /// Select only the record at `index`
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` if `index` is not in the collection.
    pub fn select_single(&self, index: usize) -> std::result::Result<(), SelectionError> {
        self.update_selection(|sel, len| sel.select_single(index, len))
    }

    /// Select the range between the anchor and `index`
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` if `index` is not in the collection.
    pub fn extend_range(&self, index: usize) -> std::result::Result<(), SelectionError> {
        self.update_selection(|sel, len| sel.extend_range(index, len))
    }

    /// Flip the selection of the record at `index`
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` if `index` is not in the collection.
    pub fn toggle(&self, index: usize) -> std::result::Result<(), SelectionError> {
        self.update_selection(|sel, len| sel.toggle(index, len))
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|state| {
            if state.selection.is_empty() && state.selection.anchor().is_none() {
                return false;
            }
            state.selection.clear();
            true
        });
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn update_selection<Op>(&self, op: Op) -> std::result::Result<(), SelectionError>
    where
        Op: FnOnce(&mut Selection, usize) -> std::result::Result<(), SelectionError>,
    {
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| {
            let len = state.collection.len();
            outcome = op(&mut state.selection, len);
            outcome.is_ok()
        });
        outcome
    }

    fn records_for(&self, entries: &[DirEntry]) -> (Vec<ImageRecord>, usize) {
        let records = entries
            .iter()
            .map(|entry| self.resolver.record(&entry.name, &entry.path))
            .collect();
        (records, 0)
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn replace_with<Fut>(&self, op: &'static str, load: Fut) -> Result<LoadOutcome>
    where
        Fut: Future<Output = Result<(Vec<ImageRecord>, usize)>>,
    {
        let ticket = self.next_ticket();
        debug!(op, ticket, "load started");

        match load.await {
            Ok((records, dropped)) => Ok(self.publish(op, ticket, records, dropped)),
            Err(e) => {
                warn!(op, error = %e, "load failed, keeping current collection");
                Err(e)
            }
        }
    }

    fn publish(
        &self,
        op: &'static str,
        ticket: u64,
        records: Vec<ImageRecord>,
        dropped: usize,
    ) -> LoadOutcome {
        let loaded = records.len();
        let discard_stale = self.options.discard_stale_loads;

        let applied = self.state.send_if_modified(|state| {
            if discard_stale && ticket < state.generation {
                return false;
            }
            state.collection = Arc::new(records);
            state.selection.clear();
            state.generation = ticket;
            true
        });

        if applied {
            info!(op, loaded, dropped, "collection replaced");
            LoadOutcome::Replaced { loaded, dropped }
        } else {
            debug!(op, ticket, "discarding superseded load");
            LoadOutcome::Superseded
        }
    }
}

fn cancelled(op: &'static str) -> LoadOutcome {
    debug!(op, "picker cancelled");
    LoadOutcome::Cancelled
}
