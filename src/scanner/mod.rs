//! Directory scanning
//!
//! Produces the media files below a directory, either one level deep
//! ([`DirectoryScanner::scan_flat`]) or across all descendants
//! ([`DirectoryScanner::scan_recursive`]).
//!
//! Both scans share the same output policy:
//! - only regular files are emitted, directories are expanded and never emitted
//! - names must end with one of [`MEDIA_EXTENSIONS`] (case-sensitive)
//! - the final list is reversed relative to the listing order
//!
//! The reversal puts the last-listed entries first. It is not a recency sort:
//! no timestamps are consulted, so the order follows whatever the filesystem
//! returned (and, for recursive scans, the depth-first flattening order).

use futures::future::{self, FutureExt, LocalBoxFuture};
use tracing::{debug, warn};

use crate::fs::{DirEntry, EntryKind, FileSystem, FsError};

/// Extensions accepted by both scans and by the image picker
pub const MEDIA_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "mp4", "webm"];

/// Whether a file name passes the media allow-list
///
/// The check is a plain, case-sensitive suffix match: `c.MP4` is rejected.
#[must_use]
pub fn is_media_name(name: &str) -> bool {
    MEDIA_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Apply the shared output policy to a flattened listing
fn finish(entries: Vec<DirEntry>) -> Vec<DirEntry> {
    let mut media: Vec<DirEntry> = entries
        .into_iter()
        .filter(|entry| entry.is_file() && is_media_name(&entry.name))
        .collect();
    media.reverse();
    media
}

/// Scans directories through a [`FileSystem`]
pub struct DirectoryScanner<'a, F> {
    fs: &'a F,
}

impl<'a, F: FileSystem> DirectoryScanner<'a, F> {
    #[must_use]
    pub const fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// List the media files directly inside `dir`
    ///
    /// # Errors
    ///
    /// Returns `FsError` if `dir` itself cannot be listed.
    pub async fn scan_flat(&self, dir: &str) -> Result<Vec<DirEntry>, FsError> {
        let entries = self.fs.list_dir(dir).await?;
        let media = finish(entries);
        debug!(dir, count = media.len(), "flat scan complete");
        Ok(media)
    }

    /// List the media files anywhere below `dir`
    ///
    /// Subdirectories are listed concurrently. A subdirectory that cannot be
    /// read contributes nothing; only a failure on `dir` itself is an error.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if `dir` itself cannot be listed.
    pub async fn scan_recursive(&self, dir: &str) -> Result<Vec<DirEntry>, FsError> {
        let entries = self.fs.list_dir(dir).await?;
        let flattened = self.expand(entries).await;
        let media = finish(flattened);
        debug!(dir, count = media.len(), "recursive scan complete");
        Ok(media)
    }

    /// Replace every directory in `entries` by its flattened contents
    async fn expand(&self, entries: Vec<DirEntry>) -> Vec<DirEntry> {
        let branches = entries.into_iter().map(|entry| match entry.kind {
            EntryKind::Directory => self.walk(entry.path),
            _ => future::ready(vec![entry]).boxed_local(),
        });

        future::join_all(branches).await.into_iter().flatten().collect()
    }

    fn walk(&self, dir: String) -> LocalBoxFuture<'_, Vec<DirEntry>> {
        async move {
            match self.fs.list_dir(&dir).await {
                Ok(entries) => self.expand(entries).await,
                Err(e) => {
                    warn!(dir, error = %e, "skipping unreadable subdirectory");
                    Vec::new()
                }
            }
        }
        .boxed_local()
    }
}
