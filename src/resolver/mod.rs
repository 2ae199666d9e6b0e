//! Path resolution for display
//!
//! Turns a canonical filesystem path into a URI the presentation layer can
//! load directly, and extracts a short display name. Both operations are pure:
//! the same input always yields the same output and no I/O is performed.
//!
//! Display URIs have the shape `<protocol>://localhost/<encoded path>` where the
//! whole path is percent-encoded as a single segment (separators included).

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::ImageRecord;

/// Default scheme for local resource URIs
pub const DEFAULT_ASSET_PROTOCOL: &str = "asset";

/// Errors that can occur while resolving a path into a record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The configured protocol does not form a usable base URI
    #[error("Invalid asset protocol: {0}")]
    InvalidProtocol(String),

    /// The path has no final segment to display
    #[error("Path has no file name: {0:?}")]
    NoFileName(String),
}

/// Maps canonical paths to display sources and names
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: Url,
}

impl PathResolver {
    /// Create a resolver for the given URI scheme (e.g. `asset`)
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::InvalidProtocol` if the scheme cannot be used as
    /// a hierarchical base URI.
    pub fn new(protocol: &str) -> Result<Self, ResolveError> {
        let base = Url::parse(&format!("{protocol}://localhost/"))
            .map_err(|e| ResolveError::InvalidProtocol(format!("{protocol}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ResolveError::InvalidProtocol(protocol.to_string()));
        }
        Ok(Self { base })
    }

    /// Build the display reference for a canonical path
    #[must_use]
    pub fn to_display_source(&self, path: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url.into()
    }

    /// Build a record for a path whose display name is already known
    #[must_use]
    pub fn record(&self, name: &str, path: &str) -> ImageRecord {
        ImageRecord::new(name, path, self.to_display_source(path))
    }

    /// Resolve a bare path into a record, deriving the name from it
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NoFileName` when the path has no final segment.
    pub fn resolve(&self, path: &str) -> Result<ImageRecord, ResolveError> {
        let name = basename(path);
        if name.is_empty() {
            return Err(ResolveError::NoFileName(path.to_string()));
        }
        Ok(self.record(name, path))
    }

    /// Resolve many paths, dropping the ones that fail
    ///
    /// Returns the resolved records in input order plus the number dropped.
    #[must_use]
    pub fn resolve_all<S: AsRef<str>>(&self, paths: &[S]) -> (Vec<ImageRecord>, usize) {
        let mut dropped = 0;
        let records = paths
            .iter()
            .filter_map(|path| {
                let path: &str = path.as_ref();
                match self.resolve(path) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(path, error = %e, "dropping unresolvable record");
                        dropped += 1;
                        None
                    }
                }
            })
            .collect();
        (records, dropped)
    }
}

/// Final segment of a path, accepting both `/` and `\` as separators
///
/// Trailing separators are ignored. Returns an empty string for empty input.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
}
