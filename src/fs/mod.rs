//! Filesystem collaborator
//!
//! The gallery core reads the filesystem only through the [`FileSystem`]
//! trait: directory listings for the scanner and text reads for log imports.
//! [`LocalFs`] is the tokio-backed implementation used by the application;
//! tests substitute an in-memory one.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

/// Filesystem-specific errors
#[derive(Debug, Error)]
pub enum FsError {
    /// Underlying I/O failure for a path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Path cannot be represented as UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    InvalidPath(String),
}

impl FsError {
    fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Final path segment
    pub name: String,
    /// Full path (parent joined with name)
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read access to a filesystem
///
/// Listing order is whatever the implementation returns; callers must not
/// assume it is sorted.
pub trait FileSystem {
    /// List the immediate children of a directory
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the directory cannot be read.
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Read a whole UTF-8 text file
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the file cannot be read or is not UTF-8.
    async fn read_text(&self, path: &str) -> Result<String, FsError>;
}

/// Local disk access through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Kind of the entry itself; symbolic links are not followed
    async fn entry_kind(entry: &tokio::fs::DirEntry) -> Option<EntryKind> {
        let file_type = entry.file_type().await.ok()?;
        let kind = if file_type.is_symlink() {
            EntryKind::Other
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        };
        Some(kind)
    }
}

impl FileSystem for LocalFs {
    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|e| FsError::io(path, e))?;
        let mut entries = Vec::new();

        while let Some(entry) = reader.next_entry().await.map_err(|e| FsError::io(path, e))? {
            let Ok(name) = entry.file_name().into_string() else {
                warn!(dir = path, "skipping entry with non UTF-8 name");
                continue;
            };
            let Some(full) = Path::new(path).join(&name).to_str().map(String::from) else {
                warn!(dir = path, name = %name, "skipping entry with non UTF-8 path");
                continue;
            };
            let Some(kind) = Self::entry_kind(&entry).await else {
                warn!(path = %full, "skipping entry with unreadable file type");
                continue;
            };
            entries.push(DirEntry::new(name, full, kind));
        }

        debug!(dir = path, count = entries.len(), "listed directory");
        Ok(entries)
    }

    async fn read_text(&self, path: &str) -> Result<String, FsError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FsError::io(path, e))
    }
}
