//! Galtag - a tag-aware gallery manager core
//!
//! This library owns the client side of a local media gallery: it builds the
//! current image collection from files, directory scans, remote index queries
//! or imported logs, tracks a multi-select over that collection, and forwards
//! tag operations to a remote index reached through request/response calls.

#![allow(async_fn_in_trait)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cli;
pub mod client;
pub mod config;
pub mod fs;
pub mod gallery;
pub mod logging;
pub mod output;
pub mod picker;
pub mod resolver;
pub mod scanner;
pub mod tags;

#[cfg(test)]
pub mod testing;

pub use client::{CommandClient, QueryClient, RemoteCallError};
pub use gallery::{GalleryStore, LoadOutcome};
pub use resolver::PathResolver;
pub use scanner::DirectoryScanner;
pub use tags::TagStore;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Remote index call failed
    #[error("Remote call failed: {0}")]
    Remote(#[from] client::RemoteCallError),
    /// Filesystem collaborator failed
    #[error("Filesystem error: {0}")]
    Fs(#[from] fs::FsError),
    /// A path could not be turned into a record
    #[error("Resolution error: {0}")]
    Resolve(#[from] resolver::ResolveError),
    /// Selection index was rejected
    #[error("Selection error: {0}")]
    Selection(#[from] gallery::SelectionError),
    /// Logger could not be configured
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LoggingError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// One catalog entry of the gallery
///
/// `path` is the identity used for persistence and tag operations. `src` is
/// derived from it for display and must not be compared as identity. Records
/// imported from a log have an empty `path`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ImageRecord {
    pub name: String,
    pub path: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_url: Option<String>,
}

impl ImageRecord {
    /// Create a record backed by a local file
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            src: src.into(),
            subreddit: None,
            thread_url: None,
        }
    }

    /// Whether this record has a local file behind it
    #[must_use]
    pub fn is_backed(&self) -> bool {
        !self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_backing() {
        let local = ImageRecord::new("a.png", "/pics/a.png", "asset://localhost/a");
        assert!(local.is_backed());

        let imported = ImageRecord {
            name: "title".into(),
            src: "http://img".into(),
            ..Default::default()
        };
        assert!(!imported.is_backed());
    }

    #[test]
    fn test_error_display() {
        let error = GalleryError::InvalidInput("no tags".into());
        assert_eq!(error.to_string(), "Invalid input: no tags");
    }
}
