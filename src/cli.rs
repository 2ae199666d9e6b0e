//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for galtag using the `clap` crate.
//!
//! # Commands
//!
//! - **open / dir / search / tags / advanced / import**: build a collection and print it
//! - **save**: scan a directory and persist it as the working set
//! - **tag-list / tag-create**: inspect and grow the tag catalog
//! - **tag-all / untag-all / auto-tag**: tag operations on explicit paths
//! - **suggest / params**: read generation metadata of an image
//!
//! Every loading command accepts `--filter` (print only matching records),
//! `--select` (highlight records, e.g. `0-3,7`) and `--tag-selected` (attach
//! a tag to the highlighted records). Paths that are not picked on the
//! command line are asked for interactively.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::fs::FsError;

/// View options shared by every loading command
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only print records whose name, path or subreddit contains TEXT
    #[arg(short = 'F', long = "filter", value_name = "TEXT")]
    pub filter: Option<String>,

    /// Highlight records by position, e.g. `0-3,7`
    #[arg(short = 's', long = "select", value_name = "SPEC", value_parser = parse_selection)]
    pub select: Option<SelectSpec>,

    /// Attach TAG to the highlighted records
    #[arg(long = "tag-selected", value_name = "TAG", requires = "select")]
    pub tag_selected: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load a single image
    #[command(visible_alias = "o")]
    Open {
        /// Image file (asked for if omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Load the media files of a directory
    #[command(visible_alias = "d")]
    Dir {
        /// Directory (asked for if omitted)
        dir: Option<PathBuf>,
        /// Include all subdirectories
        #[arg(short = 'r', long = "recursive")]
        recursive: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Free-text search on the index
    #[command(visible_alias = "s")]
    Search {
        text: String,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Find images carrying the given tags
    #[command(visible_alias = "t")]
    Tags {
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Boolean tag search
    Advanced {
        /// Tags an image must carry
        #[arg(short = 'w', long = "with", value_name = "TAG", num_args = 0..)]
        with: Vec<String>,
        /// Tags an image must not carry
        #[arg(short = 'x', long = "without", value_name = "TAG", num_args = 0..)]
        without: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Import records from a pipe-delimited download log
    #[command(visible_alias = "i")]
    Import {
        /// Log file (asked for if omitted)
        file: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Scan a directory and persist it as the working set
    Save {
        dir: PathBuf,
        #[arg(short = 'r', long = "recursive")]
        recursive: bool,
    },
    /// List the tag catalog
    #[command(name = "tag-list", visible_alias = "ls")]
    TagList,
    /// Create a tag in the catalog
    #[command(name = "tag-create")]
    TagCreate { name: String },
    /// Attach a tag to every given image
    #[command(name = "tag-all")]
    TagAll {
        tag: String,
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
    /// Detach a tag from every given image
    #[command(name = "untag-all")]
    UntagAll {
        tag: String,
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
    /// Ask the index to tag matching images automatically
    #[command(name = "auto-tag")]
    AutoTag {
        tag: String,
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
        /// Use the looser matching threshold
        #[arg(long = "lenient")]
        lenient: bool,
    },
    /// Suggest tags from an image's generation prompt
    Suggest { path: PathBuf },
    /// Print an image's raw generation parameters
    Params { path: PathBuf },
}

impl Commands {
    /// View options of a loading command
    #[must_use]
    pub const fn view(&self) -> Option<&ViewArgs> {
        match self {
            Self::Open { view, .. }
            | Self::Dir { view, .. }
            | Self::Search { view, .. }
            | Self::Tags { view, .. }
            | Self::Advanced { view, .. }
            | Self::Import { view, .. } => Some(view),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "galtag")]
#[command(about = "A tag-aware gallery manager", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// One step of a `--select` spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStep {
    One(usize),
    Range(usize, usize),
}

/// Parsed `--select` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSpec(pub Vec<SelectStep>);

/// Parse `0-3,7` into selection steps
///
/// # Errors
///
/// Returns a message naming the part that is not an index or range.
pub fn parse_selection(spec: &str) -> Result<SelectSpec, String> {
    let index = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("'{s}' is not a record index"))
    };

    spec.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| match part.split_once('-') {
            Some((from, to)) => Ok(SelectStep::Range(index(from)?, index(to)?)),
            None => index(part).map(SelectStep::One),
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(|steps| {
            if steps.is_empty() {
                Err("empty selection".to_string())
            } else {
                Ok(SelectSpec(steps))
            }
        })
}

/// Borrow a command-line path as UTF-8
///
/// # Errors
///
/// Returns `FsError::InvalidPath` if the path is not valid UTF-8.
pub fn path_str(path: &Path) -> Result<&str, FsError> {
    path.to_str()
        .ok_or_else(|| FsError::InvalidPath(path.display().to_string()))
}

/// Convert command-line paths to strings
///
/// # Errors
///
/// Returns `FsError::InvalidPath` for the first path that is not valid UTF-8.
pub fn path_strings(paths: &[PathBuf]) -> Result<Vec<String>, FsError> {
    paths
        .iter()
        .map(|p| path_str(p).map(str::to_string))
        .collect()
}
