//! Output formatting for CLI display
//!
//! This module provides utilities for formatting gallery records and tag
//! lists in the CLI. Quiet mode prints bare identifiers suitable for piping.

use colored::Colorize;
use std::path::Path;

use crate::ImageRecord;
use crate::gallery::GalleryState;

/// Identifier printed for a record: its path, or its source when unbacked
#[must_use]
pub fn record_id(record: &ImageRecord) -> &str {
    if record.is_backed() {
        &record.path
    } else {
        &record.src
    }
}

/// Format one record for display
#[must_use]
pub fn record_line(index: usize, record: &ImageRecord, selected: bool, quiet: bool) -> String {
    if quiet {
        return record_id(record).to_string();
    }

    let marker = if selected { "*" } else { " " };
    let mut line = format!("{marker}{index:>4}  {}", record.name.bold());
    if let Some(subreddit) = &record.subreddit {
        line.push_str(&format!(" {}", format!("r/{subreddit}").cyan()));
    }
    line.push_str(&format!("  {}", colorize_id(record)));
    line
}

/// Color a record's identifier (green if the local file exists, red if
/// missing, blue for remote-only records)
#[must_use]
pub fn colorize_id(record: &ImageRecord) -> String {
    let id = record_id(record);
    if !record.is_backed() {
        id.blue().to_string()
    } else if Path::new(id).exists() {
        id.green().to_string()
    } else {
        id.red().to_string()
    }
}

/// Format a tag list
#[must_use]
pub fn tag_list(tags: &[String], quiet: bool) -> String {
    if quiet {
        tags.join("\n")
    } else if tags.is_empty() {
        "  (no tags)".to_string()
    } else {
        tags.iter()
            .map(|tag| format!("  {}", tag.cyan()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print the filtered view of a gallery state
///
/// Positions are collection indices, so they can be fed back to `--select`.
pub fn print_state(state: &GalleryState, quiet: bool) {
    let visible = state.filtered_indices();
    if visible.is_empty() {
        if !quiet {
            println!("{}", "No images.".yellow());
        }
        return;
    }
    for &index in &visible {
        let record = &state.collection[index];
        let selected = state.selection.contains(index);
        println!("{}", record_line(index, record, selected, quiet));
    }
    if !quiet {
        let total = state.collection.len();
        if visible.len() == total {
            println!("\n{total} image(s)");
        } else {
            println!("\n{} of {total} image(s) match '{}'", visible.len(), state.filter.as_str());
        }
        if !state.selection.is_empty() {
            println!("{} selected", state.selection.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imported() -> ImageRecord {
        ImageRecord {
            name: "Kitten".into(),
            src: "http://img/k.png".into(),
            subreddit: Some("aww".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_record_id_falls_back_to_src() {
        let local = ImageRecord::new("a.png", "/pics/a.png", "asset://localhost/a");
        assert_eq!(record_id(&local), "/pics/a.png");
        assert_eq!(record_id(&imported()), "http://img/k.png");
    }

    #[test]
    fn test_quiet_record_line_is_bare_id() {
        assert_eq!(record_line(3, &imported(), true, true), "http://img/k.png");
    }

    #[test]
    fn test_record_line_contents() {
        colored::control::set_override(false);
        let line = record_line(2, &imported(), true, false);
        assert!(line.starts_with("*   2  Kitten"));
        assert!(line.contains("r/aww"));
        assert!(line.ends_with("http://img/k.png"));
    }

    #[test]
    fn test_tag_list() {
        colored::control::set_override(false);
        let tags = vec!["cat".to_string(), "dog".to_string()];
        assert_eq!(tag_list(&tags, true), "cat\ndog");
        assert_eq!(tag_list(&tags, false), "  cat\n  dog");
        assert_eq!(tag_list(&[], false), "  (no tags)");
    }
}
