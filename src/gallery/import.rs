//! Parsing of pipe-delimited download logs
//!
//! Each non-blank line describes one remote image:
//!
//! ```text
//! ignored|url|subreddit|ignored|title|threadUrl
//! ```
//!
//! Fields 0 and 3 are not used. Lines with fewer fields still produce a
//! record; missing text fields come out empty and missing optional fields
//! come out as `None`. Imported records have no local file, so `path` is
//! empty and `src` is the url as written.

use crate::ImageRecord;

const URL: usize = 1;
const SUBREDDIT: usize = 2;
const TITLE: usize = 4;
const THREAD_URL: usize = 5;

/// Parse one log line into a record
#[must_use]
pub fn parse_line(line: &str) -> ImageRecord {
    let fields: Vec<&str> = line.split('|').collect();
    let field = |index: usize| fields.get(index).map(|s| (*s).to_string());

    ImageRecord {
        name: field(TITLE).unwrap_or_default(),
        path: String::new(),
        src: field(URL).unwrap_or_default(),
        subreddit: field(SUBREDDIT),
        thread_url: field(THREAD_URL),
    }
}

/// Parse a whole log, skipping blank lines
#[must_use]
pub fn parse_log(content: &str) -> Vec<ImageRecord> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let record = parse_line("ignored|http://img|aww|ignored|My Title|http://thread");
        assert_eq!(
            record,
            ImageRecord {
                name: "My Title".into(),
                src: "http://img".into(),
                path: String::new(),
                subreddit: Some("aww".into()),
                thread_url: Some("http://thread".into()),
            }
        );
    }

    #[test]
    fn test_parse_short_line_keeps_record() {
        let record = parse_line("x|http://img|pics");
        assert_eq!(record.src, "http://img");
        assert_eq!(record.subreddit.as_deref(), Some("pics"));
        assert_eq!(record.name, "");
        assert_eq!(record.thread_url, None);
        assert!(!record.is_backed());
    }

    #[test]
    fn test_parse_log_skips_blank_lines() {
        let content = "a|u1|s1|b|t1|th1\n\n   \r\na|u2|s2|b|t2|th2\r\n";
        let records = parse_log(content);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "t1");
        assert_eq!(records[1].src, "u2");
        assert_eq!(records[1].thread_url.as_deref(), Some("th2"));
    }

    #[test]
    fn test_parse_empty_log() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n\n").is_empty());
    }
}
