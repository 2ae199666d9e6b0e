//! Trait-based text filtering for gallery records
//!
//! The typed filter is a purely local view over the loaded collection: it
//! never replaces the collection and never reaches the remote index.
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  AsSearchFields Trait               │  ← Adaptation layer
//! │  - search_fields() -> SearchFields  │
//! └─────────────────────────────────────┘
//!            ▲
//!            │ implements
//!            │
//!       ImageRecord
//!
//! ┌─────────────────────────────────────┐
//! │  TextFilterExt<T: AsSearchFields>   │  ← Filtering logic
//! │  - matching(&TextFilter)            │
//! └─────────────────────────────────────┘
//! ```

use crate::ImageRecord;

/// Borrowed view of the fields a text filter looks at
#[derive(Debug, Clone, Copy)]
pub struct SearchFields<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub subreddit: Option<&'a str>,
}

/// Types that can be matched by a [`TextFilter`]
pub trait AsSearchFields {
    fn search_fields(&self) -> SearchFields<'_>;
}

impl AsSearchFields for ImageRecord {
    fn search_fields(&self) -> SearchFields<'_> {
        SearchFields {
            name: &self.name,
            path: &self.path,
            subreddit: self.subreddit.as_deref(),
        }
    }
}

/// Case-insensitive substring filter
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    raw: String,
    needle: String,
}

impl TextFilter {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let needle = raw.to_lowercase();
        Self { raw, needle }
    }

    /// Filter text as typed
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Whether name, path or subreddit contains the filter text
    #[must_use]
    pub fn matches<T: AsSearchFields + ?Sized>(&self, item: &T) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let fields = item.search_fields();
        let hit = |field: &str| field.to_lowercase().contains(&self.needle);

        hit(fields.name) || hit(fields.path) || fields.subreddit.is_some_and(hit)
    }
}

/// Extension trait for filtering collections of searchable items
pub trait TextFilterExt<T: AsSearchFields> {
    /// Items matching `filter`, in collection order
    fn matching<'a>(&'a self, filter: &'a TextFilter) -> impl Iterator<Item = &'a T> + 'a
    where
        T: 'a;
}

impl<T: AsSearchFields> TextFilterExt<T> for [T] {
    fn matching<'a>(&'a self, filter: &'a TextFilter) -> impl Iterator<Item = &'a T> + 'a
    where
        T: 'a,
    {
        self.iter().filter(move |item| filter.matches(*item))
    }
}
