//! Multi-select model over the loaded collection
//!
//! Indices always refer to positions in the full collection, not the filtered
//! view. Every mutator takes the current collection length and rejects indices
//! outside it, so the state can never point past the collection.

use std::collections::BTreeSet;

use thiserror::Error;

/// Selection-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Index does not address a record in the collection
    #[error("Index {index} is out of range for a collection of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Highlighted records plus the anchor used for range extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<usize>,
    indices: BTreeSet<usize>,
}

impl Selection {
    /// Create new empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    #[must_use]
    pub const fn indices(&self) -> &BTreeSet<usize> {
        &self.indices
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Plain click: select only `index` and make it the anchor
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` and leaves the selection untouched
    /// if `index >= len`.
    pub fn select_single(&mut self, index: usize, len: usize) -> Result<(), SelectionError> {
        check(index, len)?;
        self.anchor = Some(index);
        self.indices.clear();
        self.indices.insert(index);
        Ok(())
    }

    /// Shift-click: select the closed interval between the anchor and `index`
    ///
    /// The anchor does not move. Without an anchor this behaves like
    /// [`Selection::select_single`].
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` and leaves the selection untouched
    /// if `index >= len`.
    pub fn extend_range(&mut self, index: usize, len: usize) -> Result<(), SelectionError> {
        check(index, len)?;
        let Some(anchor) = self.anchor.filter(|&a| a < len) else {
            return self.select_single(index, len);
        };
        let (start, end) = if anchor <= index {
            (anchor, index)
        } else {
            (index, anchor)
        };
        self.indices = (start..=end).collect();
        Ok(())
    }

    /// Ctrl-click: flip membership of `index` without moving the anchor
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::OutOfRange` and leaves the selection untouched
    /// if `index >= len`.
    pub fn toggle(&mut self, index: usize, len: usize) -> Result<(), SelectionError> {
        check(index, len)?;
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
        Ok(())
    }

    /// Clear all selections
    pub fn clear(&mut self) {
        self.anchor = None;
        self.indices.clear();
    }
}

const fn check(index: usize, len: usize) -> Result<(), SelectionError> {
    if index < len {
        Ok(())
    } else {
        Err(SelectionError::OutOfRange { index, len })
    }
}
