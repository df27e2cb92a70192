use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of items per page of a chunked "all items" listing.
pub const DEFAULT_CHUNK_SIZE: usize = 17;

/// Construction settings for a [`SelectTree`](crate::SelectTree).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectTreeConfig {
    /// Items per page when a catalog is split into chunk branches.
    pub chunk_size: usize,
    /// Text of the non-selectable leaf shown under an empty branch.
    pub no_items_label: Cow<'static, str>,
}

impl SelectTreeConfig {
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            no_items_label: Cow::Borrowed("(no items)"),
        }
    }

    /// Sets the chunk size; zero is treated as one.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        self
    }

    #[must_use]
    pub fn with_no_items_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.no_items_label = label.into();
        self
    }

    /// Returns the chunk size, never less than one.
    #[inline]
    pub const fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 { 1 } else { self.chunk_size }
    }
}

impl Default for SelectTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunk_size_is_clamped() {
        let config = SelectTreeConfig::new().with_chunk_size(0);
        assert_eq!(config.effective_chunk_size(), 1);

        let raw = SelectTreeConfig {
            chunk_size: 0,
            ..SelectTreeConfig::default()
        };
        assert_eq!(raw.effective_chunk_size(), 1);
    }
}
