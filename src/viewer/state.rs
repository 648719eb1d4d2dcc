//! Match browsing state: selection, sorting and filtering.
//!
//! Operates purely on already-fetched matches; nothing here touches the
//! network. The stored list is never mutated by filtering, only the visible
//! projection changes.

use crate::models::Match;

/// Column the match table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Similarity score (highest risk first by default).
    #[default]
    Similarity,
    /// Chunk index (document order by default).
    Chunk,
}

impl SortKey {
    /// Default direction when this key becomes active.
    fn default_direction(self) -> SortDirection {
        match self {
            SortKey::Similarity => SortDirection::Desc,
            SortKey::Chunk => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Selection, sort and filter state over one analysis' match list.
///
/// Selection never toggles off: re-selecting the current match keeps it, and
/// deselection only happens when the match is filtered out or the result set
/// is replaced.
#[derive(Debug, Clone)]
pub struct MatchBrowser {
    matches: Vec<Match>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    selected: Option<u32>,
    filter: String,
}

impl MatchBrowser {
    /// Browser over a fresh match list: sorted by similarity descending,
    /// nothing selected, no filter.
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches,
            sort_key: SortKey::Similarity,
            sort_direction: SortDirection::Desc,
            selected: None,
            filter: String::new(),
        }
    }

    /// Replace the underlying match list, resetting all view state.
    pub fn replace(&mut self, matches: Vec<Match>) {
        *self = Self::new(matches);
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Activate a sort column.
    ///
    /// Re-selecting the active key flips direction; switching keys resets to
    /// that key's default direction.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = key.default_direction();
        }
    }

    /// Set the sort explicitly (CLI flags rather than column clicks).
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
    }

    /// Select the match with the given chunk index.
    ///
    /// Returns false (leaving the selection untouched) if no visible match
    /// carries that index. Selecting the already-selected match keeps it.
    pub fn select(&mut self, chunk_index: u32) -> bool {
        let visible = self
            .visible()
            .iter()
            .any(|m| m.chunk_index == chunk_index);
        if visible {
            self.selected = Some(chunk_index);
        }
        visible
    }

    /// Currently selected match, if any.
    pub fn selected(&self) -> Option<&Match> {
        let chunk = self.selected?;
        self.matches.iter().find(|m| m.chunk_index == chunk)
    }

    /// Apply a free-text filter.
    ///
    /// Narrows the visible list without touching the stored one. If the
    /// selected match no longer passes the filter, the selection clears.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        if let Some(chunk) = self.selected {
            let still_visible = self
                .matches
                .iter()
                .any(|m| m.chunk_index == chunk && m.matches_filter(&self.filter));
            if !still_visible {
                self.selected = None;
            }
        }
    }

    /// Visible matches: filtered, then sorted by the active key.
    ///
    /// Sorting is stable, so equal keys keep document order.
    pub fn visible(&self) -> Vec<&Match> {
        let mut visible: Vec<&Match> = self
            .matches
            .iter()
            .filter(|m| m.matches_filter(&self.filter))
            .collect();

        visible.sort_by(|a, b| {
            let ordering = match self.sort_key {
                SortKey::Similarity => a
                    .similarity
                    .partial_cmp(&b.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal),
                SortKey::Chunk => a.chunk_index.cmp(&b.chunk_index),
            };
            match self.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        visible
    }

    /// Total number of stored matches, ignoring the filter.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
