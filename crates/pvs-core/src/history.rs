//! History bridge
//!
//! Linear session history with a cursor, mirroring how a browser records
//! in-place navigations. Entry zero is always the initial pageload and
//! carries no state object; every completed navigation pushes an entry
//! holding the query and page that produced it. Pushing while the cursor
//! sits before the newest entry truncates everything after the cursor.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// State object recorded with a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Search terms. Never empty; rejected queries are never recorded.
    pub query: String,
    /// One-based results page.
    pub page: u32,
}

impl NavigationState {
    /// Creates a state. A page of zero is normalized to one.
    #[must_use]
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }

    /// Recovers state from an address's query parameters.
    ///
    /// Used when a traversal lands on an entry recorded without a state
    /// object, such as the initial pageload of a bookmarked search.
    /// Returns `None` when the address carries no query; the page defaults
    /// to one when absent or unparsable.
    #[must_use]
    pub fn from_address(address: &str) -> Option<Self> {
        let url = Url::parse(address).ok()?;
        let mut query = None;
        let mut page = 1;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "query" if !value.is_empty() => query = Some(value.into_owned()),
                "page" => page = value.parse().map_or(1, |p: u32| p.max(1)),
                _ => {}
            }
        }
        query.map(|query| Self { query, page })
    }
}

/// One recorded history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// State object, absent on the initial pageload entry.
    pub state: Option<NavigationState>,
    /// Document title at the time the entry was recorded.
    pub title: String,
    /// Address the entry displays.
    pub address: String,
}

/// Delivered when a traversal changes the current entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEvent {
    /// State of the entry traversed to.
    pub state: Option<NavigationState>,
    /// Address of the entry traversed to.
    pub address: String,
}

/// Session history: entries oldest-first plus the cursor of the current
/// entry. The cursor is always valid and the entry list never empty.
#[derive(Debug, Clone)]
pub struct HistoryBridge {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl HistoryBridge {
    /// Creates a history whose only entry is the initial pageload.
    #[must_use]
    pub fn new(initial_address: impl Into<String>, initial_title: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                state: None,
                title: initial_title.into(),
                address: initial_address.into(),
            }],
            cursor: 0,
        }
    }

    /// Records a completed navigation as the new current entry, discarding
    /// any forward entries.
    pub fn push(
        &mut self,
        state: NavigationState,
        title: impl Into<String>,
        address: impl Into<String>,
    ) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            state: Some(state),
            title: title.into(),
            address: address.into(),
        });
        self.cursor = self.entries.len() - 1;
        debug!(
            depth = self.entries.len(),
            cursor = self.cursor,
            "history entry pushed"
        );
    }

    /// Moves the cursor one entry back. Returns `None` at the oldest entry.
    pub fn back(&mut self) -> Option<TraversalEvent> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "history traversed back");
        Some(self.traversal_event())
    }

    /// Moves the cursor one entry forward. Returns `None` at the newest
    /// entry.
    pub fn forward(&mut self) -> Option<TraversalEvent> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "history traversed forward");
        Some(self.traversal_event())
    }

    fn traversal_event(&self) -> TraversalEvent {
        let entry = &self.entries[self.cursor];
        TraversalEvent {
            state: entry.state.clone(),
            address: entry.address.clone(),
        }
    }

    /// Entry the cursor sits on.
    #[must_use]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Cursor position, zero-based from the oldest entry.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every recorded entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
