//! Named view regions
//!
//! A region is a named, addressable subtree of the rendered page that is
//! swapped wholesale during synchronized navigation. The page carries two
//! region slots: the results block (authoritative splice target) and the
//! broader content area used as a fallback when a fetched document does not
//! contain the results block.

use std::fmt;

/// Identifier of the results block, the authoritative splice target.
pub const RESULTS_REGION: &str = "search-results-block";

/// Identifier of the broader content area, the fallback splice target.
pub const CONTENT_REGION: &str = "search-content-area";

/// Identifier of the dedicated slot for validation and navigation errors.
pub const MESSAGE_SLOT: &str = "js-search-error-message";

/// Identifier of the batch summary panel body.
pub const PANEL_BODY: &str = "ai-summary-content";

/// Identifier of the single-paper detail modal.
pub const DETAIL_MODAL: &str = "single-paper-summary-modal";

/// Name of a view region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    /// Creates a region id from any string-like value.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The results block region.
    #[inline]
    #[must_use]
    pub fn results() -> Self {
        Self::new(RESULTS_REGION)
    }

    /// The content-area fallback region.
    #[inline]
    #[must_use]
    pub fn content() -> Self {
        Self::new(CONTENT_REGION)
    }

    /// Borrows the raw identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Live state of one region: its inner markup plus loading presentation.
///
/// Entering the loading state replaces the markup with a placeholder, the
/// same way the rendered page swaps in a loading indicator; the flag is
/// cleared separately so an outcome rendered during the operation survives
/// the final cleanup step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSlot {
    markup: String,
    loading: bool,
}

impl RegionSlot {
    /// Creates a slot with initial inner markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            loading: false,
        }
    }

    /// Current inner markup.
    #[inline]
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Whether the loading presentation is active.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the inner markup.
    pub fn replace(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    /// Activates loading presentation with a placeholder.
    pub fn enter_loading(&mut self, placeholder: impl Into<String>) {
        self.markup = placeholder.into();
        self.loading = true;
    }

    /// Deactivates loading presentation, keeping whatever markup is present.
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_id_display_matches_raw() {
        let id = RegionId::results();
        assert_eq!(id.as_str(), RESULTS_REGION);
        assert_eq!(id.to_string(), RESULTS_REGION);
    }

    #[test]
    fn slot_loading_replaces_markup_and_survives_clear() {
        let mut slot = RegionSlot::new("<p>old</p>");
        slot.enter_loading("<p>loading</p>");
        assert!(slot.is_loading());
        assert_eq!(slot.markup(), "<p>loading</p>");

        slot.replace("<p>new</p>");
        slot.clear_loading();
        assert!(!slot.is_loading());
        assert_eq!(slot.markup(), "<p>new</p>");
    }
}
