//! Interaction events and the action dispatch table
//!
//! Embedders deliver user interactions as [`UiEvent`] values. Clicks inside
//! the results container arrive as one event kind carrying a CSS-class
//! marker; [`ActionTag::classify`] is the single table resolving markers to
//! actions, so adding an interactive element means adding one marker and
//! one table row.

use pvs_view::SummaryLinkData;

/// Marker class carried by pagination links.
pub const PAGE_LINK_MARKER: &str = "page-link";
/// Marker class carried by rendered single-paper summary links.
pub const SUMMARY_LINK_MARKER: &str = "single-paper-summary-link";
/// Marker class carried by abstract expansion links.
pub const READ_MORE_MARKER: &str = "read-more-link";
/// Marker class carried by abstract collapse links.
pub const READ_LESS_MARKER: &str = "read-less-link";

/// A delegated click inside the shared results container.
#[derive(Debug, Clone, Default)]
pub struct ContainerClick {
    /// CSS-class marker of the interacted element.
    pub marker: String,
    /// `href` of the interacted element, when it is a link.
    pub href: Option<String>,
    /// Identifier of the enclosing result item, when there is one.
    pub item_id: Option<String>,
    /// `data-paper-*` metadata of the interacted element.
    pub dataset: SummaryLinkData,
}

impl ContainerClick {
    /// A click on a pagination link.
    #[must_use]
    pub fn page_link(href: impl Into<String>) -> Self {
        Self {
            marker: PAGE_LINK_MARKER.to_string(),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// A click on a rendered single-paper summary link.
    #[must_use]
    pub fn summary_link(dataset: SummaryLinkData) -> Self {
        Self {
            marker: SUMMARY_LINK_MARKER.to_string(),
            dataset,
            ..Self::default()
        }
    }

    /// A click on a result item's expansion link.
    #[must_use]
    pub fn read_more(item_id: impl Into<String>) -> Self {
        Self {
            marker: READ_MORE_MARKER.to_string(),
            item_id: Some(item_id.into()),
            ..Self::default()
        }
    }

    /// A click on a result item's collapse link.
    #[must_use]
    pub fn read_less(item_id: impl Into<String>) -> Self {
        Self {
            marker: READ_LESS_MARKER.to_string(),
            item_id: Some(item_id.into()),
            ..Self::default()
        }
    }
}

/// Action resolved from a delegated click's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTag {
    /// Navigate to another results page.
    Paginate,
    /// Open the single-paper detail flow.
    SingleSummary,
    /// Expand a truncated abstract.
    ReadMore,
    /// Collapse an expanded abstract.
    ReadLess,
}

impl ActionTag {
    /// Resolves a marker class to its action. Unknown markers resolve to
    /// `None` and the click falls through untouched.
    #[must_use]
    pub fn classify(marker: &str) -> Option<Self> {
        match marker {
            PAGE_LINK_MARKER => Some(Self::Paginate),
            SUMMARY_LINK_MARKER => Some(Self::SingleSummary),
            READ_MORE_MARKER => Some(Self::ReadMore),
            READ_LESS_MARKER => Some(Self::ReadLess),
            _ => None,
        }
    }
}

/// One user interaction delivered to the session.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Search form submission.
    SearchSubmitted {
        /// Text in the query field at submit time.
        query: String,
    },
    /// Delegated click inside the results container.
    ResultsClick(ContainerClick),
    /// Click on the top-results summarize control.
    SummarizeTopClicked,
    /// Click on the panel close affordance.
    PanelCloseClicked,
    /// Click on either modal close affordance.
    ModalCloseClicked,
    /// Escape key press.
    EscapePressed,
    /// Browser back traversal.
    HistoryBack,
    /// Browser forward traversal.
    HistoryForward,
    /// Subscription form submission.
    SubscribeClicked {
        /// Text in the email field at submit time.
        email: String,
    },
    /// Click on the administrative test-send control.
    TestSendClicked {
        /// Recipient for the test email.
        email: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_classify_to_their_actions() {
        assert_eq!(ActionTag::classify("page-link"), Some(ActionTag::Paginate));
        assert_eq!(
            ActionTag::classify("single-paper-summary-link"),
            Some(ActionTag::SingleSummary)
        );
        assert_eq!(ActionTag::classify("read-more-link"), Some(ActionTag::ReadMore));
        assert_eq!(ActionTag::classify("read-less-link"), Some(ActionTag::ReadLess));
        assert_eq!(ActionTag::classify("unrelated-link"), None);
    }

    #[test]
    fn click_constructors_set_their_markers() {
        let click = ContainerClick::page_link("/search?query=ml&page=2");
        assert_eq!(click.marker, PAGE_LINK_MARKER);
        assert_eq!(click.href.as_deref(), Some("/search?query=ml&page=2"));

        let click = ContainerClick::read_more("2401.001");
        assert_eq!(click.marker, READ_MORE_MARKER);
        assert_eq!(click.item_id.as_deref(), Some("2401.001"));
    }
}
