//! View synchronization
//!
//! `ViewSynchronizer` runs the in-place navigation cycle: validate the
//! query, enter loading presentation, fetch the server-rendered document,
//! splice the matching region into the live view, adopt the fetched title.
//! Every failure is rendered terminally into the view; callers receive an
//! outcome value, never an error.

use crate::history::NavigationState;
use crate::SharedView;
use pvs_net::{ApiError, EndpointConfig, SearchTransport};
use pvs_view::{markup, ControlId, FetchedDocument, RegionId, CONTENT_REGION, RESULTS_REGION};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message shown when a submit carries no usable query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search query.";

/// Terminal result of one navigation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// The view was updated from the fetched document.
    Updated {
        /// State describing the completed navigation.
        state: NavigationState,
        /// Document title after adoption.
        title: String,
        /// Address the document was fetched from.
        address: String,
    },
    /// The query was empty; rejected before any network activity.
    Rejected,
    /// The fetched document carried no recognizable region; a terminal
    /// message was rendered in place of results.
    Degraded,
    /// The fetch failed; the failure was rendered inline.
    Failed,
    /// The search key was already in flight; the trigger was dropped.
    Ignored,
    /// A traversal carried nothing replayable; the view was left as-is.
    Skipped,
}

impl NavigateOutcome {
    /// Whether this outcome updated the view from a fetched document.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Applies fetched documents to the live view.
pub struct ViewSynchronizer {
    view: SharedView,
    transport: Arc<dyn SearchTransport>,
    config: EndpointConfig,
}

impl ViewSynchronizer {
    /// Creates a synchronizer over the shared view.
    #[must_use]
    pub fn new(
        view: SharedView,
        transport: Arc<dyn SearchTransport>,
        config: EndpointConfig,
    ) -> Self {
        Self {
            view,
            transport,
            config,
        }
    }

    /// Runs one navigation cycle:
    ///
    /// 1. Reject an empty query with an inline message
    /// 2. Enter loading presentation and disable the submit control
    /// 3. Fetch the document for the merged address
    /// 4. Splice the results region, falling back to the broader content
    ///    area, falling back to a terminal parse message
    /// 5. Adopt the fetched title
    /// 6. Clear loading and re-enable the submit control
    ///
    /// The loading presentation never survives this call, whichever way it
    /// ends.
    pub async fn navigate(&self, query: &str, page: Option<u32>) -> NavigateOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("navigation rejected: empty query");
            self.view.lock().show_message(EMPTY_QUERY_MESSAGE);
            return NavigateOutcome::Rejected;
        }

        {
            let mut view = self.view.lock();
            view.clear_message();
            view.disable(ControlId::SearchSubmit);
            let _ =
                view.enter_region_loading(&RegionId::results(), markup::loading_results_block());
        }

        let outcome = match self.fetch_and_splice(query, page).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, query, "navigation failed");
                let description = error.surface_message();
                let mut view = self.view.lock();
                if view
                    .replace_region(
                        &RegionId::results(),
                        markup::search_failure_block(&description),
                    )
                    .is_err()
                {
                    view.show_message(format!(
                        "Search failed: {description}. Please try again."
                    ));
                }
                NavigateOutcome::Failed
            }
        };

        let mut view = self.view.lock();
        view.clear_region_loading(&RegionId::results());
        view.enable(&ControlId::SearchSubmit);
        outcome
    }

    /// Fetches one document and splices it into the view. Failures are
    /// returned to [`Self::navigate`] for terminal rendering.
    async fn fetch_and_splice(
        &self,
        query: &str,
        page: Option<u32>,
    ) -> Result<NavigateOutcome, ApiError> {
        let address = self.config.search_address(query, page)?;
        debug!(%address, "fetching results document");
        let body = self.transport.fetch_document(&address).await?;
        let document = FetchedDocument::parse(&body);

        let mut view = self.view.lock();
        if let Some(inner) = document.region_inner(RESULTS_REGION) {
            let _ = view.replace_region(&RegionId::results(), inner);
        } else if let Some(inner) = document.region_inner(CONTENT_REGION) {
            // The content area subsumes the results block, so the results
            // slot is emptied rather than left holding the loading markup.
            let _ = view.replace_region(&RegionId::content(), inner);
            let _ = view.replace_region(&RegionId::results(), "");
            info!(query, "results block absent; spliced broader content area");
        } else {
            let _ = view.replace_region(&RegionId::results(), markup::parse_failure_block());
            info!(query, "fetched document had no recognizable region");
            return Ok(NavigateOutcome::Degraded);
        }

        if let Some(title) = document.title() {
            view.set_title(title);
        }

        let state = NavigationState::new(query, page.unwrap_or(1));
        debug!(query = %state.query, page = state.page, "view synchronized");
        Ok(NavigateOutcome::Updated {
            state,
            title: view.title().to_string(),
            address: address.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_view;
    use pretty_assertions::assert_eq;
    use pvs_test_utils::{
        default_search_address, paper, regionless_page, results_page, FakeTransport,
    };
    use pvs_view::PageView;

    fn synchronizer(transport: Arc<FakeTransport>) -> ViewSynchronizer {
        ViewSynchronizer::new(
            shared_view(PageView::new()),
            transport,
            EndpointConfig::default(),
        )
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_fetching() {
        let transport = Arc::new(FakeTransport::new());
        let sync = synchronizer(transport.clone());

        let outcome = sync.navigate("   ", None).await;

        assert_eq!(outcome, NavigateOutcome::Rejected);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn degraded_document_renders_terminal_message() {
        let transport = Arc::new(FakeTransport::new());
        transport.stage_page(
            default_search_address("ml", None),
            regionless_page("arXiv Search"),
        );
        let sync = synchronizer(transport);

        let outcome = sync.navigate("ml", None).await;

        assert_eq!(outcome, NavigateOutcome::Degraded);
    }

    #[tokio::test]
    async fn successful_navigation_reports_resolved_state() {
        let transport = Arc::new(FakeTransport::new());
        transport.stage_page(
            default_search_address("ml", Some(2)),
            results_page("ml", 2, 3, &[paper("2401.001", "First", "Abstract.")]),
        );
        let sync = synchronizer(transport);

        let outcome = sync.navigate("ml", Some(2)).await;

        match outcome {
            NavigateOutcome::Updated {
                state,
                title,
                address,
            } => {
                assert_eq!(state, NavigationState::new("ml", 2));
                assert_eq!(title, r#"Search Results for "ml""#);
                assert_eq!(address, "http://localhost:5000/search?query=ml&page=2");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }
}
