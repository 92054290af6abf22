//! Functional tests for the navigation cycle as a whole: submit,
//! pagination, history traversal, and every terminal failure rendering.
//!
//! Each test drives a full [`SearchSession`] over fake backends, so the
//! gate, the synchronizer, and the history bridge are exercised together
//! exactly as an attached page would exercise them.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use pvs_core::sync::EMPTY_QUERY_MESSAGE;
use pvs_core::{
    ContainerClick, DispatchOutcome, InitialView, NavigateOutcome, NavigationState, SearchSession,
    SessionBackends, UiEvent,
};
use pvs_net::{ApiError, EndpointConfig, SearchTransport};
use pvs_test_utils::{
    content_only_page, default_search_address, paper, regionless_page, results_page, FakeMailer,
    FakeSummaryBackend, FakeTransport,
};
use pvs_view::ControlId;
use std::sync::Arc;
use url::Url;

/// Transport that parks once before answering, so a second trigger can
/// arrive while the first flight is still suspended.
struct YieldingTransport(FakeTransport);

#[async_trait]
impl SearchTransport for YieldingTransport {
    async fn fetch_document(&self, address: &Url) -> Result<String, ApiError> {
        tokio::task::yield_now().await;
        self.0.fetch_document(address).await
    }
}

fn session_over(transport: Arc<FakeTransport>) -> SearchSession {
    let backends = SessionBackends {
        transport,
        summaries: Arc::new(FakeSummaryBackend::new()),
        mailer: Arc::new(FakeMailer::new()),
    };
    SearchSession::new(EndpointConfig::default(), backends, InitialView::new())
}

fn submit(query: &str) -> UiEvent {
    UiEvent::SearchSubmitted {
        query: query.to_string(),
    }
}

/// Tenet: a failed fetch renders one inline alert in the results region,
/// re-enables the submit control, and records nothing in history.
///
/// If this fails, a transient backend failure is either leaving the page
/// stuck in its loading presentation or polluting history with an entry
/// the user never reached.
#[tokio::test]
async fn failed_fetch_renders_inline_alert_and_keeps_history() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_failure(
        default_search_address("transformers", None),
        ApiError::Status {
            status: 500,
            detail: None,
        },
    );
    let session = session_over(transport);

    let outcome = session.dispatch(submit("transformers")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Failed)
    );
    let view = session.view().lock();
    assert!(view.results_markup().contains("alert alert-danger"));
    assert!(view.results_markup().contains("Search failed:"));
    assert!(!view.is_disabled(&ControlId::SearchSubmit));
    drop(view);
    assert_eq!(session.stats().history_depth, 1);
}

/// Tenet: a pagination click fetches the address merging the link's query
/// and page, splices the region, and pushes that exact state.
///
/// A failure here means pagination is drifting from what the link
/// advertised, so back/forward would later replay the wrong page.
#[tokio::test]
async fn pagination_click_fetches_merged_address() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_page(
        default_search_address("ml", None),
        results_page("ml", 1, 3, &[paper("101", "First Page Paper", "About ml.")]),
    );
    transport.stage_page(
        default_search_address("ml", Some(2)),
        results_page("ml", 2, 3, &[paper("202", "Second Page Paper", "More ml.")]),
    );
    let session = session_over(transport.clone());

    session.dispatch(submit("ml")).await;
    let outcome = session
        .dispatch(UiEvent::ResultsClick(ContainerClick::page_link(
            "/search?query=ml&page=2",
        )))
        .await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Updated { .. })
    ));
    assert_eq!(
        transport.fetched_addresses()[1],
        default_search_address("ml", Some(2))
    );
    assert!(session
        .view()
        .lock()
        .results_markup()
        .contains("Second Page Paper"));
    let history = session.history().lock();
    assert_eq!(history.current().state, Some(NavigationState::new("ml", 2)));
    assert_eq!(history.depth(), 3);
}

/// Tenet: an empty query never reaches the network or the gate.
#[tokio::test]
async fn empty_query_is_rejected_before_any_activity() {
    let transport = Arc::new(FakeTransport::new());
    let session = session_over(transport.clone());

    let outcome = session.dispatch(submit("   ")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Rejected)
    );
    assert_eq!(
        session.view().lock().message(),
        Some(EMPTY_QUERY_MESSAGE)
    );
    assert_eq!(transport.call_count(), 0);
    assert_eq!(session.gate().stats().acquired_total, 0);
}

/// Tenet: navigating to the same query and page twice leaves the results
/// region byte-identical to the first visit.
///
/// The splice must be a pure function of the fetched document; any state
/// leaking between navigations shows up as a diff here.
#[tokio::test]
async fn repeat_navigation_renders_identical_markup() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_page(
        default_search_address("rust", None),
        results_page("rust", 1, 1, &[paper("7", "Borrow Checking", "Ownership.")]),
    );
    let session = session_over(transport);

    session.dispatch(submit("rust")).await;
    let first = session.view().lock().results_markup().to_string();
    let outcome = session.dispatch(submit("rust")).await;
    let second = session.view().lock().results_markup().to_string();

    assert!(matches!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Updated { .. })
    ));
    assert_eq!(first, second);
}

/// Tenet: a document with no recognizable region degrades to a terminal
/// parse message without adopting a title or touching history.
#[tokio::test]
async fn regionless_document_degrades_without_title_or_push() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_page(
        default_search_address("void", None),
        regionless_page("Totally Elsewhere"),
    );
    let session = session_over(transport);

    let outcome = session.dispatch(submit("void")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Degraded)
    );
    let view = session.view().lock();
    assert!(view
        .results_markup()
        .contains("Could not parse search results"));
    assert_eq!(view.title(), "");
    drop(view);
    assert_eq!(session.stats().history_depth, 1);
}

/// Tenet: when the results block is absent but the broader content area is
/// present, the content area is spliced and the results slot is emptied.
#[tokio::test]
async fn content_fallback_splices_broader_area() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_page(
        default_search_address("maint", None),
        content_only_page("Maintenance", "<p>Back soon.</p>"),
    );
    let session = session_over(transport);

    let outcome = session.dispatch(submit("maint")).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Updated { .. })
    ));
    let view = session.view().lock();
    assert_eq!(view.results_markup(), "");
    assert_eq!(view.title(), "Maintenance");
}

/// Tenet: a submit arriving while another search is in flight is dropped,
/// not queued and not raced.
///
/// If this fails, two responses can land out of order and the view ends up
/// showing whichever finished last rather than what the user asked for.
#[tokio::test]
async fn second_submit_while_first_in_flight_is_dropped() {
    let slow = Arc::new(YieldingTransport(FakeTransport::new()));
    slow.0.stage_page(
        default_search_address("gpt", None),
        results_page("gpt", 1, 1, &[paper("1", "Attention", "Heads.")]),
    );
    let backends = SessionBackends {
        transport: slow.clone(),
        summaries: Arc::new(FakeSummaryBackend::new()),
        mailer: Arc::new(FakeMailer::new()),
    };
    let session = SearchSession::new(EndpointConfig::default(), backends, InitialView::new());

    let (first, second) = tokio::join!(
        session.dispatch(submit("gpt")),
        session.dispatch(submit("gpt"))
    );

    assert!(matches!(
        first,
        DispatchOutcome::Navigation(NavigateOutcome::Updated { .. })
    ));
    assert_eq!(
        second,
        DispatchOutcome::Navigation(NavigateOutcome::Ignored)
    );
    assert_eq!(slow.0.call_count(), 1);
    assert_eq!(session.gate().stats().rejected_total, 1);
    assert_eq!(session.gate().stats().in_flight, 0);
}

/// Tenet: going back replays the older entry with a fresh fetch and
/// re-records it, so the cursor always sits on the state the view shows.
#[tokio::test]
async fn back_replays_older_entry_and_repushes() {
    let transport = Arc::new(FakeTransport::new());
    transport.stage_page(
        default_search_address("cnn", None),
        results_page("cnn", 1, 1, &[paper("1", "Convolutions", "Kernels.")]),
    );
    transport.stage_page(
        default_search_address("rnn", None),
        results_page("rnn", 1, 1, &[paper("2", "Recurrence", "Loops.")]),
    );
    let session = session_over(transport.clone());

    session.dispatch(submit("cnn")).await;
    session.dispatch(submit("rnn")).await;
    assert_eq!(session.stats().history_depth, 3);

    let outcome = session.dispatch(UiEvent::HistoryBack).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Updated { .. })
    ));
    assert_eq!(transport.call_count(), 3);
    assert!(session.view().lock().results_markup().contains("Convolutions"));
    let stats = session.stats();
    assert_eq!(stats.history_depth, 3);
    assert_eq!(stats.history_cursor, 2);

    // The replay re-push truncated the forward entry, so there is nothing
    // to go forward to.
    let forward = session.dispatch(UiEvent::HistoryForward).await;
    assert_eq!(
        forward,
        DispatchOutcome::Navigation(NavigateOutcome::Skipped)
    );
}

/// Tenet: going back past the initial pageload entry is a no-op.
#[tokio::test]
async fn back_at_the_initial_entry_is_skipped() {
    let session = session_over(Arc::new(FakeTransport::new()));

    let outcome = session.dispatch(UiEvent::HistoryBack).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Navigation(NavigateOutcome::Skipped)
    );
    assert_eq!(session.stats().history_cursor, 0);
}
