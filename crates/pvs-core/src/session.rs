//! Session assembly and event dispatch
//!
//! [`SearchSession`] owns the whole engine: the shared view, the request
//! gate, the summary cache, the history bridge, and the three flow
//! controllers wired over one backend set. Embedders hand it
//! [`UiEvent`]s and read the view back; [`dispatch`](SearchSession::dispatch)
//! is the single routing point, so event handling is a table rather than
//! a web of listeners.

use crate::cache::{CacheStats, SummaryCache};
use crate::controller::SearchController;
use crate::events::{ActionTag, ContainerClick, UiEvent};
use crate::feedback::{FeedbackFormController, MailOutcome};
use crate::gate::{GateStats, RequestGate};
use crate::history::HistoryBridge;
use crate::summary::{BatchOutcome, EscapeOutcome, SingleOutcome, SummaryOrchestrator};
use crate::sync::{NavigateOutcome, ViewSynchronizer};
use crate::{shared_view, SharedView};
use parking_lot::Mutex;
use pvs_net::{
    ApiError, EndpointConfig, HttpBackend, MailingBackend, SearchTransport, SummaryBackend,
};
use pvs_view::PageView;
use std::sync::Arc;
use tracing::debug;

/// The three backend seams a session runs against.
pub struct SessionBackends {
    /// Results-document fetcher.
    pub transport: Arc<dyn SearchTransport>,
    /// Summarization service client.
    pub summaries: Arc<dyn SummaryBackend>,
    /// Mailing service client.
    pub mailer: Arc<dyn MailingBackend>,
}

impl SessionBackends {
    /// Wires all three seams to one HTTP client against the configured
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn over_http(config: &EndpointConfig) -> Result<Self, ApiError> {
        let backend = Arc::new(HttpBackend::new(config.clone())?);
        Ok(Self {
            transport: backend.clone(),
            summaries: backend.clone(),
            mailer: backend,
        })
    }
}

/// Server-rendered state the session starts from.
///
/// Mirrors a page that already carries results when the engine attaches:
/// the visible markup, the document title, and the address the initial
/// history entry records.
#[derive(Debug, Clone, Default)]
pub struct InitialView {
    results_markup: String,
    title: String,
    address: Option<String>,
}

impl InitialView {
    /// An empty initial page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the results markup already visible at attach time.
    #[must_use]
    pub fn with_results_markup(mut self, markup: impl Into<String>) -> Self {
        self.results_markup = markup.into();
        self
    }

    /// Sets the initial document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the address recorded by the initial history entry. Defaults
    /// to the configured origin.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Point-in-time counters across the session's shared resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Request gate counters.
    pub gate: GateStats,
    /// Summary cache counters.
    pub cache: CacheStats,
    /// History entries currently recorded.
    pub history_depth: usize,
    /// Position of the active history entry.
    pub history_cursor: usize,
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event drove a navigation.
    Navigation(NavigateOutcome),
    /// The event drove the batch summarization flow.
    Batch(BatchOutcome),
    /// The event drove the single-paper detail flow.
    Single(SingleOutcome),
    /// The event drove a subscription form action.
    Mail(MailOutcome),
    /// The event was an Escape press.
    Escape(EscapeOutcome),
    /// The summary panel was closed.
    PanelClosed,
    /// The detail modal was closed.
    ModalClosed,
    /// A result item's abstract was expanded or collapsed.
    ExpansionChanged {
        /// Identifier of the toggled item.
        paper_id: String,
        /// New expansion state.
        expanded: bool,
    },
    /// The event matched nothing the session handles.
    Unhandled,
}

/// One attached engine instance: view, history, gate, cache, and the
/// flow controllers over a backend set.
pub struct SearchSession {
    view: SharedView,
    config: EndpointConfig,
    gate: RequestGate,
    cache: SummaryCache,
    history: Arc<Mutex<HistoryBridge>>,
    search: SearchController,
    summaries: SummaryOrchestrator,
    feedback: FeedbackFormController,
}

impl SearchSession {
    /// Assembles a session over the given backends, seeded with the
    /// initial page. The initial history entry carries no replay state,
    /// like a document loaded before the engine attached.
    #[must_use]
    pub fn new(config: EndpointConfig, backends: SessionBackends, initial: InitialView) -> Self {
        let page = PageView::new()
            .with_results_markup(initial.results_markup)
            .with_title(initial.title);
        let address = initial
            .address
            .unwrap_or_else(|| config.origin().to_string());
        let history = Arc::new(Mutex::new(HistoryBridge::new(address, page.title())));
        let view = shared_view(page);
        let gate = RequestGate::new();
        let cache = SummaryCache::new();

        let search = SearchController::new(
            ViewSynchronizer::new(view.clone(), backends.transport, config.clone()),
            history.clone(),
            gate.clone(),
            config.origin().clone(),
        );
        let summaries = SummaryOrchestrator::new(
            view.clone(),
            backends.summaries,
            gate.clone(),
            cache.clone(),
            config.clone(),
        );
        let feedback = FeedbackFormController::new(view.clone(), backends.mailer);

        Self {
            view,
            config,
            gate,
            cache,
            history,
            search,
            summaries,
            feedback,
        }
    }

    /// Routes one interaction to its flow and runs it to a terminal
    /// state.
    pub async fn dispatch(&self, event: UiEvent) -> DispatchOutcome {
        match event {
            UiEvent::SearchSubmitted { query } => {
                DispatchOutcome::Navigation(self.search.submit(&query).await)
            }
            UiEvent::ResultsClick(click) => self.dispatch_click(click).await,
            UiEvent::SummarizeTopClicked => {
                DispatchOutcome::Batch(self.summaries.summarize_top().await)
            }
            UiEvent::PanelCloseClicked => {
                self.view.lock().close_panel();
                DispatchOutcome::PanelClosed
            }
            UiEvent::ModalCloseClicked => {
                self.view.lock().close_modal();
                DispatchOutcome::ModalClosed
            }
            UiEvent::EscapePressed => DispatchOutcome::Escape(self.summaries.handle_escape()),
            UiEvent::HistoryBack => DispatchOutcome::Navigation(self.search.go_back().await),
            UiEvent::HistoryForward => {
                DispatchOutcome::Navigation(self.search.go_forward().await)
            }
            UiEvent::SubscribeClicked { email } => {
                DispatchOutcome::Mail(self.feedback.subscribe(&email).await)
            }
            UiEvent::TestSendClicked { email } => {
                DispatchOutcome::Mail(self.feedback.send_test_email(&email).await)
            }
        }
    }

    /// Resolves a delegated container click through the action table.
    async fn dispatch_click(&self, click: ContainerClick) -> DispatchOutcome {
        match ActionTag::classify(&click.marker) {
            Some(ActionTag::Paginate) => match click.href {
                Some(href) => DispatchOutcome::Navigation(self.search.paginate(&href).await),
                None => {
                    debug!("pagination click without an address");
                    DispatchOutcome::Unhandled
                }
            },
            Some(ActionTag::SingleSummary) => {
                DispatchOutcome::Single(self.summaries.summarize_single(&click.dataset).await)
            }
            Some(ActionTag::ReadMore) => self.set_expansion(click.item_id, true),
            Some(ActionTag::ReadLess) => self.set_expansion(click.item_id, false),
            None => {
                debug!(marker = %click.marker, "click matched no delegated action");
                DispatchOutcome::Unhandled
            }
        }
    }

    fn set_expansion(&self, item_id: Option<String>, expanded: bool) -> DispatchOutcome {
        let Some(paper_id) = item_id else {
            debug!("expansion click without an item identifier");
            return DispatchOutcome::Unhandled;
        };
        self.view.lock().set_expanded(paper_id.clone(), expanded);
        DispatchOutcome::ExpansionChanged { paper_id, expanded }
    }

    /// The shared view this session renders into.
    #[must_use]
    pub fn view(&self) -> &SharedView {
        &self.view
    }

    /// The endpoint configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// The shared request gate.
    #[must_use]
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// The session-lifetime summary cache.
    #[must_use]
    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    /// The history bridge backing traversal.
    #[must_use]
    pub fn history(&self) -> &Arc<Mutex<HistoryBridge>> {
        &self.history
    }

    /// Counters across the gate, the cache, and history.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        let history = self.history.lock();
        SessionStats {
            gate: self.gate.stats(),
            cache: self.cache.stats(),
            history_depth: history.depth(),
            history_cursor: history.cursor(),
        }
    }
}
