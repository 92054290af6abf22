//! Summary orchestration
//!
//! Drives the two AI summarization flows against the shared view: the
//! batch flow over the visible top results, rendered into the summary
//! panel, and the single-paper detail flow rendered into the modal. Both
//! are gated, snapshot their inputs before suspending, and render every
//! failure terminally. The batch request body is built from a snapshot
//! taken at trigger time, so a navigation completing mid-flight cannot
//! change what was summarized.

use crate::cache::SummaryCache;
use crate::gate::{OpKey, RequestGate};
use crate::SharedView;
use pvs_net::{
    ApiError, EndpointConfig, PaperEntry, SingleSummarizeRequest, SummaryBackend,
    SummaryEndpointShape,
};
use pvs_view::{collect_snapshots, markup, ControlId, PaperSnapshot, SummaryLinkData};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Panel message when no visible item carries a real abstract.
pub const NO_ABSTRACTS_MESSAGE: &str =
    "No abstracts available in the top results to summarize.";

/// Panel message when the backend returns an empty takeaway list.
pub const NO_TAKEAWAYS_MESSAGE: &str = "No takeaways could be generated for the top papers.";

/// Modal message when a summary link is missing required metadata.
pub const MISSING_DATA_MESSAGE: &str = "Could not load summary: Missing paper data.";

/// Terminal result of the batch summarization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Takeaways were rendered into the panel. Zero blocks means the
    /// backend returned an empty list and the panel says so.
    Rendered {
        /// Number of per-paper takeaway blocks rendered.
        blocks: usize,
    },
    /// No visible item carried a real abstract; nothing was requested.
    NothingToSummarize,
    /// The request failed; the failure was rendered into the panel.
    Failed,
    /// A batch was already in flight; the trigger was dropped.
    Ignored,
}

/// Terminal result of the single-paper detail flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOutcome {
    /// A fresh summary was fetched, cached, and rendered into the modal.
    Rendered,
    /// The summary was served from the session cache without a request.
    CacheHit,
    /// The link was missing required metadata; an error modal was shown.
    MissingData,
    /// The configured endpoint shape has no single-paper flow.
    Unavailable,
    /// The request failed; the failure was rendered into the modal.
    Failed,
    /// A request for this paper was already in flight; the trigger was
    /// dropped.
    Ignored,
}

/// Result of an Escape key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// The detail modal was closed; the panel, if open, stays open.
    ModalClosed,
    /// The summary panel was closed.
    PanelClosed,
    /// Neither surface was open.
    NoOp,
}

/// Drives batch and single-paper summarization against the shared view.
pub struct SummaryOrchestrator {
    view: SharedView,
    backend: Arc<dyn SummaryBackend>,
    gate: RequestGate,
    cache: SummaryCache,
    config: EndpointConfig,
}

impl SummaryOrchestrator {
    /// Creates an orchestrator over the shared view, gate, and cache.
    #[must_use]
    pub fn new(
        view: SharedView,
        backend: Arc<dyn SummaryBackend>,
        gate: RequestGate,
        cache: SummaryCache,
        config: EndpointConfig,
    ) -> Self {
        Self {
            view,
            backend,
            gate,
            cache,
            config,
        }
    }

    /// Runs the batch flow over the currently visible results:
    ///
    /// 1. Acquire the batch gate key, dropping duplicate triggers
    /// 2. Disable the summarize control and open the panel in its working
    ///    state
    /// 3. Snapshot the visible items and drop those without a real
    ///    abstract
    /// 4. Submit the snapshot and render one takeaway block per returned
    ///    entry, or the terminal failure text
    /// 5. Re-enable the control and release the key
    pub async fn summarize_top(&self) -> BatchOutcome {
        let Some(_permit) = self.gate.try_acquire(OpKey::BatchSummary) else {
            debug!("batch summary already in flight; trigger dropped");
            return BatchOutcome::Ignored;
        };

        let snapshots = {
            let mut view = self.view.lock();
            view.disable(ControlId::SummarizeTop);
            view.open_panel();
            view.set_panel_body(markup::panel_working_block());
            collect_snapshots(view.results_markup(), self.config.snapshot_limit())
        };
        let papers: Vec<PaperSnapshot> = snapshots
            .into_iter()
            .filter(PaperSnapshot::has_real_abstract)
            .collect();

        let outcome = if papers.is_empty() {
            info!("no real abstracts among the visible results");
            self.view
                .lock()
                .set_panel_body(markup::summary_error_block(NO_ABSTRACTS_MESSAGE));
            BatchOutcome::NothingToSummarize
        } else {
            match self.run_batch(&papers).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(%error, "batch summarization failed");
                    self.view
                        .lock()
                        .set_panel_body(markup::summary_error_block(&batch_failure_text(
                            &error,
                        )));
                    BatchOutcome::Failed
                }
            }
        };

        self.view.lock().enable(&ControlId::SummarizeTop);
        outcome
    }

    /// Submits the snapshot in the configured endpoint shape and renders
    /// the panel body. Failures are returned for terminal rendering.
    async fn run_batch(&self, papers: &[PaperSnapshot]) -> Result<BatchOutcome, ApiError> {
        match self.config.shape() {
            SummaryEndpointShape::PerPaper => {
                let entries: Vec<PaperEntry> = papers
                    .iter()
                    .map(|paper| PaperEntry {
                        id: paper.id.clone(),
                        title: paper.title.clone(),
                        abstract_text: paper.abstract_text.clone(),
                        pdf_link: paper.pdf_link.clone(),
                    })
                    .collect();
                let takeaways = self.backend.summarize_batch(&entries).await?;

                let mut view = self.view.lock();
                if takeaways.is_empty() {
                    view.set_panel_body(markup::paragraph_block(NO_TAKEAWAYS_MESSAGE));
                    view.open_panel();
                    return Ok(BatchOutcome::Rendered { blocks: 0 });
                }
                let mut body = String::new();
                for entry in &takeaways {
                    // Blocks carry the snapshot abstract so the detail flow
                    // can run without re-deriving it from the results.
                    let abstract_text = papers
                        .iter()
                        .find(|paper| paper.id == entry.id)
                        .map(|paper| paper.abstract_text.as_str())
                        .unwrap_or_default();
                    body.push_str(&markup::takeaway_block(
                        &entry.id,
                        &entry.title,
                        abstract_text,
                        &markup::format_takeaways(&entry.takeaways_text),
                    ));
                }
                let blocks = takeaways.len();
                view.set_panel_body(body);
                view.open_panel();
                info!(blocks, "batch summaries rendered");
                Ok(BatchOutcome::Rendered { blocks })
            }
            SummaryEndpointShape::Combined => {
                let abstracts: Vec<String> =
                    papers.iter().map(|paper| paper.abstract_text.clone()).collect();
                let summary = self.backend.summarize_combined(&abstracts).await?;

                let mut view = self.view.lock();
                view.set_panel_body(markup::format_takeaways(&summary));
                view.open_panel();
                info!("combined summary rendered");
                Ok(BatchOutcome::Rendered { blocks: 1 })
            }
        }
    }

    /// Runs the single-paper detail flow for a clicked summary link:
    ///
    /// 1. Reject links missing any metadata field with an error modal
    /// 2. Serve a cached summary synchronously when one exists
    /// 3. Acquire the per-paper gate key, dropping duplicate triggers
    /// 4. Open the modal in its working state, submit the request, cache
    ///    the formatted summary, and render it with the source link header
    /// 5. Re-enable the link and release the key
    pub async fn summarize_single(&self, link: &SummaryLinkData) -> SingleOutcome {
        if self.config.shape() == SummaryEndpointShape::Combined {
            debug!("single-paper flow unavailable under the combined shape");
            return SingleOutcome::Unavailable;
        }

        let id = usable(&link.id);
        let title = usable(&link.title);
        let abstract_text = usable(&link.abstract_text);
        let pdf_link = usable(&link.pdf_link);
        let (Some(id), Some(title), Some(abstract_text), Some(pdf_link)) =
            (id, title, abstract_text, pdf_link)
        else {
            warn!("summary link missing required metadata");
            let heading = title.unwrap_or("Error");
            let opener = id.map(|id| ControlId::PaperSummaryLink(id.to_string()));
            self.view.lock().open_modal(
                heading,
                markup::summary_error_block(MISSING_DATA_MESSAGE),
                opener,
            );
            return SingleOutcome::MissingData;
        };

        if let Some(cached) = self.cache.get(id) {
            self.view.lock().open_modal(
                title,
                markup::modal_body_with_link(pdf_link, &cached),
                Some(ControlId::PaperSummaryLink(id.to_string())),
            );
            return SingleOutcome::CacheHit;
        }

        let Some(_permit) = self.gate.try_acquire(OpKey::SingleSummary(id.to_string())) else {
            debug!(paper_id = id, "single summary already in flight; trigger dropped");
            return SingleOutcome::Ignored;
        };

        {
            let mut view = self.view.lock();
            view.disable(ControlId::PaperSummaryLink(id.to_string()));
            view.open_modal(
                title,
                markup::modal_working_block(),
                Some(ControlId::PaperSummaryLink(id.to_string())),
            );
        }

        let request = SingleSummarizeRequest {
            paper_id: id.to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
        };
        let outcome = match self.backend.summarize_single(&request).await {
            Ok(summary) => {
                let formatted = markup::newlines_to_breaks(&summary);
                // Cached before rendering; the stored body excludes the
                // link header, which is re-composed at every open.
                self.cache.insert(id, formatted.clone());
                self.view.lock().open_modal(
                    title,
                    markup::modal_body_with_link(pdf_link, &formatted),
                    None,
                );
                info!(paper_id = id, "detail summary rendered");
                SingleOutcome::Rendered
            }
            Err(error) => {
                warn!(%error, paper_id = id, "single summarization failed");
                let body = markup::summary_error_block(&single_failure_text(&error));
                self.view.lock().open_modal(
                    title,
                    markup::modal_body_with_link(pdf_link, &body),
                    None,
                );
                SingleOutcome::Failed
            }
        };

        self.view
            .lock()
            .enable(&ControlId::PaperSummaryLink(id.to_string()));
        outcome
    }

    /// Handles an Escape press. The modal takes precedence: when both
    /// surfaces are open, the first Escape closes only the modal and a
    /// second one closes the panel.
    pub fn handle_escape(&self) -> EscapeOutcome {
        let mut view = self.view.lock();
        if view.modal().is_open() {
            view.close_modal();
            EscapeOutcome::ModalClosed
        } else if view.panel().is_open() {
            view.close_panel();
            EscapeOutcome::PanelClosed
        } else {
            EscapeOutcome::NoOp
        }
    }
}

/// A dataset field is usable when present and non-empty.
fn usable(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn batch_failure_text(error: &ApiError) -> String {
    match error {
        ApiError::Backend { message } => {
            format!("Error from summarization service: {message}")
        }
        ApiError::UnexpectedShape => {
            "Received an unexpected response from the summarization service.".to_string()
        }
        other => format!("Could not retrieve summary: {}", other.surface_message()),
    }
}

fn single_failure_text(error: &ApiError) -> String {
    match error {
        ApiError::Backend { message } => format!("Error: {message}"),
        ApiError::UnexpectedShape => {
            "Received an unexpected response for single paper summary.".to_string()
        }
        other => format!(
            "Could not retrieve detailed summary: {}",
            other.surface_message()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_view;
    use pretty_assertions::assert_eq;
    use pvs_test_utils::FakeSummaryBackend;
    use pvs_view::PageView;

    fn orchestrator(backend: Arc<FakeSummaryBackend>) -> SummaryOrchestrator {
        SummaryOrchestrator::new(
            shared_view(PageView::new()),
            backend,
            RequestGate::new(),
            SummaryCache::new(),
            EndpointConfig::default(),
        )
    }

    #[tokio::test]
    async fn link_with_empty_abstract_counts_as_missing_data() {
        let backend = Arc::new(FakeSummaryBackend::new());
        let orchestrator = orchestrator(backend.clone());
        let link = SummaryLinkData {
            id: Some("2401.001".into()),
            title: Some("First Paper".into()),
            abstract_text: Some(String::new()),
            pdf_link: Some("/pdf/2401.001".into()),
        };

        let outcome = orchestrator.summarize_single(&link).await;

        assert_eq!(outcome, SingleOutcome::MissingData);
        assert_eq!(backend.single_calls(), 0);
        let view = orchestrator.view.lock();
        assert!(view.modal().is_open());
        assert_eq!(view.modal().title(), "First Paper");
        assert_eq!(
            view.modal().body(),
            markup::summary_error_block(MISSING_DATA_MESSAGE)
        );
    }

    #[tokio::test]
    async fn combined_shape_has_no_single_flow() {
        let backend = Arc::new(FakeSummaryBackend::new());
        let orchestrator = SummaryOrchestrator::new(
            shared_view(PageView::new()),
            backend.clone(),
            RequestGate::new(),
            SummaryCache::new(),
            EndpointConfig::default().with_shape(SummaryEndpointShape::Combined),
        );

        let outcome = orchestrator
            .summarize_single(&SummaryLinkData::default())
            .await;

        assert_eq!(outcome, SingleOutcome::Unavailable);
        assert_eq!(backend.single_calls(), 0);
    }

    #[test]
    fn escape_closes_modal_before_panel() {
        let backend = Arc::new(FakeSummaryBackend::new());
        let orchestrator = orchestrator(backend);
        {
            let mut view = orchestrator.view.lock();
            view.open_panel();
            view.open_modal("Title", "<p>body</p>", None);
        }

        assert_eq!(orchestrator.handle_escape(), EscapeOutcome::ModalClosed);
        assert!(orchestrator.view.lock().panel().is_open());
        assert_eq!(orchestrator.handle_escape(), EscapeOutcome::PanelClosed);
        assert_eq!(orchestrator.handle_escape(), EscapeOutcome::NoOp);
    }
}
