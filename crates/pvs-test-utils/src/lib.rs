//! Shared test support for the PVS workspace: canned result-page documents
//! and fake backends with scripted responses and call counters.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pvs_net::{
    ApiError, EndpointConfig, MailingBackend, MailingOutcome, PaperEntry, SearchTransport,
    SingleSummarizeRequest, SummaryBackend, TakeawayEntry, TestEmailRequest,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

// ---------------------------------------------------------------------------
// Fixture documents
// ---------------------------------------------------------------------------

/// One result item in a fixture page.
#[derive(Debug, Clone, Default)]
pub struct FixturePaper {
    pub id: String,
    pub title: String,
    pub full_abstract: Option<String>,
    pub short_abstract: Option<String>,
}

impl FixturePaper {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_full(mut self, text: impl Into<String>) -> Self {
        self.full_abstract = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_short(mut self, text: impl Into<String>) -> Self {
        self.short_abstract = Some(text.into());
        self
    }
}

/// Convenience for an item carrying a full abstract.
pub fn paper(
    id: impl Into<String>,
    title: impl Into<String>,
    abstract_text: impl Into<String>,
) -> FixturePaper {
    FixturePaper::new(id, title).with_full(abstract_text)
}

/// Builds a complete server-rendered results document: title, content area,
/// results block with paper items, and pagination links for every page
/// other than the current one.
pub fn results_page(query: &str, page: u32, total_pages: u32, papers: &[FixturePaper]) -> String {
    let mut items = String::new();
    for paper in papers {
        items.push_str(&format!(
            r#"<div class="paper-item"><h3><a href="https://arxiv.org/abs/{id}">{title}</a></h3><div class="paper-summary-container">"#,
            id = paper.id,
            title = paper.title,
        ));
        if let Some(short) = &paper.short_abstract {
            items.push_str(&format!(
                r##"<div class="paper-summary-short"><span class="summary-content">{short} Read more</span> <a href="#" class="read-more-link">Read more</a></div>"##,
            ));
        }
        if let Some(full) = &paper.full_abstract {
            items.push_str(&format!(
                r##"<div class="paper-summary-full"><span class="summary-content">{full}</span> <a href="#" class="read-less-link">Read less</a></div>"##,
            ));
        }
        items.push_str("</div></div>");
    }

    let mut pagination = String::new();
    if total_pages > 1 {
        pagination.push_str(r#"<div class="pagination-nav">"#);
        for p in 1..=total_pages {
            if p == page {
                pagination.push_str(&format!(r#"<span class="current-page">{p}</span>"#));
            } else {
                pagination.push_str(&format!(
                    r#"<a class="page-link" href="/search?query={query}&amp;page={p}">{p}</a>"#,
                ));
            }
        }
        pagination.push_str("</div>");
    }

    format!(
        concat!(
            r#"<html><head><title>Search Results for "{query}"</title></head><body>"#,
            r#"<div id="search-content-area"><div id="search-results-block">"#,
            "{items}{pagination}",
            "</div></div></body></html>"
        ),
        query = query,
        items = items,
        pagination = pagination,
    )
}

/// A document that lacks the results block but still carries the broader
/// content area, for exercising the fallback splice.
pub fn content_only_page(title: &str, content: &str) -> String {
    format!(
        concat!(
            "<html><head><title>{title}</title></head><body>",
            r#"<div id="search-content-area">{content}</div></body></html>"#
        ),
        title = title,
        content = content,
    )
}

/// A document with neither recognizable region, for exercising the terminal
/// degraded outcome.
pub fn regionless_page(title: &str) -> String {
    format!("<html><head><title>{title}</title></head><body><p>nothing here</p></body></html>")
}

/// Address the default configuration produces for a search navigation.
pub fn default_search_address(query: &str, page: Option<u32>) -> String {
    EndpointConfig::default()
        .search_address(query, page)
        .expect("default search address")
        .to_string()
}

// ---------------------------------------------------------------------------
// Fake transport
// ---------------------------------------------------------------------------

/// In-memory [`SearchTransport`] serving staged documents keyed by address.
///
/// Unstaged addresses answer with a 404 status error. Every fetch is
/// counted and logged in order.
#[derive(Default)]
pub struct FakeTransport {
    pages: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, ApiError>>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a document body for an address.
    pub fn stage_page(&self, address: impl Into<String>, body: impl Into<String>) {
        self.pages.lock().insert(address.into(), body.into());
    }

    /// Stages a failure for an address.
    pub fn stage_failure(&self, address: impl Into<String>, error: ApiError) {
        self.failures.lock().insert(address.into(), error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Addresses fetched so far, in order.
    pub fn fetched_addresses(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl SearchTransport for FakeTransport {
    async fn fetch_document(&self, address: &Url) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(address.to_string());
        if let Some(error) = self.failures.lock().get(address.as_str()) {
            return Err(error.clone());
        }
        self.pages
            .lock()
            .get(address.as_str())
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                detail: None,
            })
    }
}

// ---------------------------------------------------------------------------
// Fake summarization backend
// ---------------------------------------------------------------------------

/// In-memory [`SummaryBackend`] with optional scripted responses.
///
/// Unscripted calls succeed with deterministic text derived from the
/// request. Every call is counted and the last request of each kind is
/// kept for assertions.
#[derive(Default)]
pub struct FakeSummaryBackend {
    batch_calls: AtomicUsize,
    single_calls: AtomicUsize,
    combined_calls: AtomicUsize,
    batch_response: Mutex<Option<Result<Vec<TakeawayEntry>, ApiError>>>,
    single_response: Mutex<Option<Result<String, ApiError>>>,
    combined_response: Mutex<Option<Result<String, ApiError>>>,
    last_batch: Mutex<Option<Vec<PaperEntry>>>,
    last_single: Mutex<Option<SingleSummarizeRequest>>,
    last_combined: Mutex<Option<Vec<String>>>,
}

impl FakeSummaryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_batch(&self, response: Result<Vec<TakeawayEntry>, ApiError>) {
        *self.batch_response.lock() = Some(response);
    }

    pub fn script_single(&self, response: Result<String, ApiError>) {
        *self.single_response.lock() = Some(response);
    }

    pub fn script_combined(&self, response: Result<String, ApiError>) {
        *self.combined_response.lock() = Some(response);
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn combined_calls(&self) -> usize {
        self.combined_calls.load(Ordering::SeqCst)
    }

    pub fn last_batch_request(&self) -> Option<Vec<PaperEntry>> {
        self.last_batch.lock().clone()
    }

    pub fn last_single_request(&self) -> Option<SingleSummarizeRequest> {
        self.last_single.lock().clone()
    }

    pub fn last_combined_request(&self) -> Option<Vec<String>> {
        self.last_combined.lock().clone()
    }
}

#[async_trait]
impl SummaryBackend for FakeSummaryBackend {
    async fn summarize_batch(
        &self,
        papers: &[PaperEntry],
    ) -> Result<Vec<TakeawayEntry>, ApiError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock() = Some(papers.to_vec());
        if let Some(scripted) = self.batch_response.lock().clone() {
            return scripted;
        }
        Ok(papers
            .iter()
            .map(|paper| TakeawayEntry {
                id: paper.id.clone(),
                title: paper.title.clone(),
                takeaways_text: format!(
                    "1. Key takeaway for {title}\n2. Second takeaway for {title}",
                    title = paper.title
                ),
            })
            .collect())
    }

    async fn summarize_single(
        &self,
        request: &SingleSummarizeRequest,
    ) -> Result<String, ApiError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_single.lock() = Some(request.clone());
        if let Some(scripted) = self.single_response.lock().clone() {
            return scripted;
        }
        Ok(format!("Detailed summary for {}.", request.title))
    }

    async fn summarize_combined(&self, abstracts: &[String]) -> Result<String, ApiError> {
        self.combined_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_combined.lock() = Some(abstracts.to_vec());
        if let Some(scripted) = self.combined_response.lock().clone() {
            return scripted;
        }
        Ok(format!("Combined summary of {} abstracts.", abstracts.len()))
    }
}

// ---------------------------------------------------------------------------
// Fake mailing backend
// ---------------------------------------------------------------------------

/// In-memory [`MailingBackend`] with optional scripted outcomes.
#[derive(Default)]
pub struct FakeMailer {
    subscribe_calls: AtomicUsize,
    test_calls: AtomicUsize,
    subscribe_response: Mutex<Option<Result<MailingOutcome, ApiError>>>,
    test_response: Mutex<Option<Result<MailingOutcome, ApiError>>>,
    last_subscribe: Mutex<Option<String>>,
    last_test: Mutex<Option<TestEmailRequest>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_subscribe(&self, response: Result<MailingOutcome, ApiError>) {
        *self.subscribe_response.lock() = Some(response);
    }

    pub fn script_test_send(&self, response: Result<MailingOutcome, ApiError>) {
        *self.test_response.lock() = Some(response);
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn test_calls(&self) -> usize {
        self.test_calls.load(Ordering::SeqCst)
    }

    pub fn last_subscribe_email(&self) -> Option<String> {
        self.last_subscribe.lock().clone()
    }

    pub fn last_test_request(&self) -> Option<TestEmailRequest> {
        self.last_test.lock().clone()
    }
}

#[async_trait]
impl MailingBackend for FakeMailer {
    async fn subscribe(&self, email: &str) -> Result<MailingOutcome, ApiError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_subscribe.lock() = Some(email.to_string());
        if let Some(scripted) = self.subscribe_response.lock().clone() {
            return scripted;
        }
        Ok(MailingOutcome {
            ok: true,
            message: Some(format!("Subscribed {email}.")),
        })
    }

    async fn send_test_email(
        &self,
        request: &TestEmailRequest,
    ) -> Result<MailingOutcome, ApiError> {
        self.test_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_test.lock() = Some(request.clone());
        if let Some(scripted) = self.test_response.lock().clone() {
            return scripted;
        }
        Ok(MailingOutcome {
            ok: true,
            message: Some(format!("Test email sent to {}.", request.email)),
        })
    }
}
