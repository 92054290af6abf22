//! Backend trait seams
//!
//! The engine talks to its collaborators through these traits only. The
//! production implementation is [`crate::http::HttpBackend`]; tests swap in
//! fakes with scripted responses and call counters.

use crate::error::ApiError;
use crate::wire::{PaperEntry, SingleSummarizeRequest, TakeawayEntry, TestEmailRequest};
use async_trait::async_trait;
use url::Url;

/// Fetches server-rendered documents for synchronized navigation.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Fetches the document at `address`.
    ///
    /// # Errors
    /// [`ApiError::Status`] on a non-success status, [`ApiError::Transport`]
    /// when the request never produced a response.
    async fn fetch_document(&self, address: &Url) -> Result<String, ApiError>;
}

/// Summarization backend, in both endpoint shapes.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Submits a batch of papers and returns per-paper takeaways.
    ///
    /// # Errors
    /// [`ApiError::Backend`] when a success response reports an error,
    /// [`ApiError::Status`] on non-success (with the structured detail when
    /// the failure body carried one), [`ApiError::UnexpectedShape`] when a
    /// success body has neither takeaways nor an error.
    async fn summarize_batch(
        &self,
        papers: &[PaperEntry],
    ) -> Result<Vec<TakeawayEntry>, ApiError>;

    /// Requests a detailed summary for one paper.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::summarize_batch`].
    async fn summarize_single(
        &self,
        request: &SingleSummarizeRequest,
    ) -> Result<String, ApiError>;

    /// Submits bare abstracts to the legacy combined endpoint.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::summarize_batch`].
    async fn summarize_combined(&self, abstracts: &[String]) -> Result<String, ApiError>;
}

/// Outcome of a mailing call. Non-success statuses still carry a message
/// body, so they are an outcome here rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingOutcome {
    /// Whether the response status was a success.
    pub ok: bool,
    /// Message from the response body, when present.
    pub message: Option<String>,
}

/// Subscription and administrative mail backend.
#[async_trait]
pub trait MailingBackend: Send + Sync {
    /// Subscribes an email address.
    ///
    /// # Errors
    /// [`ApiError::Transport`] or [`ApiError::Decode`] only; status-level
    /// failures are reported through [`MailingOutcome::ok`].
    async fn subscribe(&self, email: &str) -> Result<MailingOutcome, ApiError>;

    /// Sends an administrative test email.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::subscribe`].
    async fn send_test_email(&self, request: &TestEmailRequest)
        -> Result<MailingOutcome, ApiError>;
}
