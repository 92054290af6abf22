//! Wire DTOs
//!
//! Request and response bodies for every backend call, field names matching
//! the wire contract exactly. Response structs keep every field optional so
//! the caller can distinguish a reported error from a missing result.

use serde::{Deserialize, Serialize};

/// One result item submitted for batch summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperEntry {
    /// Paper identifier.
    pub id: String,
    /// Paper title.
    pub title: String,
    /// Abstract text to summarize.
    pub abstract_text: String,
    /// Source document address.
    pub pdf_link: String,
}

/// Body of a batch summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummarizeRequest {
    /// Items to summarize.
    pub papers: Vec<PaperEntry>,
}

/// One summarized item in a batch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeawayEntry {
    /// Paper identifier, echoed from the request.
    pub id: String,
    /// Paper title, echoed from the request.
    pub title: String,
    /// Generated takeaway text.
    pub takeaways_text: String,
}

/// Body of a batch summarization response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummarizeResponse {
    /// Summarized items, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papers_with_takeaways: Option<Vec<TakeawayEntry>>,
    /// Error reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a single-paper summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSummarizeRequest {
    /// Paper identifier.
    pub paper_id: String,
    /// Paper title.
    pub title: String,
    /// Abstract text to summarize.
    pub abstract_text: String,
}

/// Body of a single-paper summarization response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSummarizeResponse {
    /// Generated summary, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_paper_summary: Option<String>,
    /// Error reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a legacy combined summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSummarizeRequest {
    /// Bare abstract texts to summarize together.
    pub abstracts: Vec<String>,
}

/// Body of a legacy combined summarization response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSummarizeResponse {
    /// Generated combined summary, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Error reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Address to subscribe.
    pub email: String,
}

/// Body of an administrative test-send request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEmailRequest {
    /// Recipient address.
    pub email: String,
    /// Message subject.
    pub subject: String,
    /// Message body markup.
    pub body: String,
}

/// Body of both mailing responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingResponse {
    /// Human-readable outcome message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure body shape shared by the summarization endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Structured error message, when the backend provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
