//! HTTP implementation of the backend traits
//!
//! One `reqwest` client behind all three seams. Response-shape policy lives
//! here: a success body reporting `{error}` becomes [`ApiError::Backend`], a
//! failure body is probed for a structured message, and bodies that decode
//! to neither result nor error become [`ApiError::UnexpectedShape`].

use crate::backend::{MailingBackend, MailingOutcome, SearchTransport, SummaryBackend};
use crate::config::EndpointConfig;
use crate::error::ApiError;
use crate::wire::{
    BatchSummarizeRequest, BatchSummarizeResponse, CombinedSummarizeRequest,
    CombinedSummarizeResponse, ErrorBody, MailingResponse, PaperEntry, SingleSummarizeRequest,
    SingleSummarizeResponse, SubscribeRequest, TakeawayEntry, TestEmailRequest,
};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Header sent with synchronized navigation fetches so the server can tell
/// them apart from full page loads.
const REQUESTED_WITH: &str = "X-Requested-With";

/// Production backend over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl HttpBackend {
    /// Builds a backend for the configured endpoints.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] when the underlying client cannot be
    /// constructed.
    pub fn new(config: EndpointConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration this backend was built with.
    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// POSTs a JSON body and returns the decoded response text along with
    /// success-ness, probing failure bodies for a structured message.
    async fn post_json<B: serde::Serialize>(
        &self,
        address: Url,
        body: &B,
    ) -> Result<String, ApiError> {
        let response = self.client.post(address).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
                .and_then(|body| body.error);
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.text().await?)
    }
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|err| ApiError::Decode {
        message: err.to_string(),
    })
}

#[async_trait]
impl SearchTransport for HttpBackend {
    async fn fetch_document(&self, address: &Url) -> Result<String, ApiError> {
        debug!(%address, "fetching document");
        let response = self
            .client
            .get(address.clone())
            .header(REQUESTED_WITH, "XMLHttpRequest")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: None,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SummaryBackend for HttpBackend {
    async fn summarize_batch(
        &self,
        papers: &[PaperEntry],
    ) -> Result<Vec<TakeawayEntry>, ApiError> {
        debug!(count = papers.len(), "requesting batch summaries");
        let address = self.config.batch_address()?;
        let request = BatchSummarizeRequest {
            papers: papers.to_vec(),
        };
        let text = self.post_json(address, &request).await?;
        let body: BatchSummarizeResponse = decode(&text)?;
        if let Some(takeaways) = body.papers_with_takeaways {
            return Ok(takeaways);
        }
        if let Some(message) = body.error {
            return Err(ApiError::Backend { message });
        }
        Err(ApiError::UnexpectedShape)
    }

    async fn summarize_single(
        &self,
        request: &SingleSummarizeRequest,
    ) -> Result<String, ApiError> {
        debug!(paper_id = %request.paper_id, "requesting single summary");
        let address = self.config.single_address()?;
        let text = self.post_json(address, request).await?;
        let body: SingleSummarizeResponse = decode(&text)?;
        if let Some(summary) = body.single_paper_summary {
            return Ok(summary);
        }
        if let Some(message) = body.error {
            return Err(ApiError::Backend { message });
        }
        Err(ApiError::UnexpectedShape)
    }

    async fn summarize_combined(&self, abstracts: &[String]) -> Result<String, ApiError> {
        debug!(count = abstracts.len(), "requesting combined summary");
        let address = self.config.combined_address()?;
        let request = CombinedSummarizeRequest {
            abstracts: abstracts.to_vec(),
        };
        let text = self.post_json(address, &request).await?;
        let body: CombinedSummarizeResponse = decode(&text)?;
        if let Some(summary) = body.summary {
            return Ok(summary);
        }
        if let Some(message) = body.error {
            return Err(ApiError::Backend { message });
        }
        Err(ApiError::UnexpectedShape)
    }
}

#[async_trait]
impl MailingBackend for HttpBackend {
    async fn subscribe(&self, email: &str) -> Result<MailingOutcome, ApiError> {
        let address = self.config.subscribe_address()?;
        let request = SubscribeRequest {
            email: email.to_string(),
        };
        let response = self.client.post(address).json(&request).send().await?;
        let ok = response.status().is_success();
        let body: MailingResponse = decode(&response.text().await?)?;
        Ok(MailingOutcome {
            ok,
            message: body.message,
        })
    }

    async fn send_test_email(
        &self,
        request: &TestEmailRequest,
    ) -> Result<MailingOutcome, ApiError> {
        let address = self.config.test_email_address()?;
        let response = self.client.post(address).json(request).send().await?;
        let ok = response.status().is_success();
        let body: MailingResponse = decode(&response.text().await?)?;
        Ok(MailingOutcome {
            ok,
            message: body.message,
        })
    }
}
