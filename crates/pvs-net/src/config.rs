//! Endpoint configuration
//!
//! One configuration object names every backend address the engine talks
//! to, plus the summarization endpoint shape. There is exactly one engine
//! implementation; the shape selects which summarization contract it
//! targets, replacing the duplicated per-endpoint variants of older
//! incarnations of this page.

use crate::error::ApiError;
use std::time::Duration;
use url::Url;

/// Origin used by the default configuration.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5000/";

/// Which summarization contract the engine targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryEndpointShape {
    /// Per-paper takeaways with single-paper detail summaries.
    #[default]
    PerPaper,
    /// Legacy combined endpoint: bare abstracts in, one summary out.
    /// The single-paper detail flow does not exist under this shape.
    Combined,
}

/// Addresses and knobs for every backend call.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    origin: Url,
    search_action: String,
    batch_path: String,
    single_path: String,
    combined_path: String,
    subscribe_path: String,
    test_email_path: String,
    shape: SummaryEndpointShape,
    snapshot_limit: usize,
    timeout: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        let origin = Url::parse(DEFAULT_ORIGIN).expect("default origin must parse");
        Self::new(origin)
    }
}

impl EndpointConfig {
    /// Creates a configuration for a backend origin with the standard
    /// endpoint paths.
    #[must_use]
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            search_action: "/search".to_string(),
            batch_path: "/api/summarize_papers".to_string(),
            single_path: "/api/summarize_single_paper".to_string(),
            combined_path: "/api/summarize".to_string(),
            subscribe_path: "/subscribe".to_string(),
            test_email_path: "/admin/send_test_email".to_string(),
            shape: SummaryEndpointShape::default(),
            snapshot_limit: 5,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the search form action path.
    #[must_use]
    pub fn with_search_action(mut self, action: impl Into<String>) -> Self {
        self.search_action = action.into();
        self
    }

    /// Sets the summarization endpoint shape.
    #[must_use]
    pub fn with_shape(mut self, shape: SummaryEndpointShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets how many visible items a batch snapshot may cover.
    #[must_use]
    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Backend origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Search form action path.
    #[inline]
    #[must_use]
    pub fn search_action(&self) -> &str {
        &self.search_action
    }

    /// Configured summarization shape.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> SummaryEndpointShape {
        self.shape
    }

    /// Batch snapshot size limit.
    #[inline]
    #[must_use]
    pub fn snapshot_limit(&self) -> usize {
        self.snapshot_limit
    }

    /// Request timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the address for a search navigation, merging the query and
    /// the page (when one was provided) onto the action path.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the action path cannot be
    /// resolved against the origin.
    pub fn search_address(&self, query: &str, page: Option<u32>) -> Result<Url, ApiError> {
        let mut address = self.resolve(&self.search_action)?;
        address.query_pairs_mut().append_pair("query", query);
        if let Some(page) = page {
            address
                .query_pairs_mut()
                .append_pair("page", &page.to_string());
        }
        Ok(address)
    }

    /// Address of the batch summarization endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the path cannot be resolved.
    pub fn batch_address(&self) -> Result<Url, ApiError> {
        self.resolve(&self.batch_path)
    }

    /// Address of the single-paper summarization endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the path cannot be resolved.
    pub fn single_address(&self) -> Result<Url, ApiError> {
        self.resolve(&self.single_path)
    }

    /// Address of the legacy combined summarization endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the path cannot be resolved.
    pub fn combined_address(&self) -> Result<Url, ApiError> {
        self.resolve(&self.combined_path)
    }

    /// Address of the subscription endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the path cannot be resolved.
    pub fn subscribe_address(&self) -> Result<Url, ApiError> {
        self.resolve(&self.subscribe_path)
    }

    /// Address of the administrative test-send endpoint.
    ///
    /// # Errors
    /// Returns [`ApiError::Address`] when the path cannot be resolved.
    pub fn test_email_address(&self) -> Result<Url, ApiError> {
        self.resolve(&self.test_email_path)
    }

    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.origin.join(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn search_address_merges_query_and_page() {
        let config = EndpointConfig::default();
        let address = config.search_address("ml", Some(2)).unwrap();
        assert_eq!(address.as_str(), "http://localhost:5000/search?query=ml&page=2");
    }

    #[test]
    fn search_address_omits_absent_page() {
        let config = EndpointConfig::default();
        let address = config.search_address("transformers", None).unwrap();
        assert_eq!(
            address.as_str(),
            "http://localhost:5000/search?query=transformers"
        );
    }

    #[test]
    fn endpoint_paths_resolve_against_origin() {
        let config = EndpointConfig::default();
        assert_eq!(
            config.batch_address().unwrap().as_str(),
            "http://localhost:5000/api/summarize_papers"
        );
        assert_eq!(
            config.test_email_address().unwrap().as_str(),
            "http://localhost:5000/admin/send_test_email"
        );
    }

    #[test]
    fn default_shape_is_per_paper() {
        assert_eq!(
            EndpointConfig::default().shape(),
            SummaryEndpointShape::PerPaper
        );
    }
}
