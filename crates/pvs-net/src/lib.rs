//! PVS Network Boundary
//!
//! Endpoint configuration, wire DTOs, the backend trait seams, and the
//! production HTTP implementation. Nothing here knows about the view; the
//! engine crate owns the mapping from call outcomes to rendered state.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod wire;

// Re-exports for convenience
pub use backend::{MailingBackend, MailingOutcome, SearchTransport, SummaryBackend};
pub use config::{EndpointConfig, SummaryEndpointShape, DEFAULT_ORIGIN};
pub use error::ApiError;
pub use http::HttpBackend;
pub use wire::{
    BatchSummarizeRequest, BatchSummarizeResponse, CombinedSummarizeRequest,
    CombinedSummarizeResponse, ErrorBody, MailingResponse, PaperEntry, SingleSummarizeRequest,
    SingleSummarizeResponse, SubscribeRequest, TakeawayEntry, TestEmailRequest,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
