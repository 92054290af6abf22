//! PVS View Model
//!
//! Headless representation of the rendered search page and the extraction
//! and formatting rules the synchronization engine applies to it.
//!
//! # Core Pieces
//!
//! - **Regions**: named markup slots swapped wholesale during navigation
//! - **Page**: the one live, mutable view state (panel, modal, controls,
//!   focus, message slots)
//! - **Document**: region/title/item extraction from fetched markup
//! - **Markup**: fragment builders and takeaway text formatting
//!
//! Nothing in this crate is asynchronous or touches the network; the engine
//! crate drives it between suspension points.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod document;
pub mod error;
pub mod markup;
pub mod page;
pub mod region;

// Re-exports for convenience
pub use document::{
    collect_page_links, collect_snapshots, collect_summary_links, FetchedDocument, PaperSnapshot,
    SummaryLinkData, SENTINEL_ABSTRACT,
};
pub use error::ViewError;
pub use page::{ControlId, DetailModal, MessageTone, PageView, SummaryPanel};
pub use region::{RegionId, RegionSlot, CONTENT_REGION, MESSAGE_SLOT, RESULTS_REGION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
