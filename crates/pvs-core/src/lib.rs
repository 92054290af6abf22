//! PVS Engine
//!
//! Client-resident view synchronization and AI summary orchestration for
//! a paginated search application. The engine keeps one explicit view
//! state, routes every interaction through a single dispatch table, and
//! runs each flow as a linear async function to a terminal rendered
//! state: no hidden DOM, no listener web, no half-finished surfaces.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pvs_core::prelude::*;
//!
//! let config = EndpointConfig::default();
//! let backends = SessionBackends::over_http(&config)?;
//! let session = SearchSession::new(config, backends, InitialView::new());
//!
//! session
//!     .dispatch(UiEvent::SearchSubmitted { query: "quantum error correction".into() })
//!     .await;
//!
//! let view = session.view().lock();
//! println!("{}", view.title());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod controller;
pub mod error;
pub mod events;
pub mod feedback;
pub mod gate;
pub mod history;
pub mod session;
pub mod summary;
pub mod sync;

// Scripted demo harness
pub mod harness;

// Re-exports for convenience
pub use cache::{CacheStats, SummaryCache};
pub use controller::SearchController;
pub use error::EngineError;
pub use events::{ActionTag, ContainerClick, UiEvent};
pub use feedback::{FeedbackFormController, MailOutcome};
pub use gate::{FlightPermit, GateStats, OpKey, RequestGate};
pub use history::{HistoryBridge, HistoryEntry, NavigationState, TraversalEvent};
pub use session::{DispatchOutcome, InitialView, SearchSession, SessionBackends, SessionStats};
pub use summary::{BatchOutcome, EscapeOutcome, SingleOutcome, SummaryOrchestrator};
pub use sync::{NavigateOutcome, ViewSynchronizer};

use parking_lot::Mutex;
use pvs_view::PageView;
use std::sync::Arc;

/// Shared handle to the one live page view.
///
/// Every component of a session holds the same handle. The lock is taken
/// only between suspension points, never across one.
pub type SharedView = Arc<Mutex<PageView>>;

/// Wraps a page view for sharing across a session's components.
#[must_use]
pub fn shared_view(view: PageView) -> SharedView {
    Arc::new(Mutex::new(view))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of the commonly assembled surface.
pub mod prelude {
    pub use crate::events::{ContainerClick, UiEvent};
    pub use crate::harness::{run_script, DemoBackend, ScriptReport, SessionScript};
    pub use crate::session::{DispatchOutcome, InitialView, SearchSession, SessionBackends};
    pub use crate::shared_view;
    pub use pvs_net::{EndpointConfig, SummaryEndpointShape};
    pub use pvs_view::PageView;
}
