//! Search controller
//!
//! Gated entry points into synchronized navigation: form submits,
//! delegated pagination clicks, and history traversal replays. All three
//! contend on one "search" gate key, so overlapping triggers are dropped
//! rather than raced, and every successful navigation is recorded on the
//! history bridge through the same path.

use crate::gate::{OpKey, RequestGate};
use crate::history::{HistoryBridge, NavigationState, TraversalEvent};
use crate::sync::{NavigateOutcome, ViewSynchronizer};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Drives navigation and keeps history in step with it.
pub struct SearchController {
    synchronizer: ViewSynchronizer,
    history: Arc<Mutex<HistoryBridge>>,
    gate: RequestGate,
    origin: Url,
}

impl SearchController {
    /// Creates a controller over the shared history and gate.
    #[must_use]
    pub fn new(
        synchronizer: ViewSynchronizer,
        history: Arc<Mutex<HistoryBridge>>,
        gate: RequestGate,
        origin: Url,
    ) -> Self {
        Self {
            synchronizer,
            history,
            gate,
            origin,
        }
    }

    /// Handles a search form submit. A fresh submit always lands on the
    /// first results page.
    pub async fn submit(&self, query: &str) -> NavigateOutcome {
        self.navigate_gated(query, None).await
    }

    /// Handles a delegated pagination-link click.
    ///
    /// The link address supplies both query and page; a link without a
    /// query falls into the same validation rejection as an empty submit.
    pub async fn paginate(&self, href: &str) -> NavigateOutcome {
        let (query, page) = self.link_target(href);
        self.navigate_gated(&query, page).await
    }

    /// Replays the navigation a traversal event describes.
    ///
    /// A stateless entry falls back to the parameters of its address; an
    /// entry with neither is left alone.
    pub async fn handle_traversal(&self, event: TraversalEvent) -> NavigateOutcome {
        let state = event
            .state
            .or_else(|| NavigationState::from_address(&event.address));
        match state {
            Some(state) => {
                let page = (state.page > 1).then_some(state.page);
                self.navigate_gated(&state.query, page).await
            }
            None => {
                debug!(address = %event.address, "traversal carried nothing replayable");
                NavigateOutcome::Skipped
            }
        }
    }

    /// Moves one history entry back and replays it. The cursor moves even
    /// when the replay is dropped, matching how a browser updates the
    /// address bar regardless of what the page does with the event.
    pub async fn go_back(&self) -> NavigateOutcome {
        let event = self.history.lock().back();
        match event {
            Some(event) => self.handle_traversal(event).await,
            None => NavigateOutcome::Skipped,
        }
    }

    /// Moves one history entry forward and replays it.
    pub async fn go_forward(&self) -> NavigateOutcome {
        let event = self.history.lock().forward();
        match event {
            Some(event) => self.handle_traversal(event).await,
            None => NavigateOutcome::Skipped,
        }
    }

    async fn navigate_gated(&self, query: &str, page: Option<u32>) -> NavigateOutcome {
        if query.trim().is_empty() {
            // Validation rejections bypass the gate.
            return self.synchronizer.navigate(query, page).await;
        }
        let Some(_permit) = self.gate.try_acquire(OpKey::Search) else {
            debug!(query, "search already in flight; trigger dropped");
            return NavigateOutcome::Ignored;
        };
        let outcome = self.synchronizer.navigate(query, page).await;
        if let NavigateOutcome::Updated {
            state,
            title,
            address,
        } = &outcome
        {
            self.history
                .lock()
                .push(state.clone(), title.clone(), address.clone());
        }
        outcome
    }

    /// Query and page carried by a pagination link, which may be relative
    /// to the origin.
    fn link_target(&self, href: &str) -> (String, Option<u32>) {
        let Ok(address) = Url::options().base_url(Some(&self.origin)).parse(href) else {
            return (String::new(), None);
        };
        let mut query = String::new();
        let mut page = None;
        for (name, value) in address.query_pairs() {
            match name.as_ref() {
                "query" => query = value.into_owned(),
                "page" => page = value.parse().ok(),
                _ => {}
            }
        }
        (query, page)
    }
}
