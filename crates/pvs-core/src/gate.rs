//! Request gate
//!
//! Keyed single-flight guard over every backend-calling operation. At most
//! one operation per key may be in flight; a duplicate trigger while the
//! key is held is dropped, never queued. Releasing is tied to permit drop,
//! so no exit path of a flow can leave its key stuck.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Key identifying one gated operation family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpKey {
    /// Synchronized search navigation. Shared by submits, pagination
    /// clicks, and history replays, so they can never overlap each other.
    Search,
    /// Batch summarization of the visible results.
    BatchSummary,
    /// Detailed summarization of one paper, keyed by its identifier.
    SingleSummary(String),
}

impl fmt::Display for OpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::BatchSummary => write!(f, "batch-summary"),
            Self::SingleSummary(id) => write!(f, "single-summary:{id}"),
        }
    }
}

#[derive(Debug, Default)]
struct GateInner {
    in_flight: DashMap<OpKey, ()>,
    acquired: AtomicU64,
    rejected: AtomicU64,
}

/// Point-in-time gate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Permits handed out since construction.
    pub acquired_total: u64,
    /// Triggers dropped because their key was already held.
    pub rejected_total: u64,
    /// Keys currently held.
    pub in_flight: usize,
}

/// Shared in-flight key set.
///
/// Clones share one underlying set; the session hands the same gate to
/// every controller so "search" submitted from a form and "search"
/// replayed from history contend on the same key.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    inner: Arc<GateInner>,
}

impl RequestGate {
    /// Creates an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to mark `key` as in flight.
    ///
    /// Returns `None` when the key is already held; the caller drops the
    /// duplicate trigger.
    #[must_use]
    pub fn try_acquire(&self, key: OpKey) -> Option<FlightPermit> {
        match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => {
                self.inner.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "operation already in flight; trigger dropped");
                None
            }
            Entry::Vacant(slot) => {
                slot.insert(());
                self.inner.acquired.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "operation marked in flight");
                Some(FlightPermit {
                    gate: self.clone(),
                    key,
                })
            }
        }
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn is_in_flight(&self, key: &OpKey) -> bool {
        self.inner.in_flight.contains_key(key)
    }

    /// Releases `key` directly. A no-op when the key is not held.
    pub fn release(&self, key: &OpKey) {
        self.inner.in_flight.remove(key);
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> GateStats {
        GateStats {
            acquired_total: self.inner.acquired.load(Ordering::Relaxed),
            rejected_total: self.inner.rejected.load(Ordering::Relaxed),
            in_flight: self.inner.in_flight.len(),
        }
    }
}

/// Held while a gated operation runs; releases its key on drop.
#[derive(Debug)]
pub struct FlightPermit {
    gate: RequestGate,
    key: OpKey,
}

impl FlightPermit {
    /// Key this permit holds.
    #[must_use]
    pub fn key(&self) -> &OpKey {
        &self.key
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.gate.release(&self.key);
        debug!(key = %self.key, "operation released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_of_held_key_is_refused() {
        let gate = RequestGate::new();
        let permit = gate.try_acquire(OpKey::Search);
        assert!(permit.is_some());
        assert!(gate.try_acquire(OpKey::Search).is_none());
        assert!(gate.is_in_flight(&OpKey::Search));
    }

    #[test]
    fn dropping_the_permit_releases_the_key() {
        let gate = RequestGate::new();
        {
            let _permit = gate.try_acquire(OpKey::BatchSummary).unwrap();
            assert!(gate.is_in_flight(&OpKey::BatchSummary));
        }
        assert!(!gate.is_in_flight(&OpKey::BatchSummary));
        assert!(gate.try_acquire(OpKey::BatchSummary).is_some());
    }

    #[test]
    fn single_summary_keys_are_independent_per_paper() {
        let gate = RequestGate::new();
        let _a = gate.try_acquire(OpKey::SingleSummary("2401.001".into())).unwrap();
        assert!(gate
            .try_acquire(OpKey::SingleSummary("2401.002".into()))
            .is_some());
        assert!(gate
            .try_acquire(OpKey::SingleSummary("2401.001".into()))
            .is_none());
    }

    #[test]
    fn stats_count_acquisitions_and_rejections() {
        let gate = RequestGate::new();
        let _permit = gate.try_acquire(OpKey::Search).unwrap();
        let _ = gate.try_acquire(OpKey::Search);
        let stats = gate.stats();
        assert_eq!(stats.acquired_total, 1);
        assert_eq!(stats.rejected_total, 1);
        assert_eq!(stats.in_flight, 1);
    }

    #[test]
    fn keys_render_their_wire_names() {
        assert_eq!(OpKey::Search.to_string(), "search");
        assert_eq!(OpKey::BatchSummary.to_string(), "batch-summary");
        assert_eq!(
            OpKey::SingleSummary("2401.001".into()).to_string(),
            "single-summary:2401.001"
        );
    }
}
