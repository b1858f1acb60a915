//! Scoped ownership of the `loading` flag for one search chain.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::state::{QueryState, SearchPhase};

/// Held by a search chain from submission until it ends.
///
/// Every write goes through [`InFlight::commit`], which drops the write when a
/// newer search (or a reset) has bumped the generation since this chain began.
/// Dropping the guard releases `loading` if the chain is still current, so the
/// flag clears on every exit path, including a cancelled future.
pub(crate) struct InFlight<'a> {
    state: &'a watch::Sender<QueryState>,
    current: &'a AtomicU64,
    generation: u64,
}

impl<'a> InFlight<'a> {
    /// Marks the session as loading and clears per-search results.
    pub(crate) fn acquire(
        state: &'a watch::Sender<QueryState>,
        current: &'a AtomicU64,
        generation: u64,
    ) -> Self {
        let guard = Self {
            state,
            current,
            generation,
        };
        guard.commit(|s| s.begin_search(generation));
        guard
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Applies `update` if this chain is still the current search.
    ///
    /// Returns `false` when the update was discarded as stale.
    pub(crate) fn commit(&self, update: impl FnOnce(&mut QueryState)) -> bool {
        self.state.send_if_modified(|s| {
            if self.is_current() {
                update(s);
                true
            } else {
                tracing::debug!(
                    generation = self.generation,
                    current = self.current.load(Ordering::SeqCst),
                    "discarding update from superseded search"
                );
                false
            }
        })
    }

    /// Applies the terminal `update` and releases `loading`.
    pub(crate) fn settle(&self, update: impl FnOnce(&mut QueryState)) -> bool {
        self.commit(|s| {
            update(s);
            s.loading = false;
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if !self.is_current() || !s.loading {
                return false;
            }
            if !matches!(s.phase, SearchPhase::Settled(_)) {
                tracing::warn!(
                    generation = self.generation,
                    phase = ?s.phase,
                    "search abandoned before settling"
                );
                s.apply_transport_error("search abandoned before settling".to_string());
            }
            s.loading = false;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Settlement;

    #[test]
    fn drop_without_settle_releases_loading() {
        let (tx, rx) = watch::channel(QueryState::default());
        let current = AtomicU64::new(1);
        {
            let guard = InFlight::acquire(&tx, &current, 1);
            assert!(rx.borrow().loading);
            guard.commit(|s| s.phase = SearchPhase::Dispatching);
        }
        let state = rx.borrow();
        assert!(!state.loading);
        assert!(matches!(
            state.phase,
            SearchPhase::Settled(Settlement::TransportError { .. })
        ));
    }

    #[test]
    fn settled_chain_keeps_its_outcome_on_drop() {
        let (tx, rx) = watch::channel(QueryState::default());
        let current = AtomicU64::new(1);
        {
            let guard = InFlight::acquire(&tx, &current, 1);
            guard.settle(|s| s.apply_offers(Vec::new()));
        }
        let state = rx.borrow();
        assert!(!state.loading);
        assert_eq!(state.phase, SearchPhase::Settled(Settlement::Success));
    }

    #[test]
    fn stale_guard_cannot_write_or_release() {
        let (tx, rx) = watch::channel(QueryState::default());
        let current = AtomicU64::new(1);
        let stale = InFlight::acquire(&tx, &current, 1);
        current.store(2, Ordering::SeqCst);
        let fresh = InFlight::acquire(&tx, &current, 2);

        assert!(!stale.settle(|s| s.errors = Some("stale".to_string())));
        drop(stale);

        let state = rx.borrow().clone();
        assert!(state.errors.is_none());
        assert!(state.loading, "stale guard must not release the newer search");
        assert_eq!(state.generation, 2);
        drop(fresh);
    }
}
