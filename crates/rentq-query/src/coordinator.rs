//! Search session orchestration.
//!
//! A [`QueryCoordinator`] owns one [`QueryState`] and is its only writer.
//! Callers observe the state through [`QueryCoordinator::subscribe`] or
//! [`QueryCoordinator::snapshot`].
//!
//! `submit_search` runs one chain:
//!
//! 1. Clear per-search results and mark the session loading.
//! 2. Fetch the category list (once per session) and the requested category,
//!    concurrently. Failures here are logged and do not stop the search.
//! 3. Geocode a free-text location, if the request has one.
//! 4. Dispatch the search and store the outcome.
//!
//! Each chain carries a generation number; results from a chain that a newer
//! `submit_search` or `clear_query_state` superseded are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rentq_core::{AppConfig, CategoryQuery, SearchRequest};
use rentq_geocode::GeocodeClient;
use rentq_search::{MarketplaceClient, SearchError};
use tokio::sync::watch;

use crate::error::QueryError;
use crate::in_flight::InFlight;
use crate::ports::{CategorySource, LocationResolver, OfferSearch};
use crate::state::{QueryState, SearchPhase, Settlement};

pub struct QueryCoordinator {
    resolver: Arc<dyn LocationResolver>,
    search: Arc<dyn OfferSearch>,
    categories: Arc<dyn CategorySource>,
    state: watch::Sender<QueryState>,
    generation: AtomicU64,
}

impl QueryCoordinator {
    #[must_use]
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        search: Arc<dyn OfferSearch>,
        categories: Arc<dyn CategorySource>,
    ) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            resolver,
            search,
            categories,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Builds a coordinator backed by the HTTP clients described in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Config`] when no geocode key is configured, and
    /// [`QueryError::Geocode`] or [`QueryError::Search`] if a client cannot be
    /// constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryError> {
        let geocoder = GeocodeClient::new(
            config.require_geocode()?,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let marketplace = Arc::new(MarketplaceClient::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?);
        Ok(Self::new(
            Arc::new(geocoder),
            Arc::clone(&marketplace) as Arc<dyn OfferSearch>,
            marketplace,
        ))
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Runs a full search for `request`.
    ///
    /// Never fails: domain errors land in `errors`, transport errors in
    /// `phase`, and `loading` is released whichever way the chain ends.
    pub async fn submit_search(&self, request: SearchRequest) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = InFlight::acquire(&self.state, &self.generation, generation);
        tracing::info!(
            generation,
            category_id = request.category_id.as_deref(),
            location = request.filter.location_text(),
            "search submitted"
        );

        self.resolve_categories(&guard, request.category_id.as_deref())
            .await;

        let Some(request) = self.resolve_location(&guard, request).await else {
            return;
        };

        guard.commit(|s| s.phase = SearchPhase::Dispatching);
        match self.search.search(&request).await {
            Ok(offers) => {
                tracing::info!(generation, count = offers.len(), "search settled");
                guard.settle(|s| s.apply_offers(offers));
            }
            Err(SearchError::Domain(msg)) => {
                tracing::info!(generation, msg = %msg, "search returned no offers");
                guard.settle(|s| s.apply_domain_error(msg));
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "offer search failed");
                guard.settle(|s| s.apply_transport_error(e.to_string()));
            }
        }
    }

    /// Shows page `page` of the current results without any network call.
    ///
    /// # Errors
    ///
    /// - [`QueryError::InvalidPage`] for page `0`.
    /// - [`QueryError::NotSettled`] while a search is running or before the
    ///   first search.
    ///
    /// After a failed search the held result set is empty; the page still
    /// changes but a warning is logged.
    pub fn change_page(&self, page: usize) -> Result<(), QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage(page));
        }
        let phase = self.state.borrow().phase.clone();
        match phase {
            SearchPhase::Settled(Settlement::Success) => {}
            SearchPhase::Settled(outcome) => {
                tracing::warn!(page, ?outcome, "changing page after an unsuccessful search");
            }
            _ => return Err(QueryError::NotSettled),
        }

        self.state.send_modify(|s| s.loading = true);
        self.state.send_modify(|s| {
            s.show_page(page);
            s.loading = false;
        });
        tracing::debug!(page, "page changed");
        Ok(())
    }

    /// Resets the session to its initial state and discards in-flight searches.
    pub fn clear_query_state(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(QueryState {
            generation,
            ..QueryState::default()
        });
    }

    async fn resolve_categories(&self, guard: &InFlight<'_>, category_id: Option<&str>) {
        let need_list = self.state.borrow().categories.is_empty();

        let list = async {
            if need_list {
                Some(self.categories.categories(&CategoryQuery::all()).await)
            } else {
                None
            }
        };
        let single = async {
            match category_id {
                Some(id) => Some(self.categories.categories(&CategoryQuery::by_id(id)).await),
                None => None,
            }
        };
        let (list, single) = tokio::join!(list, single);

        match list {
            Some(Ok(categories)) => {
                guard.commit(|s| s.categories = categories);
            }
            Some(Err(e)) => {
                tracing::warn!(generation = guard.generation(), error = %e, "category list fetch failed");
            }
            None => {}
        }

        match single {
            Some(Ok(mut found)) => {
                // The endpoint answers an id query with at most one document.
                found.truncate(1);
                guard.commit(|s| s.category = found);
            }
            Some(Err(e)) => {
                tracing::warn!(
                    generation = guard.generation(),
                    category_id,
                    error = %e,
                    "category fetch failed"
                );
            }
            None => {}
        }
    }

    /// Geocodes the request's free-text location.
    ///
    /// Returns `None` after settling the chain when the provider call fails.
    async fn resolve_location(
        &self,
        guard: &InFlight<'_>,
        mut request: SearchRequest,
    ) -> Option<SearchRequest> {
        let Some(text) = request.filter.location_text().map(str::to_owned) else {
            return Some(request);
        };

        guard.commit(|s| s.phase = SearchPhase::ResolvingLocation);
        match self.resolver.resolve(&text).await {
            Ok(location) => {
                request.filter.location = Some(location);
                Some(request)
            }
            Err(e) => {
                tracing::warn!(generation = guard.generation(), query = %text, error = %e, "geocode failed");
                guard.settle(|s| s.apply_transport_error(e.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
