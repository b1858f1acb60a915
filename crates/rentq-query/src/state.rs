//! Observable state of one search session.

use rentq_core::{Category, Offer};
use serde::Serialize;

use crate::paginate::{page_count, paginate};

/// How a search chain ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Settlement {
    Success,
    /// The search endpoint reported a failure; the message is in `errors`.
    DomainError,
    /// A network or provider failure; logged and recorded here only.
    TransportError { reason: String },
}

/// Where the current search chain is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchPhase {
    Idle,
    ResolvingCategories,
    ResolvingLocation,
    Dispatching,
    Settled(Settlement),
}

/// Everything a caller renders for a search page.
///
/// Field names serialize in the camelCase the UI reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    /// Domain error message from the offer search, if any.
    pub errors: Option<String>,
    pub loading: bool,
    /// Unfiltered category list, kept across searches once fetched.
    pub categories: Vec<Category>,
    /// The category named by the request, or empty.
    pub category: Vec<Category>,
    /// Full result set of the current search.
    pub offers: Vec<Offer>,
    /// Current page of `offers`.
    pub offers_paginated: Vec<Offer>,
    pub page: usize,
    pub page_count: usize,
    pub phase: SearchPhase,
    /// Generation of the search this state reflects.
    pub generation: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            errors: None,
            loading: true,
            categories: Vec::new(),
            category: Vec::new(),
            offers: Vec::new(),
            offers_paginated: Vec::new(),
            page: 1,
            page_count: 1,
            phase: SearchPhase::Idle,
            generation: 0,
        }
    }
}

impl QueryState {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, SearchPhase::Settled(_))
    }

    /// Clears per-search results for a new search, keeping cached categories.
    pub(crate) fn begin_search(&mut self, generation: u64) {
        self.errors = None;
        self.loading = true;
        self.category.clear();
        self.offers.clear();
        self.offers_paginated.clear();
        self.page = 1;
        self.page_count = 1;
        self.phase = SearchPhase::ResolvingCategories;
        self.generation = generation;
    }

    pub(crate) fn apply_offers(&mut self, offers: Vec<Offer>) {
        self.offers_paginated = paginate(&offers, 1).to_vec();
        self.page_count = page_count(offers.len());
        self.offers = offers;
        self.page = 1;
        self.phase = SearchPhase::Settled(Settlement::Success);
    }

    pub(crate) fn apply_domain_error(&mut self, msg: String) {
        self.errors = Some(msg);
        self.offers.clear();
        self.offers_paginated.clear();
        self.page = 1;
        self.page_count = 1;
        self.phase = SearchPhase::Settled(Settlement::DomainError);
    }

    pub(crate) fn apply_transport_error(&mut self, reason: String) {
        self.phase = SearchPhase::Settled(Settlement::TransportError { reason });
    }

    pub(crate) fn show_page(&mut self, page: usize) {
        self.offers_paginated = paginate(&self.offers, page).to_vec();
        self.page = page;
    }
}
