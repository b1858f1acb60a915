//! Seams between the coordinator and the services it calls.
//!
//! The HTTP clients implement these directly; tests substitute in-memory
//! doubles.

use async_trait::async_trait;
use rentq_core::{Category, CategoryQuery, LocationFilter, Offer, SearchRequest};
use rentq_geocode::{GeocodeClient, GeocodeError};
use rentq_search::{MarketplaceClient, SearchError};

/// Turns free-text locations into geocoded references.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Returns a resolved location, or the input text when nothing matched.
    async fn resolve(&self, text: &str) -> Result<LocationFilter, GeocodeError>;
}

/// Dispatches offer searches.
#[async_trait]
pub trait OfferSearch: Send + Sync {
    /// Returns every matching offer; domain failures are [`SearchError::Domain`].
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Offer>, SearchError>;
}

/// Supplies categories for the filter UI.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, SearchError>;
}

#[async_trait]
impl LocationResolver for GeocodeClient {
    async fn resolve(&self, text: &str) -> Result<LocationFilter, GeocodeError> {
        GeocodeClient::resolve(self, text).await
    }
}

#[async_trait]
impl OfferSearch for MarketplaceClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Offer>, SearchError> {
        self.search_offers(request).await
    }
}

#[async_trait]
impl CategorySource for MarketplaceClient {
    async fn categories(&self, query: &CategoryQuery) -> Result<Vec<Category>, SearchError> {
        self.fetch_categories(query).await
    }
}
