//! HTTP client for the marketplace REST API.
//!
//! Covers the three read endpoints the query engine consumes: offer search,
//! the category listing, and the random featured-offer sample. Every call is
//! a single request without retry; timeouts come from the client builder.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use rentq_core::{Category, CategoryQuery, Offer, SearchRequest};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::{domain_message, into_list};
use crate::error::SearchError;

const SEARCH_PATH: &str = "api/offers/search";
const OFFERS_PATH: &str = "api/offers/get";
const CATEGORIES_PATH: &str = "api/categories/get";

/// Client for the marketplace API.
pub struct MarketplaceClient {
    client: Client,
    base_url: Url,
}

impl MarketplaceClient {
    /// Creates a client for the API served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Sends `request` to the offer-search endpoint and returns every match.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Domain`] if the API answers with a `msg` body, e.g.
    ///   when nothing matches.
    /// - [`SearchError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::Deserialize`] if the body is neither offers nor `msg`.
    pub async fn search_offers(&self, request: &SearchRequest) -> Result<Vec<Offer>, SearchError> {
        let url = self.endpoint(SEARCH_PATH, &[])?;
        tracing::debug!(
            category_id = request.category_id.as_deref(),
            has_location = request.filter.location.is_some(),
            extra_fields = request.filter.fields.len(),
            "dispatching offer search"
        );

        let response = self.client.post(url).json(request).send().await?;
        let body = Self::read_json(response, "offers/search").await?;

        if let Some(msg) = domain_message(&body) {
            return Err(SearchError::Domain(msg.to_owned()));
        }

        let offers: Vec<Offer> = Self::decode(body, "offers/search")?;
        tracing::debug!(count = offers.len(), "offer search returned");
        Ok(offers)
    }

    /// Fetches categories matching `query`.
    ///
    /// A `msg` body ("no category was found") yields an empty list, and a
    /// single-document answer to an `id` query yields a one-element list.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::Deserialize`] if an entry is not a category.
    pub async fn fetch_categories(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<Category>, SearchError> {
        let pairs = query.to_query_pairs();
        let url = self.endpoint(CATEGORIES_PATH, &pairs)?;
        let response = self.client.get(url).send().await?;
        let body = Self::read_json(response, "categories/get").await?;

        if let Some(msg) = domain_message(&body) {
            tracing::debug!(id = query.id.as_deref(), msg, "no categories matched");
            return Ok(Vec::new());
        }

        Self::decode(Value::Array(into_list(body)), "categories/get")
    }

    /// Fetches a random sample of `limit` offers for a featured listing.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_categories`](Self::fetch_categories).
    pub async fn fetch_featured_offers(&self, limit: u32) -> Result<Vec<Offer>, SearchError> {
        let limit = limit.to_string();
        let url = self.endpoint(
            OFFERS_PATH,
            &[("rand", "true".to_string()), ("limit", limit)],
        )?;
        let response = self.client.get(url).send().await?;
        let body = Self::read_json(response, "offers/get").await?;

        if let Some(msg) = domain_message(&body) {
            tracing::debug!(msg, "no featured offers available");
            return Ok(Vec::new());
        }

        Self::decode(Value::Array(into_list(body)), "offers/get")
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Asserts a 2xx status and parses the body as JSON.
    async fn read_json(response: Response, context: &str) -> Result<Value, SearchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    fn decode<T: DeserializeOwned>(body: Value, context: &str) -> Result<T, SearchError> {
        serde_json::from_value(body).map_err(|e| SearchError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
