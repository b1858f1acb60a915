//! HTTP client for the geocode provider's autocomplete endpoint.
//!
//! Turns free text typed by a user into a [`LocationRef`](rentq_core::LocationRef).
//! One request per call, no retry.

use std::time::Duration;

use reqwest::{Client, Url};
use rentq_core::{GeocodeConfig, LocationFilter};

use crate::error::GeocodeError;
use crate::types::FeatureCollection;

/// Client for the geocode provider.
///
/// Built from an explicit [`GeocodeConfig`]; point `base_url` at a mock server
/// in tests.
pub struct GeocodeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a client for the provider described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `config.base_url` does not parse.
    pub fn new(
        config: &GeocodeConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends to the versioned path
        // instead of replacing its last segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
        })
    }

    /// Resolves `text` to a location.
    ///
    /// Returns [`LocationFilter::Resolved`] built from the provider's first
    /// feature, or [`LocationFilter::Text`] carrying `text` unchanged when the
    /// provider has no usable match. Blank input short-circuits to `Text`
    /// without a request.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Deserialize`] if the body is not a feature collection.
    pub async fn resolve(&self, text: &str) -> Result<LocationFilter, GeocodeError> {
        if text.trim().is_empty() {
            return Ok(LocationFilter::Text(text.to_owned()));
        }

        let url = self.autocomplete_url(text)?;
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("autocomplete(text={text})"),
                source: e,
            })?;

        match collection
            .features
            .first()
            .and_then(|f| f.to_location_ref(text))
        {
            Some(location) => {
                tracing::debug!(query = text, label = %location.label, "location resolved");
                Ok(LocationFilter::Resolved(location))
            }
            None => {
                tracing::info!(
                    query = text,
                    features = collection.features.len(),
                    "no usable geocode match, keeping raw location text"
                );
                Ok(LocationFilter::Text(text.to_owned()))
            }
        }
    }

    /// Builds `{base}/autocomplete?text=..&apikey=..` with percent-encoded values.
    fn autocomplete_url(&self, text: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("autocomplete")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("text", text)
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }
}
