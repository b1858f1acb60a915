//! Marketplace entities and the search request shape sent to the offer API.
//!
//! `Offer` and `Category` are read-only views of documents owned by the
//! marketplace backend. The backend is a document store, so identifiers may
//! arrive as `_id`; both spellings are accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A geocoded location: canonical label plus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub label: String,
    pub coordinates: Coordinates,
}

/// The `location` entry of a search filter.
///
/// Callers supply free text; the geocode resolver replaces it with a
/// [`LocationRef`] when the provider recognises it and leaves the text in
/// place otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationFilter {
    Resolved(LocationRef),
    Text(String),
}

impl LocationFilter {
    #[must_use]
    pub fn as_resolved(&self) -> Option<&LocationRef> {
        match self {
            LocationFilter::Resolved(loc) => Some(loc),
            LocationFilter::Text(_) => None,
        }
    }
}

/// Search filter: an optional location plus arbitrary pass-through fields
/// (price range, keywords, ...) that the search endpoint interprets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationFilter>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SearchFilter {
    /// Free-text location still waiting to be geocoded.
    ///
    /// Blank text counts as "no location" and yields `None`.
    #[must_use]
    pub fn location_text(&self) -> Option<&str> {
        match &self.location {
            Some(LocationFilter::Text(text)) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Body of `POST /api/offers/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub filter: SearchFilter,
}

impl SearchRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, text: impl Into<String>) -> Self {
        self.filter.location = Some(LocationFilter::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.fields.insert(key.into(), value.into());
        self
    }
}

/// A single rentable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    /// Description paragraphs, in display order.
    #[serde(default)]
    pub description: Vec<String>,
    pub price: f64,
    /// ISO 4217 code or display symbol, exactly as stored.
    pub currency: String,
    pub location: LocationRef,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub images_thumb: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image path relative to the marketplace API origin.
    #[serde(default)]
    pub image: String,
}

/// Query parameters for `GET /api/categories/get`.
///
/// `rand` shuffles the list; `rand` together with `limit` returns a random
/// sample of that size. `id` selects a single category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    pub id: Option<String>,
    pub rand: bool,
    pub limit: Option<u32>,
}

impl CategoryQuery {
    /// The unfiltered category list.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query-string pairs, omitting unset parameters.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.id {
            pairs.push(("id", id.clone()));
        }
        if self.rand {
            pairs.push(("rand", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn search_request_serializes_camel_case_with_flattened_fields() {
        let request = SearchRequest::new()
            .with_category("c-1")
            .with_location("Berlin")
            .with_field("maxPrice", 120);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "categoryId": "c-1",
                "filter": { "location": "Berlin", "maxPrice": 120 }
            })
        );
    }

    #[test]
    fn search_request_omits_absent_category_and_location() {
        let value = serde_json::to_value(SearchRequest::new()).unwrap();
        assert_eq!(value, json!({ "filter": {} }));
    }

    #[test]
    fn location_filter_deserializes_resolved_or_text() {
        let resolved: LocationFilter = serde_json::from_value(json!({
            "label": "Berlin, Germany",
            "coordinates": { "lat": 52.52, "lon": 13.405 }
        }))
        .unwrap();
        assert_eq!(
            resolved.as_resolved().map(|l| l.label.as_str()),
            Some("Berlin, Germany")
        );

        let text: LocationFilter = serde_json::from_value(json!("somewhere")).unwrap();
        assert_eq!(text, LocationFilter::Text("somewhere".to_string()));
    }

    #[test]
    fn location_text_ignores_blank_and_resolved_locations() {
        assert_eq!(
            SearchRequest::new().with_location("Paris").filter.location_text(),
            Some("Paris")
        );
        assert!(SearchRequest::new().with_location("  ").filter.location_text().is_none());
        assert!(SearchRequest::new().filter.location_text().is_none());

        let mut request = SearchRequest::new();
        request.filter.location = Some(LocationFilter::Resolved(LocationRef {
            label: "Paris".to_string(),
            coordinates: Coordinates { lat: 48.85, lon: 2.35 },
        }));
        assert!(request.filter.location_text().is_none());
    }

    #[test]
    fn offer_accepts_document_store_id() {
        let offer: Offer = serde_json::from_value(json!({
            "_id": "5f1",
            "title": "Cargo bike",
            "description": ["Sturdy", "Fits two kids"],
            "price": 25.0,
            "currency": "EUR",
            "location": { "label": "Leipzig", "coordinates": { "lat": 51.34, "lon": 12.37 } },
            "images": ["a.jpg"],
            "imagesThumb": ["a_thumb.jpg"]
        }))
        .unwrap();
        assert_eq!(offer.id, "5f1");
        assert_eq!(offer.description.len(), 2);
        assert_eq!(offer.images_thumb, vec!["a_thumb.jpg".to_string()]);
    }

    #[test]
    fn category_query_pairs_skip_unset_params() {
        assert!(CategoryQuery::all().to_query_pairs().is_empty());
        assert_eq!(
            CategoryQuery::by_id("abc").to_query_pairs(),
            vec![("id", "abc".to_string())]
        );
        let sample = CategoryQuery {
            id: None,
            rand: true,
            limit: Some(3),
        };
        assert_eq!(
            sample.to_query_pairs(),
            vec![("rand", "true".to_string()), ("limit", "3".to_string())]
        );
    }
}
