//! End-to-end tests for `QueryCoordinator` wired to the real HTTP clients.
//!
//! A single wiremock server stands in for both the marketplace API and the
//! geocode provider.

use std::sync::Arc;

use rentq_core::{GeocodeConfig, SearchRequest};
use rentq_geocode::GeocodeClient;
use rentq_query::{
    CategorySource, LocationResolver, OfferSearch, QueryCoordinator, SearchPhase, Settlement,
};
use rentq_search::MarketplaceClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn offer_json(i: usize) -> serde_json::Value {
    json!({
        "_id": format!("o{i}"),
        "title": format!("Offer {i}"),
        "description": [],
        "price": 20,
        "currency": "EUR",
        "location": { "label": "Berlin, Germany", "coordinates": { "lat": 52.52, "lon": 13.405 } },
        "images": [],
        "imagesThumb": []
    })
}

fn coordinator(server: &MockServer) -> QueryCoordinator {
    let geocode = GeocodeClient::new(
        &GeocodeConfig {
            api_key: "geo-key".to_string(),
            base_url: format!("{}/geo/v1", server.uri()),
        },
        5,
        "rentq-test/0.1",
    )
    .expect("geocode client");
    let marketplace = Arc::new(
        MarketplaceClient::new(&server.uri(), 5, "rentq-test/0.1").expect("marketplace client"),
    );
    QueryCoordinator::new(
        Arc::new(geocode) as Arc<dyn LocationResolver>,
        Arc::clone(&marketplace) as Arc<dyn OfferSearch>,
        marketplace as Arc<dyn CategorySource>,
    )
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/categories/get"))
        .and(query_param("id", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            { "_id": "c1", "title": "bikes", "description": "Two wheels", "image": "img/bikes.png" }
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/categories/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "c1", "title": "bikes", "description": "Two wheels", "image": "img/bikes.png" },
            { "_id": "c2", "title": "tools", "description": "Drills", "image": "img/tools.png" }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn location_search_geocodes_then_dispatches_resolved_payload() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("GET"))
        .and(path("/geo/v1/autocomplete"))
        .and(query_param("text", "berlin"))
        .and(query_param("apikey", "geo-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.405, 52.52] },
                "properties": { "label": "Berlin, Germany" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/offers/search"))
        .and(body_partial_json(json!({
            "categoryId": "c1",
            "filter": {
                "location": { "label": "Berlin, Germany" },
                "maxPrice": 30
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::Value::Array((1..=20).map(offer_json).collect())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    coordinator
        .submit_search(
            SearchRequest::new()
                .with_category("c1")
                .with_location("berlin")
                .with_field("maxPrice", 30),
        )
        .await;

    let state = coordinator.snapshot();
    assert!(!state.loading);
    assert_eq!(state.phase, SearchPhase::Settled(Settlement::Success));
    assert_eq!(state.categories.len(), 2);
    assert_eq!(state.category.len(), 1);
    assert_eq!(state.offers.len(), 20);
    assert_eq!(state.offers_paginated.len(), 12);
    assert_eq!(state.page_count, 2);

    coordinator.change_page(2).expect("settled search can change page");
    let state = coordinator.snapshot();
    assert_eq!(state.offers_paginated.len(), 8);
    assert_eq!(state.offers_paginated[0].id, "o13");
}

#[tokio::test]
async fn no_offers_message_becomes_errors() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("GET"))
        .and(path("/geo/v1/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/offers/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "msg": "No offers found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    coordinator.submit_search(SearchRequest::new()).await;

    let state = coordinator.snapshot();
    assert_eq!(state.errors.as_deref(), Some("No offers found"));
    assert!(state.offers.is_empty());
    assert_eq!(state.page_count, 1);
    assert!(!state.loading);
}

#[tokio::test]
async fn unreachable_search_endpoint_still_releases_loading() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/offers/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    coordinator.submit_search(SearchRequest::new()).await;

    let state = coordinator.snapshot();
    assert!(!state.loading);
    assert!(state.errors.is_none());
    assert!(matches!(
        state.phase,
        SearchPhase::Settled(Settlement::TransportError { .. })
    ));
}
