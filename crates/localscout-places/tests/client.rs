//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use localscout_core::GeoPoint;
use localscout_places::{PlacesClient, PlacesError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn geocode_returns_first_match() {
    let server = MockServer::start().await;

    let body = json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                "geometry": { "location": { "lat": 37.4224, "lng": -122.0842 } }
            },
            {
                "formatted_address": "1600 Amphitheatre Pkwy, Somewhere Else",
                "geometry": { "location": { "lat": 10.0, "lng": 10.0 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "1600 Amphitheatre Parkway"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client
        .geocode("1600 Amphitheatre Parkway")
        .await
        .expect("geocode should succeed")
        .expect("address should resolve");

    assert_eq!(
        found.formatted_address,
        "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA"
    );
    assert_eq!(
        found.location,
        GeoPoint {
            lat: 37.4224,
            lng: -122.0842
        }
    );
}

#[tokio::test]
async fn geocode_zero_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client.geocode("nowhere at all").await.expect("not an error");
    assert!(found.is_none());
}

#[tokio::test]
async fn geocode_first_match_without_geometry_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                { "formatted_address": "Somewhere vague" },
                {
                    "formatted_address": "Not the first match",
                    "geometry": { "location": { "lat": 10.0, "lng": 10.0 } }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client.geocode("somewhere").await.expect("not an error");
    assert!(found.is_none());
}

#[tokio::test]
async fn geocode_request_denied_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.geocode("anything").await.unwrap_err();
    assert!(
        matches!(err, PlacesError::Api { ref status, .. } if status == "REQUEST_DENIED"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn nearby_sends_location_radius_and_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("location", "37.4224,-122.0842"))
        .and(query_param("radius", "1609.34"))
        .and(query_param("type", "cafe"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "name": "Cafe One",
                    "vicinity": "1 Main St",
                    "rating": 4.2,
                    "user_ratings_total": 88,
                    "geometry": { "location": { "lat": 37.42, "lng": -122.08 } },
                    "types": ["cafe", "food"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .nearby(
            GeoPoint {
                lat: 37.4224,
                lng: -122.0842,
            },
            1609.34,
            "cafe",
        )
        .await
        .expect("nearby should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name.as_deref(), Some("Cafe One"));
    assert_eq!(places[0].user_ratings_total, Some(88));
}

#[tokio::test]
async fn nearby_server_error_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .nearby(GeoPoint { lat: 0.0, lng: 0.0 }, 100.0, "bar")
        .await
        .unwrap_err();
    assert!(matches!(err, PlacesError::Http(_)), "got: {err:?}");
    assert!(
        !err.to_string().contains("test-key"),
        "error text must not leak the API key: {err}"
    );
}

#[tokio::test]
async fn nearby_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .nearby(GeoPoint { lat: 0.0, lng: 0.0 }, 100.0, "bar")
        .await
        .unwrap_err();
    assert!(
        matches!(err, PlacesError::Deserialize { ref context, .. } if context == "nearbysearch"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn autocomplete_passes_predictions_through() {
    let server = MockServer::start().await;

    let predictions = json!([
        {
            "description": "1600 Amphitheatre Parkway, Mountain View, CA, USA",
            "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
            "structured_formatting": { "main_text": "1600 Amphitheatre Parkway" }
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", "1600 Amph"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "predictions": predictions.clone()
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let got = client.autocomplete("1600 Amph").await.expect("autocomplete");
    assert_eq!(serde_json::Value::Array(got), predictions);
}
