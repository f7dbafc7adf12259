use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use localscout_core::Taxonomy;
use localscout_places::PlacesClient;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const ORIGIN: &str = "http://localhost";

fn app_with(places: Option<PlacesClient>) -> Router {
    let state = AppState {
        places,
        taxonomy: Arc::new(Taxonomy::embedded().expect("embedded taxonomy")),
        query_delay_ms: 0,
    };
    build_app(state, &[ORIGIN.to_string()])
}

fn app_for(server: &MockServer) -> Router {
    let client = PlacesClient::with_base_url("test-key", 5, &server.uri()).expect("client");
    app_with(Some(client))
}

fn search_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/places/search")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn mount_geocode(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "1 Market St, San Francisco, CA 94105, USA",
                "geometry": { "location": { "lat": 37.7936, "lng": -122.3950 } }
            }]
        })))
        .mount(server)
        .await;
}

#[test]
fn api_error_codes_map_to_statuses() {
    assert_eq!(
        ApiError::bad_request("x").into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ApiError::not_found("x").into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ApiError::missing_api_key().into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn api_error_omits_absent_details() {
    let json = serde_json::to_value(ApiError::not_found("Address not found")).expect("serialize");
    assert_eq!(json, json!({ "error": "Address not found" }));

    let json = serde_json::to_value(ApiError::internal("Failed to search places", "boom"))
        .expect("serialize");
    assert_eq!(json, json!({ "error": "Failed to search places", "details": "boom" }));
}

#[tokio::test]
async fn health_reports_healthy_with_request_id() {
    let response = app_with(None)
        .oneshot(get_request("/api/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(json["status"], "healthy");
    let timestamp = json["timestamp"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn blank_address_is_rejected_before_anything_else() {
    // No API key and a nonsense radius: the address check still wins.
    let (status, json) = send(
        app_with(None),
        search_request(&json!({ "address": "   ", "radius": "far", "categories": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Address is required" }));

    let (status, json) = send(app_with(None), search_request(&json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Address is required" }));
}

#[tokio::test]
async fn non_positive_radius_is_rejected() {
    let (status, json) = send(
        app_with(None),
        search_request(&json!({ "address": "1 Market St", "radius": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Radius must be a positive number of miles" }));
}

#[tokio::test]
async fn malformed_json_is_invalid_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/places/search")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, json) = send(app_with(None), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid request body");
}

#[tokio::test]
async fn missing_api_key_is_configuration_error() {
    let (status, json) = send(
        app_with(None),
        search_request(&json!({ "address": "1 Market St", "radius": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Google Places API key not configured" }));
}

#[tokio::test]
async fn null_category_switch_is_accepted_as_off() {
    let server = MockServer::start().await;
    mount_geocode(&server).await;

    let (status, json) = send(
        app_for(&server),
        search_request(&json!({
            "address": "1 Market St",
            "radius": 1,
            "categories": { "food": null }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {json}");
    assert_eq!(json["results"], json!([]));
}

#[tokio::test]
async fn unknown_address_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let (status, json) = send(
        app_for(&server),
        search_request(&json!({ "address": "nowhere", "radius": 1, "categories": { "food": true } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "Address not found" }));
}

#[tokio::test]
async fn geocode_failure_is_server_error_with_details() {
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

    let (status, json) = send(
        app_for(&server),
        search_request(&json!({ "address": "1 Market St", "radius": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to search places");
    let details = json["details"].as_str().expect("details");
    assert!(details.contains("REQUEST_DENIED"), "details: {details}");
    assert!(!details.contains("test-key"));
}

#[tokio::test]
async fn food_only_search_returns_food_groups_and_echoes_miles() {
    let server = MockServer::start().await;
    mount_geocode(&server).await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("type", "restaurant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "name": "Slanted Door",
                    "vicinity": "1 Ferry Building",
                    "rating": 4.3,
                    "user_ratings_total": 4021,
                    "geometry": { "location": { "lat": 37.7955, "lng": -122.3937 } },
                    "types": ["restaurant", "food"]
                },
                {
                    "name": "Hog Island",
                    "rating": 4.6,
                    "geometry": { "location": { "lat": 37.7956, "lng": -122.3934 } }
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })))
        .mount(&server)
        .await;

    let (status, json) = send(
        app_for(&server),
        search_request(&json!({
            "address": "1 Market St",
            "radius": 2.5,
            "categories": { "food": true, "healthcare": false }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["radius"], 2.5);
    assert_eq!(
        json["searchLocation"],
        json!({ "lat": 37.7936, "lng": -122.3950, "formattedAddress": "1 Market St, San Francisco, CA 94105, USA" })
    );

    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["category"], "food");
    assert_eq!(results[0]["subcategory"], "Restaurants");

    let places = results[0]["places"].as_array().expect("places");
    assert_eq!(places[0]["name"], "Hog Island");
    assert_eq!(places[0]["address"], "Address not available");
    assert_eq!(places[1]["name"], "Slanted Door");
    assert_eq!(places[1]["userRatingsTotal"], 4021);
}

#[tokio::test]
async fn autocomplete_requires_input() {
    let (status, json) = send(app_with(None), get_request("/api/places/autocomplete")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Input is required" }));

    let (status, json) = send(app_with(None), get_request("/api/places/autocomplete?input=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Input is required" }));
}

#[tokio::test]
async fn autocomplete_without_key_is_configuration_error() {
    let (status, json) =
        send(app_with(None), get_request("/api/places/autocomplete?input=1%20Mar")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Google Places API key not configured" }));
}

#[tokio::test]
async fn autocomplete_passes_predictions_through() {
    let server = MockServer::start().await;
    let predictions = json!([
        { "description": "1 Market St, San Francisco, CA, USA", "place_id": "abc" }
    ]);
    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", "1 Mar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "predictions": predictions.clone()
        })))
        .mount(&server)
        .await;

    let (status, json) =
        send(app_for(&server), get_request("/api/places/autocomplete?input=1%20Mar")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "predictions": predictions }));
}

#[tokio::test]
async fn autocomplete_upstream_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (status, json) =
        send(app_for(&server), get_request("/api/places/autocomplete?input=1%20Mar")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Failed to get autocomplete suggestions" }));
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/places/search")
        .header("origin", ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .expect("request");
    let response = app_with(None).oneshot(request).await.expect("response");

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn cors_ignores_unlisted_origin() {
    let request = Request::builder()
        .uri("/api/health")
        .header("origin", "http://evil.example")
        .body(Body::empty())
        .expect("request");
    let response = app_with(None).oneshot(request).await.expect("response");
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}
