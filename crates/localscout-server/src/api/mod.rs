mod places;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use localscout_core::{AppConfig, Taxonomy};
use localscout_places::PlacesClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, request_span, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; place routes answer 500 then.
    pub places: Option<PlacesClient>,
    pub taxonomy: Arc<Taxonomy>,
    pub query_delay_ms: u64,
}

impl AppState {
    /// Build the shared state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the places client cannot be constructed.
    pub fn from_config(config: &AppConfig, taxonomy: Arc<Taxonomy>) -> anyhow::Result<Self> {
        let places = config
            .places_api_key
            .as_deref()
            .map(|key| {
                PlacesClient::with_base_url(key, config.places_timeout_secs, &config.places_base_url)
            })
            .transpose()?;

        Ok(Self {
            places,
            taxonomy,
            query_delay_ms: config.query_delay_ms,
        })
    }
}

/// Error body shared by every route: `{ error, details? }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub code: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn missing_api_key() -> Self {
        Self::new("configuration_error", "Google Places API key not configured")
    }

    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new("internal_error", message).with_details(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/places/search", post(places::search_places))
        .route("/api/places/autocomplete", get(places::autocomplete))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(request_span)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
