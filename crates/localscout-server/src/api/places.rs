use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use localscout_core::{InvalidRequest, SearchRequest, SearchResponse};
use localscout_places::{run_search, PlacesClient, QueryThrottle, SearchError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteQuery {
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AutocompleteResponse {
    pub predictions: Vec<Value>,
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = parse_search_body(payload)?;
    let search = request
        .validate()
        .map_err(|e| ApiError::bad_request(e.message()))?;

    let client = places_client(&state, &req_id)?;
    let mut throttle = QueryThrottle::from_millis(state.query_delay_ms);

    match run_search(client, &state.taxonomy, &search, &mut throttle).await {
        Ok(response) => {
            tracing::info!(
                request_id = %req_id.0,
                groups = response.results.len(),
                places = response.place_count(),
                "search served"
            );
            Ok(Json(response))
        }
        Err(SearchError::AddressNotFound { address }) => {
            tracing::info!(request_id = %req_id.0, address = %address, "address not found");
            Err(ApiError::not_found("Address not found"))
        }
        Err(e) => {
            let details = e.to_string();
            tracing::error!(request_id = %req_id.0, error = %details, "search failed");
            Err(ApiError::internal("Failed to search places", details))
        }
    }
}

pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<AutocompleteQuery>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let input = params
        .input
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Input is required"))?;

    let client = places_client(&state, &req_id)?;

    match client.autocomplete(&input).await {
        Ok(predictions) => Ok(Json(AutocompleteResponse { predictions })),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "autocomplete failed");
            Err(ApiError::new(
                "internal_error",
                "Failed to get autocomplete suggestions",
            ))
        }
    }
}

/// Turn the raw body into a [`SearchRequest`].
///
/// The address is checked before the body is shaped into the typed request,
/// so a blank address is reported as such whatever the other fields hold.
fn parse_search_body(payload: Result<Json<Value>, JsonRejection>) -> Result<SearchRequest, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        ApiError::bad_request("Invalid request body").with_details(rejection.body_text())
    })?;

    let has_address = body
        .get("address")
        .and_then(Value::as_str)
        .is_some_and(|a| !a.trim().is_empty());
    if !has_address {
        return Err(ApiError::bad_request(InvalidRequest::MissingAddress.message()));
    }

    serde_json::from_value(body).map_err(|e| {
        ApiError::bad_request("Invalid request body").with_details(e.to_string())
    })
}

fn places_client<'a>(state: &'a AppState, req_id: &RequestId) -> Result<&'a PlacesClient, ApiError> {
    state.places.as_ref().ok_or_else(|| {
        tracing::error!(request_id = %req_id.0, "GOOGLE_PLACES_API_KEY is not configured");
        ApiError::missing_api_key()
    })
}
