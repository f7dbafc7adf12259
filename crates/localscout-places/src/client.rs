//! HTTP client for the geocoding and places web services.
//!
//! Wraps `reqwest` with API key management and typed response
//! deserialization. Every endpoint answers HTTP 200 with a `"status"` field;
//! anything other than `OK` or `ZERO_RESULTS` surfaces as [`PlacesError::Api`].

use std::time::Duration;

use localscout_core::GeoPoint;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::types::{
    AutocompleteResponse, GeocodeMatch, GeocodeResponse, GeocodeResult, NearbyPlace,
    NearbySearchResponse,
};

const GEOCODE_PATH: &str = "geocode/json";
const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";
const AUTOCOMPLETE_PATH: &str = "place/autocomplete/json";

/// Client for the geocode / nearby-search / autocomplete endpoints.
///
/// Callers supply the base URL: the configured production root, or a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client for the web services rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("localscout/0.1 (places-gateway)")
            .build()?;

        // Exactly one trailing slash so that joining endpoint paths appends
        // rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves an address to its first geocoding match.
    ///
    /// Returns `Ok(None)` when the service finds no match.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if the service returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeMatch>, PlacesError> {
        let url = self.build_url(GEOCODE_PATH, &[("address", address)])?;
        let body: GeocodeResponse = self.request_json(&url, "geocode").await?;
        check_status("geocode", &body.status, body.error_message.as_deref())?;

        Ok(body.results.into_iter().next().and_then(GeocodeResult::into_match))
    }

    /// Runs a nearby search for one place type around `center`.
    ///
    /// Returns the raw records in upstream order; callers decide how many to
    /// keep and which are usable.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if the service returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_meters: f64,
        place_type: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesError> {
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_meters.to_string();
        let url = self.build_url(
            NEARBY_SEARCH_PATH,
            &[
                ("location", &location),
                ("radius", &radius),
                ("type", place_type),
            ],
        )?;
        let body: NearbySearchResponse = self.request_json(&url, "nearbysearch").await?;
        check_status("nearbysearch", &body.status, body.error_message.as_deref())?;
        Ok(body.results)
    }

    /// Fetches address predictions for free-text `input`.
    ///
    /// Predictions are returned as raw JSON so the gateway can pass them
    /// through unmodified.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if the service returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn autocomplete(&self, input: &str) -> Result<Vec<serde_json::Value>, PlacesError> {
        let url = self.build_url(AUTOCOMPLETE_PATH, &[("input", input)])?;
        let body: AutocompleteResponse = self.request_json(&url, "autocomplete").await?;
        check_status("autocomplete", &body.status, body.error_message.as_deref())?;
        Ok(body.predictions)
    }

    /// Builds the endpoint URL with percent-encoded query parameters, key last.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
    ///
    /// The URL carries the API key, so error contexts name the operation
    /// instead of the URL.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        operation: &str,
    ) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let response = response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: operation.to_owned(),
            source: e,
        })
    }
}

/// `OK` and `ZERO_RESULTS` are success; every other status is an API error.
fn check_status(
    operation: &'static str,
    status: &str,
    error_message: Option<&str>,
) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(PlacesError::Api {
            operation,
            status: other.to_owned(),
            message: error_message.unwrap_or("no error message").to_owned(),
        }),
    }
}
