use thiserror::Error;

/// Errors returned by the places web-service client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a status other than `OK`/`ZERO_RESULTS`.
    #[error("places API {operation} returned {status}: {message}")]
    Api {
        operation: &'static str,
        status: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Hard failures that abort a whole search.
///
/// Individual nearby-query failures never surface here; they are logged and
/// skipped inside [`crate::run_search`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("address not found: {address}")]
    AddressNotFound { address: String },

    #[error("geocoding failed: {0}")]
    Geocode(#[source] PlacesError),
}
