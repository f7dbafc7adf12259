//! HTTP client for the Local Scout gateway.

use std::time::Duration;

use anyhow::Context;
use localscout_core::{SearchRequest, SearchResponse};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteBody {
    #[serde(default)]
    predictions: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("localscout-cli/0.1")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// POST a search and decode the grouped results.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the gateway answers with
    /// a non-2xx status; the gateway's `error` message is included.
    pub async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        let url = format!("{}/places/search", self.base_url);
        tracing::debug!(url = %url, "sending search");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("could not reach gateway at {}", self.base_url))?;

        let response = ensure_success(response).await?;
        response
            .json::<SearchResponse>()
            .await
            .context("gateway returned an unreadable search response")
    }

    /// Fetch address predictions for `input`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx gateway status.
    pub async fn autocomplete(&self, input: &str) -> anyhow::Result<Vec<Value>> {
        let url = format!("{}/places/autocomplete", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("input", input)])
            .send()
            .await
            .with_context(|| format!("could not reach gateway at {}", self.base_url))?;

        let body: AutocompleteBody = ensure_success(response)
            .await?
            .json()
            .await
            .context("gateway returned an unreadable autocomplete response")?;
        Ok(body.predictions)
    }
}

async fn ensure_success(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => anyhow::bail!("{error} ({status}): {details}"),
        Ok(ErrorBody { error, .. }) => anyhow::bail!("{error} ({status})"),
        Err(_) => anyhow::bail!("gateway returned {status}"),
    }
}

/// Display text of one upstream prediction.
#[must_use]
pub fn prediction_description(prediction: &Value) -> Option<&str> {
    prediction.get("description").and_then(Value::as_str)
}
