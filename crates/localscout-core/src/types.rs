//! Wire types shared by the gateway and its clients.
//!
//! Field names serialize in camelCase to match the JSON contract consumed by
//! the map/list front ends.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{CategoryKey, CategoryToggles};

/// Conversion factor used for the upstream query radius and the map overlay.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Convert a radius in miles to meters.
#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /api/places/search`.
///
/// Every field is optional at the parser level so that validation can report
/// the missing address before anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub categories: CategoryToggles,
}

/// A search request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSearch<'a> {
    pub address: &'a str,
    pub radius_miles: f64,
    pub categories: &'a CategoryToggles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRequest {
    MissingAddress,
    InvalidRadius,
}

impl InvalidRequest {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            InvalidRequest::MissingAddress => "Address is required",
            InvalidRequest::InvalidRadius => "Radius must be a positive number of miles",
        }
    }
}

impl std::fmt::Display for InvalidRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl SearchRequest {
    #[must_use]
    pub fn new(address: impl Into<String>, radius: f64, categories: CategoryToggles) -> Self {
        Self {
            address: Some(address.into()),
            radius: Some(radius),
            categories,
        }
    }

    /// Check the request in contract order: address first, then radius.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequest`] naming the first field that fails.
    pub fn validate(&self) -> Result<ValidSearch<'_>, InvalidRequest> {
        let address = self
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or(InvalidRequest::MissingAddress)?;

        let radius_miles = self
            .radius
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or(InvalidRequest::InvalidRadius)?;

        Ok(ValidSearch {
            address,
            radius_miles,
            categories: &self.categories,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResult {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        default,
        rename = "userRatingsTotal",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating_count: Option<u32>,
    pub location: GeoPoint,
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceResult {
    /// Placeholder used when the upstream record carries no vicinity.
    pub const MISSING_ADDRESS: &'static str = "Address not available";

    /// Rating used for ranking; unrated places rank as zero.
    #[must_use]
    pub fn rank_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: CategoryKey,
    pub subcategory: String,
    pub places: Vec<PlaceResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLocation {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub formatted_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_location: SearchLocation,
    /// Radius as requested, in miles.
    pub radius: f64,
    pub results: Vec<CategoryResult>,
}

impl SearchResponse {
    #[must_use]
    pub fn place_count(&self) -> usize {
        self.results.iter().map(|r| r.places.len()).sum()
    }
}
