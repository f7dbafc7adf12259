//! Response shapes of the geocode, nearby-search and autocomplete web services.
//!
//! Only the fields the gateway reads are modeled; everything is lenient so a
//! partial upstream record never fails a whole response.

use localscout_core::{GeoPoint, PlaceResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Field-level leniency: a value of the wrong shape reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

/// Record-level leniency: entries that are not objects are skipped.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Kept raw so the first match stays first even when it is malformed.
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GeocodeResult {
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<Geometry>,
}

impl GeocodeResult {
    /// Read one raw geocoding result; anything unusable yields `None`.
    pub(crate) fn into_match(raw: Value) -> Option<GeocodeMatch> {
        let result: GeocodeResult = serde_json::from_value(raw).ok()?;
        let location = result.geometry.and_then(|g| g.location)?;
        Some(GeocodeMatch {
            location,
            formatted_address: result.formatted_address.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Geometry {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub results: Vec<NearbyPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<serde_json::Value>,
}

/// The authoritative (first) geocoding match for an address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub location: GeoPoint,
    pub formatted_address: String,
}

/// One raw record from a nearby-search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyPlace {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vicinity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_ratings_total: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub types: Option<Vec<String>>,
}

impl NearbyPlace {
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        self.geometry.as_ref().and_then(|g| g.location)
    }

    /// Convert to the gateway's place shape.
    ///
    /// Records without a location or a non-empty name are dropped.
    #[must_use]
    pub fn into_place_result(self) -> Option<PlaceResult> {
        let location = self.location()?;
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(PlaceResult {
            name,
            address: self
                .vicinity
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| PlaceResult::MISSING_ADDRESS.to_owned()),
            rating: self.rating,
            rating_count: self.user_ratings_total,
            location,
            types: self.types.unwrap_or_default(),
        })
    }
}
