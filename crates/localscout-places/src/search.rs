//! Search aggregation: geocode once, then walk the enabled taxonomy issuing
//! one nearby query per place type, strictly in sequence.

use localscout_core::{
    miles_to_meters, CategoryKey, CategoryResult, GeoPoint, PlaceResult, SearchLocation,
    SearchResponse, Subcategory, Taxonomy, ValidSearch,
};

use crate::client::PlacesClient;
use crate::error::SearchError;
use crate::throttle::QueryThrottle;

/// Raw records considered from each nearby-query response.
pub const MAX_RESULTS_PER_TYPE: usize = 5;

/// Run a full search for a validated request.
///
/// Per-type query failures are logged and contribute nothing; only geocoding
/// failures abort. The throttle is applied after every nearby query.
///
/// # Errors
///
/// - [`SearchError::AddressNotFound`] when geocoding yields no match.
/// - [`SearchError::Geocode`] when the geocoding call itself fails.
pub async fn run_search(
    client: &PlacesClient,
    taxonomy: &Taxonomy,
    search: &ValidSearch<'_>,
    throttle: &mut QueryThrottle,
) -> Result<SearchResponse, SearchError> {
    tracing::debug!(address = search.address, "geocoding address");

    let geocoded = client
        .geocode(search.address)
        .await
        .map_err(SearchError::Geocode)?
        .ok_or_else(|| SearchError::AddressNotFound {
            address: search.address.to_owned(),
        })?;

    let center = geocoded.location;
    let radius_meters = miles_to_meters(search.radius_miles);
    let planned_queries = taxonomy.total_queries(search.categories);

    tracing::info!(
        lat = center.lat,
        lng = center.lng,
        radius_meters,
        categories = ?search.categories.enabled_keys(),
        planned_queries,
        query_delay = ?throttle.delay(),
        min_pacing = ?throttle.minimum_pacing(planned_queries),
        "starting nearby search"
    );

    let mut results = Vec::new();
    for (category, subcategory) in taxonomy.enabled(search.categories) {
        let candidates =
            collect_subcategory(client, center, radius_meters, category, subcategory, throttle)
                .await;
        if let Some(group) = CategoryResult::from_candidates(category, &subcategory.name, candidates)
        {
            results.push(group);
        }
    }

    tracing::info!(
        groups = results.len(),
        queries = throttle.completed(),
        "search completed"
    );

    Ok(SearchResponse {
        search_location: SearchLocation {
            point: center,
            formatted_address: geocoded.formatted_address,
        },
        radius: search.radius_miles,
        results,
    })
}

/// Query every type of one subcategory and gather the usable records.
async fn collect_subcategory(
    client: &PlacesClient,
    center: GeoPoint,
    radius_meters: f64,
    category: CategoryKey,
    subcategory: &Subcategory,
    throttle: &mut QueryThrottle,
) -> Vec<PlaceResult> {
    let mut candidates = Vec::new();

    for place_type in &subcategory.types {
        match client.nearby(center, radius_meters, place_type).await {
            Ok(raw) => {
                let found = raw.len();
                candidates.extend(
                    raw.into_iter()
                        .take(MAX_RESULTS_PER_TYPE)
                        .filter_map(crate::types::NearbyPlace::into_place_result),
                );
                tracing::debug!(
                    category = %category,
                    subcategory = %subcategory.name,
                    place_type = %place_type,
                    found,
                    "nearby query finished"
                );
            }
            Err(e) => {
                tracing::warn!(
                    category = %category,
                    subcategory = %subcategory.name,
                    place_type = %place_type,
                    error = %e,
                    "nearby query failed; skipping type"
                );
            }
        }
        throttle.after_query().await;
    }

    candidates
}
