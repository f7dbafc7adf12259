//! Merging of per-type candidate lists into one ranked subcategory group.

use std::collections::HashSet;

use crate::taxonomy::CategoryKey;
use crate::types::{CategoryResult, PlaceResult};

/// Maximum places kept per subcategory after ranking.
pub const MAX_PLACES_PER_SUBCATEGORY: usize = 10;

/// Deduplicate by name (first occurrence wins), rank by rating descending
/// with unrated places as zero, and keep the top [`MAX_PLACES_PER_SUBCATEGORY`].
///
/// The sort is stable, so equal ratings keep their query order.
#[must_use]
pub fn merge_places(candidates: Vec<PlaceResult>) -> Vec<PlaceResult> {
    let mut seen = HashSet::new();
    let mut places: Vec<PlaceResult> = candidates
        .into_iter()
        .filter(|p| seen.insert(p.name.clone()))
        .collect();

    places.sort_by(|a, b| b.rank_rating().total_cmp(&a.rank_rating()));
    places.truncate(MAX_PLACES_PER_SUBCATEGORY);
    places
}

impl CategoryResult {
    /// Build a result group from raw candidates, or `None` when nothing survives.
    #[must_use]
    pub fn from_candidates(
        category: CategoryKey,
        subcategory: &str,
        candidates: Vec<PlaceResult>,
    ) -> Option<Self> {
        let places = merge_places(candidates);
        if places.is_empty() {
            return None;
        }
        Some(Self {
            category,
            subcategory: subcategory.to_owned(),
            places,
        })
    }
}
