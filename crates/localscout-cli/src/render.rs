//! Plain-text rendering for search results, the map summary and the taxonomy.

use std::fmt;

use localscout_core::{CategoryKey, CategoryResult, PlaceResult, SearchResponse, Taxonomy};

use crate::map::{MapView, CENTER_COLOR};
use crate::view_state::{SearchSettings, ViewState};

const NO_RESULTS: &str = "No places found\n\
    Try increasing your search radius or enabling more categories\n";

/// `★ 4.5 (123)` for rated places; `None` when there is no rating to show.
#[must_use]
pub fn format_rating(place: &PlaceResult) -> Option<String> {
    place
        .rating
        .filter(|r| *r > 0.0)
        .map(|r| format!("\u{2605} {r:.1} ({})", place.rating_count.unwrap_or(0)))
}

/// Group results by category in first-seen order.
fn group_by_category(results: &[CategoryResult]) -> Vec<(CategoryKey, Vec<&CategoryResult>)> {
    let mut groups: Vec<(CategoryKey, Vec<&CategoryResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(key, _)| *key == result.category) {
            Some((_, members)) => members.push(result),
            None => groups.push((result.category, vec![result])),
        }
    }
    groups
}

/// Search results grouped by category, with per-category place counts.
pub struct ResultsList<'a>(pub &'a SearchResponse);

impl fmt::Display for ResultsList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.0;
        if response.results.is_empty() {
            return f.write_str(NO_RESULTS);
        }

        writeln!(f, "{}", response.search_location.formatted_address)?;
        writeln!(f, "Search radius: {} miles", response.radius)?;

        for (category, members) in group_by_category(&response.results) {
            let count: usize = members.iter().map(|m| m.places.len()).sum();
            writeln!(f)?;
            writeln!(f, "{} ({count})", category.label())?;

            for member in members {
                writeln!(f, "  {}", member.subcategory)?;
                for place in &member.places {
                    writeln!(f, "    {}", place.name)?;
                    writeln!(f, "      {}", place.address)?;
                    if let Some(rating) = format_rating(place) {
                        writeln!(f, "      {rating}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct MapSummary<'a>(pub &'a MapView);

impl fmt::Display for MapSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(
            f,
            "Map: center {:.5},{:.5} ({CENTER_COLOR}), zoom {}, radius overlay {:.0} m",
            view.center.lat, view.center.lng, view.zoom, view.radius_meters
        )?;
        writeln!(
            f,
            "Bounds: S {:.5} W {:.5} N {:.5} E {:.5}",
            view.bounds.south, view.bounds.west, view.bounds.north, view.bounds.east
        )?;
        for marker in &view.markers {
            let rating = marker
                .rating
                .map(|r| format!(" \u{2605} {r:.1}"))
                .unwrap_or_default();
            writeln!(
                f,
                "  [{}] {:.5},{:.5} {} - {}{rating}",
                marker.color, marker.position.lat, marker.position.lng, marker.title, marker.address
            )?;
        }
        Ok(())
    }
}

pub struct TaxonomyList<'a>(pub &'a Taxonomy);

impl fmt::Display for TaxonomyList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.0.categories() {
            writeln!(f, "{} [{}]", category.key.label(), category.key)?;
            for sub in &category.subcategories {
                writeln!(f, "  {}: {}", sub.name, sub.types.join(", "))?;
            }
        }
        Ok(())
    }
}

pub struct SettingsView<'a>(pub &'a SearchSettings);

impl fmt::Display for SettingsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.0;
        writeln!(f, "radius: {} miles", settings.radius)?;
        for key in CategoryKey::ALL {
            let mark = if settings.categories.is_enabled(key) { "x" } else { " " };
            writeln!(f, "  [{mark}] {key} ({})", key.label())?;
        }
        Ok(())
    }
}

pub struct HistoryView<'a>(pub &'a ViewState);

impl fmt::Display for HistoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self.0.history();
        if history.is_empty() {
            return f.write_str("no searches yet\n");
        }
        for entry in history {
            writeln!(
                f,
                "{}  {}",
                entry.searched_at.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.address
            )?;
        }
        Ok(())
    }
}
