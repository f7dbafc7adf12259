//! Map view model built from a search response.
//!
//! Holds everything a map widget needs to draw a result set: the search
//! center, the radius overlay, one coloured marker per place and a viewport
//! fitted to all of them.

use std::f64::consts::{LN_2, PI};

use localscout_core::{miles_to_meters, GeoPoint, SearchResponse};

/// Closest zoom the fitted viewport may use.
pub const MAX_ZOOM: u8 = 15;
pub const CENTER_COLOR: &str = "#4285f4";
pub const FALLBACK_COLOR: &str = "#666666";

const TILE_SIZE: f64 = 256.0;

/// Marker colour for a wire category name.
#[must_use]
pub fn marker_color(category: &str) -> &'static str {
    match category {
        "dailyLiving" => "#34a853",
        "food" => "#ea4335",
        "lifestyle" => "#fbbc04",
        "transportation" => "#4285f4",
        "community" => "#9c27b0",
        "healthcare" => "#ff6d00",
        _ => FALLBACK_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width_px: 1024.0,
            height_px: 768.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    #[must_use]
    pub fn around(point: GeoPoint) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    /// Largest web-mercator zoom at which the bounds fit `viewport`,
    /// capped at [`MAX_ZOOM`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit_zoom(&self, viewport: Viewport) -> u8 {
        let lat_fraction = (mercator_lat(self.north) - mercator_lat(self.south)) / PI;
        let lng_fraction = (self.east - self.west) / 360.0;

        let lat_zoom = zoom_for(viewport.height_px, lat_fraction);
        let lng_zoom = zoom_for(viewport.width_px, lng_fraction);
        // Integral and within 0..=MAX_ZOOM, so the cast is exact.
        lat_zoom.min(lng_zoom).clamp(0.0, f64::from(MAX_ZOOM)) as u8
    }
}

fn mercator_lat(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

fn zoom_for(map_px: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return f64::from(MAX_ZOOM);
    }
    (map_px / TILE_SIZE / fraction).ln().div_euclid(LN_2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub position: GeoPoint,
    pub title: String,
    pub address: String,
    pub rating: Option<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub markers: Vec<MapMarker>,
    pub bounds: Bounds,
    pub zoom: u8,
}

impl MapView {
    #[must_use]
    pub fn from_response(response: &SearchResponse, viewport: Viewport) -> Self {
        let center = response.search_location.point;
        let mut bounds = Bounds::around(center);

        let markers: Vec<MapMarker> = response
            .results
            .iter()
            .flat_map(|group| {
                let color = marker_color(group.category.as_str());
                group.places.iter().map(move |place| MapMarker {
                    position: place.location,
                    title: place.name.clone(),
                    address: place.address.clone(),
                    rating: place.rating,
                    color,
                })
            })
            .collect();

        for marker in &markers {
            bounds.extend(marker.position);
        }

        Self {
            center,
            radius_meters: miles_to_meters(response.radius),
            zoom: bounds.fit_zoom(viewport),
            markers,
            bounds,
        }
    }
}
