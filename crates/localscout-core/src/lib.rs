mod app_config;
mod config;
pub mod merge;
pub mod taxonomy;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use merge::{merge_places, MAX_PLACES_PER_SUBCATEGORY};
pub use taxonomy::{Category, CategoryKey, CategoryToggles, Subcategory, Taxonomy};
pub use types::{
    miles_to_meters, CategoryResult, GeoPoint, InvalidRequest, PlaceResult, SearchLocation,
    SearchRequest, SearchResponse, ValidSearch, METERS_PER_MILE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read taxonomy file {path}: {source}")]
    TaxonomyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy: {0}")]
    TaxonomyParse(#[from] serde_yaml::Error),

    #[error("taxonomy validation failed: {0}")]
    Validation(String),
}
