pub mod client;
pub mod error;
pub mod search;
pub mod throttle;
pub mod types;

pub use client::PlacesClient;
pub use error::{PlacesError, SearchError};
pub use search::{run_search, MAX_RESULTS_PER_TYPE};
pub use throttle::QueryThrottle;
pub use types::{GeocodeMatch, NearbyPlace};
