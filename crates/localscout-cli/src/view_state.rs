//! Presentation state for one CLI session.
//!
//! Settings, history and the in-flight guard live here instead of in
//! process-wide globals; the shell owns exactly one `ViewState`.

use chrono::{DateTime, Utc};
use localscout_core::{CategoryKey, CategoryToggles, SearchRequest};

pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub radius: f64,
    pub categories: CategoryToggles,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS_MILES,
            categories: CategoryToggles::all(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub address: String,
    pub searched_at: DateTime<Utc>,
}

/// Why a search could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBlocked {
    EmptyAddress,
    AlreadySearching,
}

impl std::fmt::Display for SearchBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchBlocked::EmptyAddress => f.write_str("Please enter an address"),
            SearchBlocked::AlreadySearching => f.write_str("A search is already in progress"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub settings: SearchSettings,
    history: Vec<HistoryEntry>,
    is_searching: bool,
}

impl ViewState {
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            is_searching: false,
        }
    }

    /// Update the radius; non-positive or non-finite values are refused.
    ///
    /// # Errors
    ///
    /// Returns an error naming the rejected value.
    pub fn set_radius(&mut self, radius: f64) -> anyhow::Result<()> {
        if !radius.is_finite() || radius <= 0.0 {
            anyhow::bail!("radius must be a positive number of miles, got {radius}");
        }
        self.settings.radius = radius;
        Ok(())
    }

    /// Flip one category and return its new state.
    pub fn toggle(&mut self, key: CategoryKey) -> bool {
        self.settings.categories.toggle(key)
    }

    /// Claim the in-flight slot and build the request for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchBlocked`] for a blank address or while another search
    /// is still running.
    pub fn begin_search(&mut self, address: &str) -> Result<SearchRequest, SearchBlocked> {
        let address = address.trim();
        if address.is_empty() {
            return Err(SearchBlocked::EmptyAddress);
        }
        if self.is_searching {
            return Err(SearchBlocked::AlreadySearching);
        }
        self.is_searching = true;
        Ok(SearchRequest::new(
            address,
            self.settings.radius,
            self.settings.categories,
        ))
    }

    /// Release the in-flight slot. Only successful searches enter history.
    pub fn finish_search(&mut self, address: &str, succeeded: bool) {
        self.is_searching = false;
        if succeeded {
            self.history.push(HistoryEntry {
                address: address.trim().to_owned(),
                searched_at: Utc::now(),
            });
        }
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}
