//! Static category taxonomy: six top-level categories, each an ordered list of
//! subcategories, each an ordered list of upstream place-type codes.
//!
//! The table is loaded once at startup (embedded YAML by default, or an
//! operator-supplied file) and shared read-only afterwards.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ConfigError;

const EMBEDDED_TAXONOMY: &str = include_str!("../config/taxonomy.yaml");

/// Upper bound on subcategories per category.
pub const MAX_SUBCATEGORIES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKey {
    DailyLiving,
    Food,
    Lifestyle,
    Transportation,
    Community,
    Healthcare,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 6] = [
        CategoryKey::DailyLiving,
        CategoryKey::Food,
        CategoryKey::Lifestyle,
        CategoryKey::Transportation,
        CategoryKey::Community,
        CategoryKey::Healthcare,
    ];

    /// Wire name, as used in request toggles and result groups.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::DailyLiving => "dailyLiving",
            CategoryKey::Food => "food",
            CategoryKey::Lifestyle => "lifestyle",
            CategoryKey::Transportation => "transportation",
            CategoryKey::Community => "community",
            CategoryKey::Healthcare => "healthcare",
        }
    }

    /// Human-facing heading for result lists.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CategoryKey::DailyLiving => "Daily Living & Essentials",
            CategoryKey::Food => "Food & Entertainment",
            CategoryKey::Lifestyle => "Lifestyle & Recreation",
            CategoryKey::Transportation => "Transportation & Commute",
            CategoryKey::Community => "Community & Social",
            CategoryKey::Healthcare => "Healthcare",
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = String;

    /// Accepts the wire name in any case, with or without `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        CategoryKey::ALL
            .into_iter()
            .find(|k| k.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| {
                let names: Vec<&str> = CategoryKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown category '{s}'; expected one of {}", names.join(", "))
            })
    }
}

/// Per-search category switches. Keys absent from a request body, or set to
/// `null`, are off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct CategoryToggles {
    #[serde(deserialize_with = "null_as_false")]
    pub daily_living: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub food: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub lifestyle: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub transportation: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub community: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub healthcare: bool,
}

/// An explicit `null` switch reads as off.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl CategoryToggles {
    #[must_use]
    pub fn all() -> Self {
        Self {
            daily_living: true,
            food: true,
            lifestyle: true,
            transportation: true,
            community: true,
            healthcare: true,
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn only(key: CategoryKey) -> Self {
        let mut toggles = Self::none();
        toggles.set(key, true);
        toggles
    }

    #[must_use]
    pub fn is_enabled(&self, key: CategoryKey) -> bool {
        match key {
            CategoryKey::DailyLiving => self.daily_living,
            CategoryKey::Food => self.food,
            CategoryKey::Lifestyle => self.lifestyle,
            CategoryKey::Transportation => self.transportation,
            CategoryKey::Community => self.community,
            CategoryKey::Healthcare => self.healthcare,
        }
    }

    pub fn set(&mut self, key: CategoryKey, enabled: bool) {
        let slot = match key {
            CategoryKey::DailyLiving => &mut self.daily_living,
            CategoryKey::Food => &mut self.food,
            CategoryKey::Lifestyle => &mut self.lifestyle,
            CategoryKey::Transportation => &mut self.transportation,
            CategoryKey::Community => &mut self.community,
            CategoryKey::Healthcare => &mut self.healthcare,
        };
        *slot = enabled;
    }

    /// Flip one switch and return its new state.
    pub fn toggle(&mut self, key: CategoryKey) -> bool {
        let enabled = !self.is_enabled(key);
        self.set(key, enabled);
        enabled
    }

    #[must_use]
    pub fn enabled_keys(&self) -> Vec<CategoryKey> {
        CategoryKey::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: CategoryKey,
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// The built-in table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if the embedded YAML is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(EMBEDDED_TAXONOMY)
    }

    /// Load the table from `path`, or the built-in table when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::embedded();
        };
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a taxonomy document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document does not parse or fails validation.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let taxonomy: Taxonomy = serde_yaml::from_str(content)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Subcategories of every enabled category, in table order.
    pub fn enabled<'a>(
        &'a self,
        toggles: &'a CategoryToggles,
    ) -> impl Iterator<Item = (CategoryKey, &'a Subcategory)> + 'a {
        self.categories
            .iter()
            .filter(|c| toggles.is_enabled(c.key))
            .flat_map(|c| c.subcategories.iter().map(move |s| (c.key, s)))
    }

    /// Number of nearby-place queries a search with `toggles` will issue.
    #[must_use]
    pub fn total_queries(&self, toggles: &CategoryToggles) -> usize {
        self.enabled(toggles).map(|(_, s)| s.types.len()).sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen_keys = HashSet::new();

        for category in &self.categories {
            if !seen_keys.insert(category.key) {
                return Err(ConfigError::Validation(format!(
                    "duplicate category: '{}'",
                    category.key
                )));
            }

            let count = category.subcategories.len();
            if count == 0 || count > MAX_SUBCATEGORIES {
                return Err(ConfigError::Validation(format!(
                    "category '{}' has {count} subcategories; must have 1 to {MAX_SUBCATEGORIES}",
                    category.key
                )));
            }

            let mut seen_names = HashSet::new();
            for sub in &category.subcategories {
                if sub.name.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "category '{}' has a subcategory with an empty name",
                        category.key
                    )));
                }
                if !seen_names.insert(sub.name.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate subcategory '{}' in category '{}'",
                        sub.name, category.key
                    )));
                }
                if sub.types.is_empty() || sub.types.iter().any(|t| t.trim().is_empty()) {
                    return Err(ConfigError::Validation(format!(
                        "subcategory '{}' must list at least one non-empty place type",
                        sub.name
                    )));
                }
            }
        }

        if let Some(missing) = CategoryKey::ALL.iter().find(|k| !seen_keys.contains(*k)) {
            return Err(ConfigError::Validation(format!(
                "missing category: '{missing}'"
            )));
        }

        Ok(())
    }
}
