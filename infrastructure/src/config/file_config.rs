//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file and
//! convert into the domain/application config types where appropriate.

use serde::{Deserialize, Serialize};

use tablepick_application::BehaviorConfig;
use tablepick_domain::SearchFilters;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Places search refinement
    pub filters: FileFiltersConfig,
    /// Flow behavior settings
    pub behavior: FileBehaviorConfig,
    /// Places service settings
    pub places: FilePlacesConfig,
    /// Local user profile
    pub profile: FileProfileConfig,
}

/// `[filters]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFiltersConfig {
    pub radius_meters: Option<u32>,
    pub cuisine: Option<Vec<String>>,
    pub price_levels: Option<Vec<u8>>,
    pub open_now: Option<bool>,
    pub min_rating: Option<f32>,
}

impl FileFiltersConfig {
    /// Apply the configured overrides on top of the filter defaults.
    pub fn to_filters(&self) -> SearchFilters {
        let defaults = SearchFilters::default();
        SearchFilters {
            radius_meters: self.radius_meters.unwrap_or(defaults.radius_meters),
            cuisine: self.cuisine.clone().unwrap_or(defaults.cuisine),
            price_levels: self.price_levels.clone().unwrap_or(defaults.price_levels),
            open_now: self.open_now.unwrap_or(defaults.open_now),
            min_rating: self.min_rating.unwrap_or(defaults.min_rating),
        }
    }
}

/// `[behavior]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    pub deck_size: Option<usize>,
    pub max_tie_rounds: Option<u32>,
}

impl FileBehaviorConfig {
    pub fn to_behavior(&self) -> BehaviorConfig {
        let defaults = BehaviorConfig::default();
        BehaviorConfig {
            deck_size: self.deck_size.unwrap_or(defaults.deck_size),
            max_tie_rounds: self.max_tie_rounds.unwrap_or(defaults.max_tie_rounds),
        }
    }
}

/// `[places]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlacesConfig {
    /// API key for the places service. Also settable via
    /// `TABLEPICK_PLACES__API_KEY`.
    pub api_key: Option<String>,
}

/// `[profile]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfileConfig {
    /// Display name shown to other participants.
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[filters]
radius_meters = 800
cuisine = ["thai", "ramen"]
open_now = true
min_rating = 4.0

[behavior]
deck_size = 15
max_tie_rounds = 5

[places]
api_key = "key-123"

[profile]
display_name = "Ana"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let filters = config.filters.to_filters();
        assert_eq!(filters.radius_meters, 800);
        assert_eq!(filters.cuisine, vec!["thai", "ramen"]);
        assert!(filters.open_now);
        // Unset fields keep their defaults
        assert_eq!(filters.price_levels, vec![1, 2, 3, 4]);

        let behavior = config.behavior.to_behavior();
        assert_eq!(behavior.deck_size, 15);
        assert_eq!(behavior.max_tie_rounds, 5);

        assert_eq!(config.places.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.profile.display_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[behavior]
deck_size = 20
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.behavior.to_behavior().deck_size, 20);
        assert_eq!(config.behavior.to_behavior().max_tie_rounds, 25);
        assert!(config.places.api_key.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.filters.to_filters(), SearchFilters::default());
        assert_eq!(config.behavior.to_behavior(), BehaviorConfig::default());
        assert!(config.profile.display_name.is_none());
    }
}
