//! TOML-based simulator configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level simulator configuration parsed from TOML.
///
/// All fields have defaults matching the reference rural-microgrid setup.
/// Load from TOML with [`SimulatorConfig::from_toml_file`] or use
/// [`SimulatorConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Database location.
    pub database: DatabaseConfig,
    /// Collection loop timing.
    pub collection: CollectionConfig,
    /// The fixed set of simulated entities.
    pub entities: EntityConfig,
}

/// Database location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "microgrid_data.db".to_string(),
        }
    }
}

/// Collection loop timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Seconds between collection cycles (must be > 0).
    pub interval_secs: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// The fixed set of simulated entities. Identifiers are small closed lists,
/// not independently managed records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityConfig {
    /// Solar panel identifiers.
    pub panel_ids: Vec<String>,
    /// Weather station location name.
    pub location: String,
    /// Household identifiers.
    pub household_ids: Vec<String>,
    /// Battery bank identifiers.
    pub battery_ids: Vec<String>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            panel_ids: vec![
                "PANEL_001".to_string(),
                "PANEL_002".to_string(),
                "PANEL_003".to_string(),
            ],
            location: "Rural_Community_A".to_string(),
            household_ids: vec![
                "HH_001".to_string(),
                "HH_002".to_string(),
                "HH_003".to_string(),
                "HH_004".to_string(),
                "HH_005".to_string(),
            ],
            battery_ids: vec!["BAT_001".to_string(), "BAT_002".to_string()],
        }
    }
}

impl EntityConfig {
    /// Number of rows one collection cycle writes per table:
    /// `(solar, weather, consumption, battery)`.
    pub fn rows_per_cycle(&self) -> (usize, usize, usize, usize) {
        (
            self.panel_ids.len(),
            1,
            self.household_ids.len(),
            self.battery_ids.len(),
        )
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"collection.interval_secs"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl SimulatorConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.database.path.is_empty() {
            errors.push(ConfigError {
                field: "database.path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.collection.interval_secs == 0 {
            errors.push(ConfigError {
                field: "collection.interval_secs".into(),
                message: "must be > 0".into(),
            });
        }

        let e = &self.entities;
        if e.panel_ids.is_empty() {
            errors.push(ConfigError {
                field: "entities.panel_ids".into(),
                message: "must list at least one panel".into(),
            });
        }
        if e.location.is_empty() {
            errors.push(ConfigError {
                field: "entities.location".into(),
                message: "must not be empty".into(),
            });
        }
        if e.household_ids.is_empty() {
            errors.push(ConfigError {
                field: "entities.household_ids".into(),
                message: "must list at least one household".into(),
            });
        }
        if e.battery_ids.is_empty() {
            errors.push(ConfigError {
                field: "entities.battery_ids".into(),
                message: "must list at least one battery".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimulatorConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn default_entity_counts_match_reference_setup() {
        let cfg = SimulatorConfig::default();
        assert_eq!(cfg.entities.rows_per_cycle(), (3, 1, 5, 2));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[database]
path = "override.db"

[collection]
interval_secs = 15

[entities]
panel_ids = ["P1", "P2"]
location = "Test_Site"
household_ids = ["H1"]
battery_ids = ["B1"]
"#;
        let cfg = SimulatorConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.collection.interval_secs), Some(15));
        assert_eq!(cfg.as_ref().map(|c| c.entities.panel_ids.len()), Some(2));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[collection]
interval_secs = 60
bogus_field = true
"#;
        let result = SimulatorConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[collection]
interval_secs = 5
"#;
        let cfg = SimulatorConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.collection.interval_secs), Some(5));
        // entities kept default
        assert_eq!(cfg.as_ref().map(|c| c.entities.panel_ids.len()), Some(3));
        assert_eq!(
            cfg.as_ref().map(|c| c.database.path.as_str()),
            Some("microgrid_data.db")
        );
    }

    #[test]
    fn validation_catches_zero_interval() {
        let mut cfg = SimulatorConfig::default();
        cfg.collection.interval_secs = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "collection.interval_secs"));
    }

    #[test]
    fn validation_catches_empty_entity_lists() {
        let mut cfg = SimulatorConfig::default();
        cfg.entities.panel_ids.clear();
        cfg.entities.household_ids.clear();
        cfg.entities.battery_ids.clear();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "entities.panel_ids"));
        assert!(errors.iter().any(|e| e.field == "entities.household_ids"));
        assert!(errors.iter().any(|e| e.field == "entities.battery_ids"));
    }

    #[test]
    fn validation_catches_empty_location() {
        let mut cfg = SimulatorConfig::default();
        cfg.entities.location.clear();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "entities.location"));
    }
}
