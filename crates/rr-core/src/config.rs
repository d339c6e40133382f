//! Configuration structures for association resolution.
//!
//! - [`ResolverConfig`] - Explicit type-name overrides for class resolution
//! - [`FinderConfig`] - Behavior of the related-resource finder
//! - [`Config`] - Root configuration combining all settings
//!
//! Every structure implements [`Default`] and deserializes with
//! `#[serde(default)]`, so a configuration file only needs the keys it
//! changes.

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration for class-name resolution.
///
/// # Examples
///
/// ```
/// use rr_core::ResolverConfig;
///
/// let config = ResolverConfig::default();
/// assert!(config.type_overrides.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Explicit type-name map: a derived class name → the name of the
    /// registered class that answers for it.
    ///
    /// Consulted before the namespace, e.g. to route `Person` to
    /// `Admin::Person` when two services disagree on naming.
    pub type_overrides: BTreeMap<String, String>,
}

/// Configuration for the related-resource finder.
///
/// # Examples
///
/// ```
/// use rr_core::FinderConfig;
///
/// let config = FinderConfig::default();
/// assert!(config.use_embedded);
/// assert_eq!(config.primary_key, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Build the related resource from a nested object stored under the
    /// association name instead of fetching it, when one is present and the
    /// foreign key is set.
    pub use_embedded: bool,

    /// Attribute holding a resource's identity.
    pub primary_key: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            use_embedded: true,
            primary_key: "id".to_owned(),
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use rr_core::Config;
///
/// let config = Config::from_json_str(r#"{"finder": {"use_embedded": false}}"#).unwrap();
/// assert!(!config.finder.use_embedded);
/// assert_eq!(config.finder.primary_key, "id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Class-name resolution configuration.
    pub resolver: ResolverConfig,

    /// Finder configuration.
    pub finder: FinderConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path.as_std_path()).map_err(|e| ConfigError::read(path, e))?;
        Self::from_json_str(&contents)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.finder.primary_key.is_empty() {
            return Err(ConfigError::invalid_option(
                "finder.primary_key",
                "must not be empty",
            ));
        }

        for (name, target) in &self.resolver.type_overrides {
            if name.is_empty() || target.is_empty() {
                return Err(ConfigError::invalid_option(
                    "resolver.type_overrides",
                    format!("empty type name in '{name}' => '{target}'"),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finder_config_defaults() {
        let config = FinderConfig::default();
        assert!(config.use_embedded);
        assert_eq!(config.primary_key, "id");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config
            .resolver
            .type_overrides
            .insert("Person".to_owned(), "Admin::Person".to_owned());
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"resolver": {"type_overrides": {"Person": "Admin::Person"}}}"#;
        let config = Config::from_json_str(json).unwrap();
        assert_eq!(
            config.resolver.type_overrides.get("Person").map(String::as_str),
            Some("Admin::Person")
        );
        assert!(config.finder.use_embedded);
        assert_eq!(config.finder.primary_key, "id");
    }

    #[test]
    fn test_config_rejects_empty_primary_key() {
        let err = Config::from_json_str(r#"{"finder": {"primary_key": ""}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn test_config_rejects_empty_override() {
        let err =
            Config::from_json_str(r#"{"resolver": {"type_overrides": {"Person": ""}}}"#)
                .unwrap_err();
        assert!(err.to_string().contains("Person"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Config::from_path(Utf8Path::new("/definitely/not/here/rr.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
