//! Core configuration.
//!
//! # Responsibility
//! - Describe tunables for storage, logging and geofencing in one struct.
//! - Parse optional TOML overrides on top of built-in defaults.
//!
//! # Invariants
//! - Every field has a default, so an empty document is a valid config.
//! - Geofence radius is positive and finite after `validate()`.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Geofence radius used when nothing overrides it, in metres.
pub const DEFAULT_GEOFENCE_RADIUS_METERS: f64 = 500.0;
/// Time a device must stay inside a region before dwell-style triggers fire.
pub const DEFAULT_LOITERING_DELAY_MS: u64 = 5_000;

const DEFAULT_DB_FILE_NAME: &str = "placenote.sqlite3";

/// Geofence construction parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeofenceSettings {
    pub radius_meters: f64,
    pub loitering_delay_ms: u64,
}

impl Default for GeofenceSettings {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_GEOFENCE_RADIUS_METERS,
            loitering_delay_ms: DEFAULT_LOITERING_DELAY_MS,
        }
    }
}

/// Top-level configuration for hosts embedding the core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
    pub geofence: GeofenceSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            geofence: GeofenceSettings::default(),
        }
    }
}

/// Configuration parse/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl CoreConfig {
    /// Parses TOML text, filling omitted fields with defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.geofence.radius_meters;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "geofence.radius_meters must be a positive number, got {radius}"
            )));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DEFAULT_GEOFENCE_RADIUS_METERS, DEFAULT_LOITERING_DELAY_MS};

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.geofence.radius_meters, DEFAULT_GEOFENCE_RADIUS_METERS);
        assert_eq!(config.geofence.loitering_delay_ms, DEFAULT_LOITERING_DELAY_MS);
    }

    #[test]
    fn partial_geofence_table_keeps_other_defaults() {
        let config = CoreConfig::from_toml_str("[geofence]\nradius_meters = 120.0\n").unwrap();
        assert_eq!(config.geofence.radius_meters, 120.0);
        assert_eq!(config.geofence.loitering_delay_ms, DEFAULT_LOITERING_DELAY_MS);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let err = CoreConfig::from_toml_str("[geofence]\nradius_meters = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("radius_meters"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CoreConfig::from_toml_str("colour = \"blue\"\n").is_err());
    }
}
