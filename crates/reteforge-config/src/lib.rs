//! Configuration system for ReteForge.
//!
//! Load session settings and constraint weight overrides from TOML or YAML
//! so runs can be tuned without code changes.
//!
//! # Examples
//!
//! ```
//! use reteforge_config::SessionConfig;
//! use reteforge_core::HardSoftScore;
//! use reteforge_scoring::{EnvironmentMode, UpdateMode};
//!
//! let config = SessionConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     update_mode = "in_place"
//!
//!     [constraint_weights]
//!     "roster/Overtime" = "0hard/5soft"
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.update_mode, UpdateMode::InPlace);
//!
//! let overrides = config.weight_overrides::<HardSoftScore>().unwrap();
//! assert_eq!(overrides.get("roster/Overtime"), Some(HardSoftScore::of(0, 5)));
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use reteforge_config::SessionConfig;
//!
//! let config = SessionConfig::load("session.toml").unwrap_or_default();
//! assert!(config.constraint_weights.is_empty());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use reteforge_core::{ParseableScore, Score};
use reteforge_scoring::{
    ConstraintWeightOverrides, EnvironmentMode, ScoringSession, SessionSettings, UpdateMode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scoring session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// Runtime checking done by the session.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// How fact updates are propagated.
    #[serde(default)]
    pub update_mode: UpdateMode,

    /// Weight overrides keyed by constraint id (`"package/name"`), written in
    /// the score's text form, e.g. `"0hard/-2soft"`.
    #[serde(default)]
    pub constraint_weights: BTreeMap<String, String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension:
    /// `.yaml`/`.yml` is YAML, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    /// Adds a weight override in the score's text form.
    pub fn with_constraint_weight(mut self, constraint_id: impl Into<String>, weight: impl Into<String>) -> Self {
        self.constraint_weights.insert(constraint_id.into(), weight.into());
        self
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings::new(self.environment_mode, self.update_mode)
    }

    /// Parses the configured weights.
    ///
    /// # Errors
    ///
    /// `Invalid` naming the first constraint whose weight is not a valid
    /// score of type `Sc`.
    pub fn weight_overrides<Sc: ParseableScore>(&self) -> Result<ConstraintWeightOverrides<Sc>, ConfigError> {
        ConstraintWeightOverrides::parse_pairs(
            self.constraint_weights
                .iter()
                .map(|(id, weight)| (id.as_str(), weight.as_str())),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Creates an unbuilt session with these settings.
    pub fn create_session<Sc: Score>(&self) -> ScoringSession<Sc> {
        ScoringSession::with_settings(self.settings())
    }
}
