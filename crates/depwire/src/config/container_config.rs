use crate::config::{ConfigError, ConfigSource, ConfigValidator, RangeValidator};
use crate::container::resolver::DEFAULT_MAX_DEPTH;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// Environment variable overriding [`ContainerConfig::max_depth`]
pub const MAX_DEPTH_ENV: &str = "DEPWIRE_MAX_DEPTH";

/// Largest accepted resolution depth
pub const MAX_DEPTH_CEILING: usize = 4096;

/// Configuration trait for loadable settings
pub trait ConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Container settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Maximum number of injected providers in flight during one resolution
    pub max_depth: usize,
    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl ContainerConfig {
    pub fn new() -> Self {
        let mut sources = HashMap::new();
        sources.insert(
            "max_depth".to_string(),
            ConfigSource::Default(DEFAULT_MAX_DEPTH.to_string()),
        );
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sources,
        }
    }

    /// Set the maximum resolution depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self.sources
            .insert("max_depth".to_string(), ConfigSource::Programmatic);
        self
    }

    /// Parse configuration from a YAML document. `origin` names the document
    /// in [`ConfigTrait::config_sources`].
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        // an empty document means "all defaults"
        let mut document = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
        if !yaml.trim().is_empty() {
            let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
            if !parsed.is_null() {
                document = parsed;
            }
        }
        let sets_max_depth = document.get("max_depth").is_some();

        let mut config: Self = serde_yaml::from_value(document)?;
        config.sources = Self::new().sources;
        if sets_max_depth {
            config
                .sources
                .insert("max_depth".to_string(), ConfigSource::File(origin.to_string()));
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTrait for ContainerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(depth_str) = env::var(MAX_DEPTH_ENV) {
            config.max_depth = depth_str.trim().parse().map_err(|_| {
                ConfigError::invalid_value("max_depth", depth_str.clone(), "positive integer")
            })?;
            config.sources.insert(
                "max_depth".to_string(),
                ConfigSource::EnvVar(MAX_DEPTH_ENV.to_string()),
            );
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        RangeValidator {
            field: "max_depth",
            min: 1,
            max: MAX_DEPTH_CEILING,
        }
        .validate(&self.max_depth)
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        self.sources.clone()
    }
}
