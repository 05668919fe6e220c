use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Trait for validating configuration values
pub trait ConfigValidator<T> {
    /// Validate a configuration value
    fn validate(&self, value: &T) -> Result<(), ConfigError>;
}

/// Bounds check for an integer setting
pub struct RangeValidator {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

impl ConfigValidator<usize> for RangeValidator {
    fn validate(&self, value: &usize) -> Result<(), ConfigError> {
        if *value < self.min || *value > self.max {
            return Err(ConfigError::invalid_value(
                self.field,
                value.to_string(),
                format!("value between {} and {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}
