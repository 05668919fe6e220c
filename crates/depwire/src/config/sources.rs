/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the named environment variable
    EnvVar(String),
    /// Built-in default, rendered as text
    Default(String),
    /// Read from the named YAML document
    File(String),
    /// Set in code
    Programmatic,
}

impl ConfigSource {
    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ConfigSource::File(_))
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::EnvVar(var) => write!(f, "environment variable {}", var),
            ConfigSource::Default(value) => write!(f, "default ({})", value),
            ConfigSource::File(origin) => write!(f, "YAML document {}", origin),
            ConfigSource::Programmatic => f.write_str("set in code"),
        }
    }
}
