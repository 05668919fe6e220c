use crate::config::ConfigError;
use crate::container::key::{ResolutionPath, TypeKey};
use thiserror::Error;

/// Error type for registration and resolution
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No provider is registered for {key}")]
    ProviderNotFound { key: TypeKey },

    #[error("Circular dependency detected: {path} -> {cycle_at}")]
    CircularDependency {
        path: ResolutionPath,
        cycle_at: TypeKey,
    },

    #[error("No unique #[inject] constructor on {implementation} (found {found})")]
    InjectConstructorNotFound {
        implementation: &'static str,
        found: usize,
    },

    #[error("Provider for {key} produced a value of a different type")]
    TypeMismatch { key: TypeKey },

    #[error("Resolution of {key} exceeds the maximum depth of {limit}")]
    DepthLimitExceeded { key: TypeKey, limit: usize },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContainerError {
    /// Create a new provider not found error
    pub fn provider_not_found(key: TypeKey) -> Self {
        Self::ProviderNotFound { key }
    }

    /// Create a new circular dependency error
    pub fn circular_dependency(path: ResolutionPath, cycle_at: TypeKey) -> Self {
        Self::CircularDependency { path, cycle_at }
    }

    /// Create a new inject constructor error for an implementation type
    pub fn inject_constructor_not_found<T: ?Sized>(found: usize) -> Self {
        Self::InjectConstructorNotFound {
            implementation: std::any::type_name::<T>(),
            found,
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(key: TypeKey) -> Self {
        Self::TypeMismatch { key }
    }

    /// Check if the error is a missing provider
    pub fn is_provider_not_found(&self) -> bool {
        matches!(self, Self::ProviderNotFound { .. })
    }

    /// Check if the error is a dependency cycle
    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// Check if the error is a registration-time constructor error
    pub fn is_inject_constructor_not_found(&self) -> bool {
        matches!(self, Self::InjectConstructorNotFound { .. })
    }

    /// Check if the error is a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// The key this error is about, when there is one
    pub fn key(&self) -> Option<&TypeKey> {
        match self {
            Self::ProviderNotFound { key }
            | Self::TypeMismatch { key }
            | Self::DepthLimitExceeded { key, .. } => Some(key),
            Self::CircularDependency { cycle_at, .. } => Some(cycle_at),
            Self::InjectConstructorNotFound { .. } | Self::Configuration(_) | Self::Json(_) => {
                None
            }
        }
    }
}
