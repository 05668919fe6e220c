use std::sync::Arc;

use crate::config::{ConfigTrait, ContainerConfig};
use crate::container::autowiring::Injectable;
use crate::container::lifetime::Lifetime;
use crate::container::Container;
use crate::errors::ContainerError;

/// Builder for constructing containers whose wiring is checked up front
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Use the given configuration, rejecting it if it does not validate
    pub fn with_config(mut self, config: ContainerConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        self.container.set_config(config);
        Ok(self)
    }

    /// Add a fixed value
    pub fn add_instance<T>(mut self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.register_instance(value);
        self
    }

    /// Add a shared value built on first request
    pub fn add_singleton<T, F>(mut self, produce: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.container
            .register_factory_with(Lifetime::Singleton, produce);
        self
    }

    /// Add a value built on every request
    pub fn add_transient<T, F>(mut self, produce: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.container.register_factory(produce);
        self
    }

    /// Bind `I` to constructor injection of `Impl`
    pub fn add_injected<I, Impl>(
        mut self,
        upcast: fn(Arc<Impl>) -> Arc<I>,
    ) -> Result<Self, ContainerError>
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Injectable,
    {
        self.container.register_injected::<I, Impl>(upcast)?;
        Ok(self)
    }

    /// Bind an injectable type to itself
    pub fn add_type<T: Injectable>(mut self) -> Result<Self, ContainerError> {
        self.container.register_type::<T>()?;
        Ok(self)
    }

    /// Configure the builder from a configuration closure
    pub fn configure<F>(self, configure: F) -> Result<Self, ContainerError>
    where
        F: FnOnce(Self) -> Result<Self, ContainerError>,
    {
        configure(self)
    }

    /// Build the container, failing on missing providers, cycles or chains
    /// deeper than the configured limit
    pub fn build(self) -> Result<Container, ContainerError> {
        self.container.validate()?;
        tracing::debug!(
            "Built container with {} providers",
            self.container.len()
        );
        Ok(self.container)
    }

    /// Build the container without the static wiring check
    pub fn build_unchecked(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
