use std::sync::Arc;

use crate::config::{ConfigTrait, ContainerConfig};
use crate::container::autowiring::{locate, Injectable};
use crate::container::graph::DependencyGraph;
use crate::container::key::TypeKey;
use crate::container::lifetime::Lifetime;
use crate::container::provider::{downcast, Provider};
use crate::container::registry::Registry;
use crate::container::resolver::Resolver;
use crate::container::visualization::{GraphVisualizer, VisualizationFormat};
use crate::errors::ContainerError;

/// Dependency injection container.
///
/// Registration takes `&mut self` and resolution takes `&self`, so the borrow
/// checker keeps the two apart. Finish registering before sharing the
/// container; shared references can then resolve from any thread.
pub struct Container {
    registry: Registry,
    config: ContainerConfig,
}

impl Container {
    /// Create a new container with default configuration
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            config: ContainerConfig::default(),
        }
    }

    /// Create an empty container, rejecting a configuration that does not validate
    pub fn with_config(config: ContainerConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        Ok(Self {
            registry: Registry::new(),
            config,
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: ContainerConfig) {
        self.config = config;
    }

    /// Bind a raw provider to a key, returning the provider it replaces
    pub fn register_provider(&mut self, key: TypeKey, provider: Provider) -> Option<Provider> {
        self.registry.register(key, provider)
    }

    /// Bind `T` to a fixed value; every request returns this same `Arc`
    pub fn register_instance<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry
            .register(TypeKey::of::<T>(), Provider::instance(value));
        self
    }

    /// Bind `T` to a producer called once per request
    pub fn register_factory<T, F>(&mut self, produce: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.registry
            .register(TypeKey::of::<T>(), Provider::factory(produce));
        self
    }

    /// Bind `T` to a producer with an explicit lifetime
    pub fn register_factory_with<T, F>(&mut self, lifetime: Lifetime, produce: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.registry.register(
            TypeKey::of::<T>(),
            Provider::factory_with(lifetime, produce),
        );
        self
    }

    /// Bind `I` to constructor injection of `Impl`.
    ///
    /// `upcast` turns the built implementation into the requested type, usually
    /// just `|service| service`. Fails immediately when `Impl` does not have
    /// exactly one `#[inject]` constructor.
    pub fn register_injected<I, Impl>(
        &mut self,
        upcast: fn(Arc<Impl>) -> Arc<I>,
    ) -> Result<&mut Self, ContainerError>
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Injectable,
    {
        let constructor = locate::<Impl>()?;
        tracing::debug!(
            "Binding {} to {}::{}",
            std::any::type_name::<I>(),
            std::any::type_name::<Impl>(),
            constructor.name()
        );
        self.registry.register(
            TypeKey::of::<I>(),
            Provider::injected(constructor, upcast),
        );
        Ok(self)
    }

    /// Bind an injectable type to itself
    pub fn register_type<T: Injectable>(&mut self) -> Result<&mut Self, ContainerError> {
        self.register_injected::<T, T>(|service| service)
    }

    /// Resolve a value for `T`
    pub fn get<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let value = self.resolver().resolve(&key)?;
        downcast::<T>(&value).ok_or_else(|| ContainerError::type_mismatch(key))
    }

    /// Resolve a value for `T`, discarding the reason on failure
    pub fn try_get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>().ok()
    }

    /// A resolver over this container's registry using the configured depth limit
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry).with_max_depth(self.config.max_depth)
    }

    /// Check if a provider is bound to `T`
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(&TypeKey::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Check the whole registry for missing providers, cycles and chains
    /// deeper than the configured limit, without constructing anything
    pub fn validate(&self) -> Result<(), ContainerError> {
        let graph = self.dependency_graph();
        graph.validate()?;
        graph.check_depth(self.config.max_depth)
    }

    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_registry(&self.registry)
    }

    /// Render the dependency graph for diagnostics
    pub fn visualize(&self, format: VisualizationFormat) -> Result<String, ContainerError> {
        let graph = self.dependency_graph();
        GraphVisualizer::new(&graph).render(format)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("provider_count", &self.registry.len())
            .field("max_depth", &self.config.max_depth)
            .finish()
    }
}
