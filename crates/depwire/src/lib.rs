//! Type-keyed dependency injection.
//!
//! A [`Container`] maps type keys to providers. A provider is a fixed
//! instance, a factory, or an injected constructor whose parameters are
//! themselves resolved from the container. Constructor injection is opted into
//! per type through [`Injectable`], usually generated by `#[injectable]`.

pub mod config;
pub mod container;
pub mod errors;

pub use config::{ConfigError, ConfigSource, ConfigTrait, ContainerConfig};
pub use container::{
    locate, Arguments, Container, ContainerBuilder, DependencyGraph, GraphVisualizer,
    InjectConstructor, Injectable, Lifetime, Provider, ProviderKind, Registry, ResolutionPath,
    Resolver, TypeKey, VisualizationFormat,
};
pub use errors::ContainerError;

#[cfg(feature = "derive")]
pub use depwire_derive::injectable;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
