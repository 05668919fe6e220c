pub mod autowiring;
pub mod builder;
#[allow(clippy::module_inception)]
pub mod container;
pub mod graph;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod visualization;

pub use autowiring::{locate, ConstructFn, InjectConstructor, Injectable};
pub use builder::ContainerBuilder;
pub use container::Container;
pub use graph::{DependencyGraph, DependencyNode};
pub use key::{ResolutionPath, TypeKey};
pub use lifetime::Lifetime;
pub use provider::{downcast, erase, AnyValue, Arguments, BuildFn, FactoryFn, Provider, ProviderKind};
pub use registry::Registry;
pub use resolver::{Resolver, DEFAULT_MAX_DEPTH};
pub use visualization::{GraphVisualizer, VisualizationFormat};
