use std::any::Any;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::container::autowiring::{InjectConstructor, Injectable};
use crate::container::key::TypeKey;
use crate::container::lifetime::Lifetime;
use crate::errors::ContainerError;

/// Type-erased resolved value. The payload is always `Arc<T>` for the key type `T`.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// Zero-argument producer
pub type FactoryFn = Box<dyn Fn() -> AnyValue + Send + Sync>;

/// Builds a value from resolved dependencies, in declaration order
pub type BuildFn = Box<dyn Fn(Arguments) -> Result<AnyValue, ContainerError> + Send + Sync>;

/// Erase a shared value so it can be stored in the registry
pub fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyValue {
    Arc::new(value)
}

/// Recover a shared value erased with [`erase`]
pub fn downcast<T: ?Sized + Send + Sync + 'static>(value: &AnyValue) -> Option<Arc<T>> {
    value.downcast_ref::<Arc<T>>().cloned()
}

/// Check that an erased value carries the payload `key` expects
pub(crate) fn satisfies(key: &TypeKey, value: &AnyValue) -> bool {
    (**value).type_id() == key.payload_id()
}

/// Resolved dependency values handed to a build function
#[derive(Debug)]
pub struct Arguments {
    values: std::vec::IntoIter<(TypeKey, AnyValue)>,
}

impl Arguments {
    pub(crate) fn new(dependencies: &[TypeKey], values: Vec<AnyValue>) -> Self {
        let pairs: Vec<(TypeKey, AnyValue)> =
            dependencies.iter().copied().zip(values).collect();
        Self {
            values: pairs.into_iter(),
        }
    }

    /// Take the next argument in declaration order
    pub fn next<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>, ContainerError> {
        let requested = TypeKey::of::<T>();
        let (declared, value) = self
            .values
            .next()
            .ok_or_else(|| ContainerError::type_mismatch(requested))?;

        if declared != requested {
            return Err(ContainerError::type_mismatch(declared));
        }

        downcast::<T>(&value).ok_or_else(|| ContainerError::type_mismatch(declared))
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Provider variant, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Instance,
    Factory,
    Injected,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Instance => "instance",
            ProviderKind::Factory => "factory",
            ProviderKind::Injected => "injected",
        };
        f.write_str(name)
    }
}

/// Strategy for producing the value bound to a key
pub enum Provider {
    /// Always yields the same stored value
    Instance(AnyValue),
    /// Yields whatever the producer returns, once per request
    Factory(FactoryFn),
    /// Resolves `dependencies` in order, then calls `build`
    Injected {
        dependencies: Vec<TypeKey>,
        build: BuildFn,
    },
}

impl Provider {
    pub fn instance<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Provider::Instance(erase(value))
    }

    pub fn factory<T, F>(produce: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Provider::Factory(Box::new(move || erase(produce())))
    }

    /// A factory whose first result is remembered and handed out from then on
    pub fn singleton<T, F>(produce: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let cell: OnceLock<Arc<T>> = OnceLock::new();
        Provider::Factory(Box::new(move || {
            erase(Arc::clone(cell.get_or_init(&produce)))
        }))
    }

    pub fn factory_with<T, F>(lifetime: Lifetime, produce: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        match lifetime {
            Lifetime::Singleton => Self::singleton(produce),
            Lifetime::Transient => Self::factory(produce),
        }
    }

    /// A factory producing already-erased values. The output is checked against
    /// the key at resolution time.
    pub fn erased_factory(produce: FactoryFn) -> Self {
        Provider::Factory(produce)
    }

    /// An injected provider built from a located constructor of `T`, exposed as `I`
    pub fn injected<T, I, U>(constructor: InjectConstructor<T>, upcast: U) -> Self
    where
        T: Injectable,
        I: ?Sized + Send + Sync + 'static,
        U: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let (dependencies, construct) = constructor.into_parts();
        Provider::Injected {
            dependencies,
            build: Box::new(move |mut arguments: Arguments| {
                let value = construct(&mut arguments)?;
                Ok(erase(upcast(Arc::new(value))))
            }),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Instance(_) => ProviderKind::Instance,
            Provider::Factory(_) => ProviderKind::Factory,
            Provider::Injected { .. } => ProviderKind::Injected,
        }
    }

    /// Keys this provider needs resolved first; empty unless injected
    pub fn dependencies(&self) -> &[TypeKey] {
        match self {
            Provider::Injected { dependencies, .. } => dependencies,
            Provider::Instance(_) | Provider::Factory(_) => &[],
        }
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Instance(_) => f.debug_tuple("Instance").field(&"<instance>").finish(),
            Provider::Factory(_) => f.debug_tuple("Factory").field(&"<factory>").finish(),
            Provider::Injected { dependencies, .. } => f
                .debug_struct("Injected")
                .field("dependencies", dependencies)
                .field("build", &"<build_fn>")
                .finish(),
        }
    }
}
