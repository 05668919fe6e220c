use crate::container::key::TypeKey;
use crate::container::provider::Arguments;
use crate::errors::ContainerError;

/// Builds an instance of `T` from its resolved constructor arguments
pub type ConstructFn<T> = Box<dyn Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync>;

/// Trait for implementation types the container can construct by injection.
///
/// Implementors report every constructor marked as an injection point. The
/// `#[injectable]` attribute generates this from `#[inject]` markers on an
/// inherent impl block; it can also be written by hand.
pub trait Injectable: Send + Sync + Sized + 'static {
    /// All constructors marked for injection, in declaration order
    fn inject_constructors() -> Vec<InjectConstructor<Self>>;
}

/// A designated constructor: its ordered dependency keys and a build function
pub struct InjectConstructor<T> {
    name: &'static str,
    dependencies: Vec<TypeKey>,
    construct: ConstructFn<T>,
}

impl<T: 'static> InjectConstructor<T> {
    pub fn new<F>(name: &'static str, dependencies: Vec<TypeKey>, construct: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        Self {
            name,
            dependencies,
            construct: Box::new(construct),
        }
    }

    /// Name of the constructor function, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dependencies(&self) -> &[TypeKey] {
        &self.dependencies
    }

    pub(crate) fn into_parts(self) -> (Vec<TypeKey>, ConstructFn<T>) {
        (self.dependencies, self.construct)
    }
}

impl<T> std::fmt::Debug for InjectConstructor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectConstructor")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Find the single designated constructor of `T`
pub fn locate<T: Injectable>() -> Result<InjectConstructor<T>, ContainerError> {
    let mut constructors = T::inject_constructors();
    if constructors.len() != 1 {
        tracing::debug!(
            "{} has {} #[inject] constructors, expected exactly one",
            std::any::type_name::<T>(),
            constructors.len()
        );
        return Err(ContainerError::inject_constructor_not_found::<T>(
            constructors.len(),
        ));
    }

    constructors
        .pop()
        .ok_or_else(|| ContainerError::inject_constructor_not_found::<T>(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::provider::erase;
    use std::sync::Arc;

    struct Engine {
        cylinders: Arc<u32>,
    }

    impl Injectable for Engine {
        fn inject_constructors() -> Vec<InjectConstructor<Self>> {
            vec![InjectConstructor::new(
                "new",
                vec![TypeKey::of::<u32>()],
                |args| {
                    Ok(Engine {
                        cylinders: args.next::<u32>()?,
                    })
                },
            )]
        }
    }

    struct Unmarked;

    impl Injectable for Unmarked {
        fn inject_constructors() -> Vec<InjectConstructor<Self>> {
            Vec::new()
        }
    }

    struct Ambiguous;

    impl Injectable for Ambiguous {
        fn inject_constructors() -> Vec<InjectConstructor<Self>> {
            vec![
                InjectConstructor::new("new", Vec::new(), |_| Ok(Ambiguous)),
                InjectConstructor::new("with_defaults", Vec::new(), |_| Ok(Ambiguous)),
            ]
        }
    }

    #[test]
    fn test_locate_single_constructor() {
        let constructor = locate::<Engine>().unwrap();
        assert_eq!(constructor.name(), "new");
        assert_eq!(constructor.dependencies(), &[TypeKey::of::<u32>()]);

        let (dependencies, construct) = constructor.into_parts();
        let mut args = Arguments::new(&dependencies, vec![erase(Arc::new(8u32))]);
        let engine = construct(&mut args).unwrap();
        assert_eq!(*engine.cylinders, 8);
    }

    #[test]
    fn test_locate_without_marker_fails() {
        let error = locate::<Unmarked>().unwrap_err();
        assert!(error.is_inject_constructor_not_found());
        assert!(matches!(
            error,
            ContainerError::InjectConstructorNotFound { found: 0, .. }
        ));
    }

    #[test]
    fn test_locate_with_two_markers_fails() {
        let error = locate::<Ambiguous>().unwrap_err();
        assert!(matches!(
            error,
            ContainerError::InjectConstructorNotFound { found: 2, .. }
        ));
    }
}
