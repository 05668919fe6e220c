use crate::container::key::{ResolutionPath, TypeKey};
use crate::container::provider::{satisfies, AnyValue, Arguments, BuildFn, Provider};
use crate::container::registry::Registry;
use crate::errors::ContainerError;

/// Default bound on the number of injected providers in flight at once
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// An injected provider waiting for its dependencies
struct Frame<'r> {
    key: TypeKey,
    dependencies: &'r [TypeKey],
    build: &'r BuildFn,
    resolved: Vec<AnyValue>,
}

impl Frame<'_> {
    fn next_dependency(&self) -> Option<TypeKey> {
        self.dependencies.get(self.resolved.len()).copied()
    }
}

/// Resolves keys against a registry.
///
/// Dependencies of an injected provider are resolved strictly in declaration
/// order, and the first failure is reported. Resolution runs as a loop over an
/// explicit stack of frames, so graph depth is bounded by `max_depth` rather
/// than by the call stack.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Produce a value for `key`, building its dependencies first
    pub fn resolve(&self, key: &TypeKey) -> Result<AnyValue, ContainerError> {
        let mut frames: Vec<Frame<'r>> = Vec::new();
        let mut path = ResolutionPath::new();
        let mut request = *key;

        let result = loop {
            let value = match self.step(request, &mut frames, &mut path) {
                Ok(Step::Ready(value)) => value,
                Ok(Step::Descend(dependency)) => {
                    request = dependency;
                    continue;
                }
                Err(error) => break Err(error),
            };

            match deliver(value, &mut frames, &mut path) {
                Ok(Delivery::Done(value)) => break Ok(value),
                Ok(Delivery::Next(dependency)) => request = dependency,
                Err(error) => break Err(error),
            }
        };

        if let Err(error) = &result {
            tracing::debug!("Failed to resolve {}: {}", key, error);
        }
        result
    }

    /// Handle one request: either produce its value now, or push a frame for
    /// an injected provider and ask for its first dependency.
    fn step(
        &self,
        request: TypeKey,
        frames: &mut Vec<Frame<'r>>,
        path: &mut ResolutionPath,
    ) -> Result<Step, ContainerError> {
        if path.contains(&request) {
            return Err(ContainerError::circular_dependency(path.clone(), request));
        }

        let registry: &'r Registry = self.registry;
        let provider = registry
            .lookup(&request)
            .ok_or_else(|| ContainerError::provider_not_found(request))?;

        tracing::trace!("Resolving {} via {} provider", request, provider.kind());

        match provider {
            Provider::Instance(value) => Ok(Step::Ready(checked(request, value.clone())?)),
            Provider::Factory(produce) => Ok(Step::Ready(checked(request, produce())?)),
            Provider::Injected {
                dependencies,
                build,
            } => {
                let Some(first) = dependencies.first().copied() else {
                    let value = build(Arguments::new(&[], Vec::new()))?;
                    return Ok(Step::Ready(checked(request, value)?));
                };

                if path.len() >= self.max_depth {
                    return Err(ContainerError::DepthLimitExceeded {
                        key: request,
                        limit: self.max_depth,
                    });
                }

                path.push(request);
                frames.push(Frame {
                    key: request,
                    dependencies,
                    build,
                    resolved: Vec::with_capacity(dependencies.len()),
                });
                Ok(Step::Descend(first))
            }
        }
    }
}

enum Step {
    Ready(AnyValue),
    Descend(TypeKey),
}

enum Delivery {
    Done(AnyValue),
    Next(TypeKey),
}

/// Hand a value to the frame waiting on it, building every frame that
/// becomes complete along the way.
fn deliver(
    mut value: AnyValue,
    frames: &mut Vec<Frame<'_>>,
    path: &mut ResolutionPath,
) -> Result<Delivery, ContainerError> {
    while let Some(mut frame) = frames.pop() {
        frame.resolved.push(value);
        if let Some(dependency) = frame.next_dependency() {
            frames.push(frame);
            return Ok(Delivery::Next(dependency));
        }

        path.pop();
        let arguments = Arguments::new(frame.dependencies, frame.resolved);
        value = checked(frame.key, (frame.build)(arguments)?)?;
        tracing::trace!("Built {}", frame.key);
    }
    Ok(Delivery::Done(value))
}

fn checked(key: TypeKey, value: AnyValue) -> Result<AnyValue, ContainerError> {
    if satisfies(&key, &value) {
        Ok(value)
    } else {
        Err(ContainerError::type_mismatch(key))
    }
}
