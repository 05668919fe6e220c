use std::collections::HashMap;

use crate::container::key::TypeKey;
use crate::container::provider::Provider;

/// Mapping from key to the single provider bound to it
#[derive(Debug, Default)]
pub struct Registry {
    providers: HashMap<TypeKey, Provider>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Bind `provider` to `key`, replacing and returning any previous binding
    pub fn register(&mut self, key: TypeKey, provider: Provider) -> Option<Provider> {
        tracing::debug!("Registering {} provider for {}", provider.kind(), key);
        let previous = self.providers.insert(key, provider);
        if let Some(previous) = &previous {
            tracing::debug!("Replaced {} provider for {}", previous.kind(), key);
        }
        previous
    }

    pub fn lookup(&self, key: &TypeKey) -> Option<&Provider> {
        self.providers.get(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.providers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Get all registered keys
    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.providers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeKey, &Provider)> {
        self.providers.iter()
    }
}
