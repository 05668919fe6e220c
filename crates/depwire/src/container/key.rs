use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a requested capability, usually a trait object type
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
    payload_id: TypeId,
}

impl TypeKey {
    /// Create a key for a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload_id: TypeId::of::<std::sync::Arc<T>>(),
        }
    }

    /// Get the TypeId of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if this key describes `T` without building a second key
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// TypeId of the erased payload a provider must produce for this key (`Arc<T>`)
    pub(crate) fn payload_id(&self) -> TypeId {
        self.payload_id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Chain of keys currently in flight for one top-level resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPath {
    keys: Vec<TypeKey>,
}

impl ResolutionPath {
    /// Create a new resolution path
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Add a key to the resolution path
    pub fn push(&mut self, key: TypeKey) {
        self.keys.push(key);
    }

    /// Remove the last key from the resolution path
    pub fn pop(&mut self) -> Option<TypeKey> {
        self.keys.pop()
    }

    /// Check if the path contains a key (for cycle detection)
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in request order, outermost first
    pub fn keys(&self) -> &[TypeKey] {
        &self.keys
    }
}

impl fmt::Display for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl From<Vec<TypeKey>> for ResolutionPath {
    fn from(keys: Vec<TypeKey>) -> Self {
        Self { keys }
    }
}
