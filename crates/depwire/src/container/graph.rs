use std::collections::{HashMap, HashSet, VecDeque};

use crate::container::key::{ResolutionPath, TypeKey};
use crate::container::provider::ProviderKind;
use crate::container::registry::Registry;
use crate::errors::ContainerError;

/// Dependency graph node
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub key: TypeKey,
    pub kind: ProviderKind,
    pub dependencies: Vec<TypeKey>,
    pub dependents: Vec<TypeKey>,
}

/// Static view of a registry's provider relationships, for checks that
/// should not construct anything
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<TypeKey, DependencyNode>,
}

impl DependencyGraph {
    /// Create a new dependency graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Build dependency graph from a registry
    pub fn from_registry(registry: &Registry) -> Self {
        let mut graph = Self::new();

        for (key, provider) in registry.iter() {
            graph.add_node(*key, provider.kind(), provider.dependencies());
        }

        graph.build_reverse_dependencies();
        graph
    }

    /// Add a key to the graph
    pub fn add_node(&mut self, key: TypeKey, kind: ProviderKind, dependencies: &[TypeKey]) {
        let node = DependencyNode {
            key,
            kind,
            dependencies: dependencies.to_vec(),
            dependents: Vec::new(),
        };
        self.nodes.insert(key, node);
    }

    /// Build reverse dependency relationships
    pub fn build_reverse_dependencies(&mut self) {
        for node in self.nodes.values_mut() {
            node.dependents.clear();
        }

        let edges: Vec<(TypeKey, Vec<TypeKey>)> = self
            .nodes
            .iter()
            .map(|(key, node)| (*key, node.dependencies.clone()))
            .collect();

        for (key, dependencies) in edges {
            for dependency in dependencies {
                if let Some(node) = self.nodes.get_mut(&dependency) {
                    if !node.dependents.contains(&key) {
                        node.dependents.push(key);
                    }
                }
            }
        }
    }

    pub fn node(&self, key: &TypeKey) -> Option<&DependencyNode> {
        self.nodes.get(key)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get dependencies for a key
    pub fn dependencies_of(&self, key: &TypeKey) -> Option<&[TypeKey]> {
        self.nodes.get(key).map(|node| node.dependencies.as_slice())
    }

    /// Get dependents for a key
    pub fn dependents_of(&self, key: &TypeKey) -> Option<&[TypeKey]> {
        self.nodes.get(key).map(|node| node.dependents.as_slice())
    }

    /// Every (dependent, missing dependency) pair, in no particular order
    pub fn missing_dependencies(&self) -> Vec<(TypeKey, TypeKey)> {
        let mut missing = Vec::new();
        for node in self.nodes.values() {
            for dependency in &node.dependencies {
                if !self.nodes.contains_key(dependency) {
                    missing.push((node.key, *dependency));
                }
            }
        }
        missing
    }

    /// Detect circular dependencies
    pub fn detect_cycles(&self) -> Result<(), ContainerError> {
        let mut visited = HashSet::new();

        for key in self.sorted_keys() {
            if !visited.contains(&key) {
                self.detect_cycle_from(key, &mut visited)?;
            }
        }

        Ok(())
    }

    /// Iterative DFS from `start`, tracking the in-progress path
    fn detect_cycle_from(
        &self,
        start: TypeKey,
        visited: &mut HashSet<TypeKey>,
    ) -> Result<(), ContainerError> {
        let mut path = ResolutionPath::new();
        // (key, index of the next dependency to visit)
        let mut stack: Vec<(TypeKey, usize)> = vec![(start, 0)];
        path.push(start);

        while let Some((key, next)) = stack.last_mut() {
            let dependencies = self.dependencies_of(key).unwrap_or(&[]);
            let Some(dependency) = dependencies.get(*next).copied() else {
                visited.insert(*key);
                stack.pop();
                path.pop();
                continue;
            };
            *next += 1;

            if path.contains(&dependency) {
                return Err(ContainerError::circular_dependency(path, dependency));
            }
            if visited.contains(&dependency) || !self.nodes.contains_key(&dependency) {
                continue;
            }

            stack.push((dependency, 0));
            path.push(dependency);
        }

        Ok(())
    }

    /// Check that every dependency has a provider and that there are no cycles
    pub fn validate(&self) -> Result<(), ContainerError> {
        let mut missing = self.missing_dependencies();
        missing.sort_by_key(|(dependent, dependency)| {
            (dependent.type_name(), dependency.type_name())
        });
        if let Some((dependent, dependency)) = missing.first() {
            tracing::debug!("{} depends on unregistered {}", dependent, dependency);
            return Err(ContainerError::provider_not_found(*dependency));
        }

        self.detect_cycles()
    }

    /// Number of injected providers with dependencies that are in flight at
    /// once when resolving each key, along its deepest chain
    pub fn injection_depths(&self) -> Result<HashMap<TypeKey, usize>, ContainerError> {
        self.detect_cycles()?;

        let mut depths: HashMap<TypeKey, usize> = HashMap::new();
        for start in self.sorted_keys() {
            if depths.contains_key(&start) {
                continue;
            }

            // (key, index of the next dependency to visit)
            let mut stack: Vec<(TypeKey, usize)> = vec![(start, 0)];
            while let Some((key, next)) = stack.last_mut() {
                let dependencies = self.dependencies_of(key).unwrap_or(&[]);
                if let Some(dependency) = dependencies.get(*next).copied() {
                    *next += 1;
                    if self.nodes.contains_key(&dependency) && !depths.contains_key(&dependency) {
                        stack.push((dependency, 0));
                    }
                    continue;
                }

                // a provider without dependencies is built without a frame
                let depth = if dependencies.is_empty() {
                    0
                } else {
                    1 + dependencies
                        .iter()
                        .filter_map(|dependency| depths.get(dependency))
                        .max()
                        .copied()
                        .unwrap_or(0)
                };
                depths.insert(*key, depth);
                stack.pop();
            }
        }

        Ok(depths)
    }

    /// Check that no key needs more than `limit` injected providers in flight
    pub fn check_depth(&self, limit: usize) -> Result<(), ContainerError> {
        let depths = self.injection_depths()?;
        let deepest = self
            .sorted_keys()
            .into_iter()
            .filter_map(|key| depths.get(&key).map(|depth| (key, *depth)))
            .find(|(_, depth)| *depth > limit);

        match deepest {
            Some((key, depth)) => {
                tracing::debug!("{} needs {} frames, limit is {}", key, depth, limit);
                Err(ContainerError::DepthLimitExceeded { key, limit })
            }
            None => Ok(()),
        }
    }

    /// Order in which keys can be built, dependencies first
    pub fn topological_order(&self) -> Result<Vec<TypeKey>, ContainerError> {
        self.detect_cycles()?;

        let mut in_degree: HashMap<TypeKey, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        for key in self.sorted_keys() {
            let node = &self.nodes[&key];
            let degree = node
                .dependencies
                .iter()
                .filter(|dependency| self.nodes.contains_key(*dependency))
                .count();
            in_degree.insert(key, degree);
            if degree == 0 {
                queue.push_back(key);
            }
        }

        while let Some(key) = queue.pop_front() {
            result.push(key);

            for dependent in &self.nodes[&key].dependents {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    // a dependent may list the same key more than once
                    let edges = self.nodes[dependent]
                        .dependencies
                        .iter()
                        .filter(|dependency| **dependency == key)
                        .count();
                    *degree = degree.saturating_sub(edges);
                    if *degree == 0 {
                        queue.push_back(*dependent);
                    }
                }
            }
        }

        Ok(result)
    }

    /// Keys sorted by type name, for deterministic traversal and output
    pub(crate) fn sorted_keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.nodes.keys().copied().collect();
        keys.sort_by_key(|key| key.type_name());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: Vec<(TypeKey, Vec<TypeKey>)>) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (key, dependencies) in edges {
            let kind = if dependencies.is_empty() {
                ProviderKind::Factory
            } else {
                ProviderKind::Injected
            };
            graph.add_node(key, kind, &dependencies);
        }
        graph.build_reverse_dependencies();
        graph
    }

    #[test]
    fn test_dependency_graph_cycle_detection() {
        let a = TypeKey::of::<u8>();
        let b = TypeKey::of::<u16>();
        let c = TypeKey::of::<u32>();

        // a -> b -> c -> a
        let graph = graph(vec![(a, vec![b]), (b, vec![c]), (c, vec![a])]);

        match graph.detect_cycles() {
            Err(ContainerError::CircularDependency { path, cycle_at }) => {
                assert_eq!(path.len(), 3);
                assert!(path.contains(&cycle_at));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let top = TypeKey::of::<u8>();
        let left = TypeKey::of::<u16>();
        let right = TypeKey::of::<u32>();
        let bottom = TypeKey::of::<u64>();

        let graph = graph(vec![
            (top, vec![left, right]),
            (left, vec![bottom]),
            (right, vec![bottom]),
            (bottom, vec![]),
        ]);

        assert!(graph.detect_cycles().is_ok());
        assert!(graph.validate().is_ok());
        assert_eq!(graph.dependents_of(&bottom).map(<[TypeKey]>::len), Some(2));
    }

    #[test]
    fn test_dependency_graph_topological_sort() {
        let a = TypeKey::of::<u8>();
        let b = TypeKey::of::<u16>();
        let c = TypeKey::of::<u32>();

        // a depends on b, b depends on c (twice)
        let graph = graph(vec![(c, vec![]), (b, vec![c, c]), (a, vec![b])]);

        let sorted = graph.topological_order().unwrap();
        assert_eq!(sorted, vec![c, b, a]);
    }

    #[test]
    fn test_missing_dependency() {
        let a = TypeKey::of::<u8>();
        let b = TypeKey::of::<u16>();

        let graph = graph(vec![(a, vec![b])]);

        assert_eq!(graph.missing_dependencies(), vec![(a, b)]);
        let error = graph.validate().unwrap_err();
        assert!(error.is_provider_not_found());
        assert_eq!(error.key(), Some(&b));
    }

    #[test]
    fn test_injection_depths() {
        let top = TypeKey::of::<u8>();
        let mid = TypeKey::of::<u16>();
        let leaf = TypeKey::of::<u32>();

        let graph = graph(vec![(top, vec![mid, leaf]), (mid, vec![leaf]), (leaf, vec![])]);

        let depths = graph.injection_depths().unwrap();
        assert_eq!(depths[&top], 2);
        assert_eq!(depths[&mid], 1);
        assert_eq!(depths[&leaf], 0);
    }

    #[test]
    fn test_check_depth_reports_deepest_key() {
        let top = TypeKey::of::<u8>();
        let mid = TypeKey::of::<u16>();
        let leaf = TypeKey::of::<u32>();

        let graph = graph(vec![(top, vec![mid]), (mid, vec![leaf]), (leaf, vec![])]);

        assert!(graph.check_depth(2).is_ok());
        match graph.check_depth(1) {
            Err(ContainerError::DepthLimitExceeded { key, limit }) => {
                assert_eq!(key, top);
                assert_eq!(limit, 1);
            }
            other => panic!("expected DepthLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_check_depth_rejects_cycles() {
        let a = TypeKey::of::<u8>();
        let graph = graph(vec![(a, vec![a])]);
        assert!(graph.check_depth(64).unwrap_err().is_circular_dependency());
    }
}
