use std::collections::HashSet;

use serde::Serialize;

use crate::container::graph::DependencyGraph;
use crate::container::key::TypeKey;
use crate::container::provider::ProviderKind;
use crate::errors::ContainerError;

/// Dependency graph visualization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationFormat {
    /// Graphviz DOT format
    Dot,
    /// JSON representation
    Json,
    /// ASCII art tree
    Ascii,
}

#[derive(Debug, Serialize)]
struct JsonGraph<'a> {
    providers: Vec<JsonProvider<'a>>,
    missing: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonProvider<'a> {
    key: &'a str,
    kind: ProviderKind,
    dependencies: Vec<&'a str>,
}

/// Renders a [`DependencyGraph`] for diagnostics
#[derive(Debug)]
pub struct GraphVisualizer<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> GraphVisualizer<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Generate visualization in specified format
    pub fn render(&self, format: VisualizationFormat) -> Result<String, ContainerError> {
        match format {
            VisualizationFormat::Dot => Ok(self.generate_dot()),
            VisualizationFormat::Json => self.generate_json(),
            VisualizationFormat::Ascii => Ok(self.generate_ascii()),
        }
    }

    fn missing_keys(&self) -> Vec<TypeKey> {
        let mut missing: Vec<TypeKey> = self
            .graph
            .missing_dependencies()
            .into_iter()
            .map(|(_, dependency)| dependency)
            .collect();
        missing.sort_by_key(|key| key.type_name());
        missing.dedup();
        missing
    }

    /// Generate Graphviz DOT format
    fn generate_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph Dependencies {\n");
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    node [shape=rectangle];\n\n");

        for key in self.graph.sorted_keys() {
            let Some(node) = self.graph.node(&key) else {
                continue;
            };
            let color = match node.kind {
                ProviderKind::Instance => "lightblue",
                ProviderKind::Factory => "lightyellow",
                ProviderKind::Injected => "lightgreen",
            };
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\\n({})\", style=filled, fillcolor={}];\n",
                key, key, node.kind, color
            ));
        }

        for key in self.missing_keys() {
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\\n(missing)\", style=dashed];\n",
                key, key
            ));
        }

        dot.push('\n');

        for key in self.graph.sorted_keys() {
            for dependency in self.graph.dependencies_of(&key).unwrap_or(&[]) {
                dot.push_str(&format!("    \"{}\" -> \"{}\";\n", key, dependency));
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Generate JSON representation
    fn generate_json(&self) -> Result<String, ContainerError> {
        let providers = self
            .graph
            .sorted_keys()
            .into_iter()
            .filter_map(|key| self.graph.node(&key))
            .map(|node| JsonProvider {
                key: node.key.type_name(),
                kind: node.kind,
                dependencies: node
                    .dependencies
                    .iter()
                    .map(TypeKey::type_name)
                    .collect(),
            })
            .collect();

        let missing = self
            .missing_keys()
            .into_iter()
            .map(|key| key.type_name())
            .collect();

        let document = JsonGraph { providers, missing };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Generate ASCII tree format, one tree per key nothing else depends on.
    /// Keys not reachable from such a root (pure cycles) get trees of their own.
    fn generate_ascii(&self) -> String {
        let mut ascii = String::new();
        ascii.push_str("Dependency Tree\n");
        ascii.push_str("===============\n\n");

        let keys = self.graph.sorted_keys();
        let roots = keys.iter().copied().filter(|key| {
            self.graph
                .dependents_of(key)
                .map_or(true, |dependents| dependents.is_empty())
        });

        let mut expanded = HashSet::new();
        for root in roots {
            self.ascii_tree(root, &mut expanded, &mut ascii);
        }
        for key in &keys {
            if !expanded.contains(key) {
                self.ascii_tree(*key, &mut expanded, &mut ascii);
            }
        }
        ascii
    }

    /// Draw the tree under `root` with an explicit stack, so chain length is
    /// not bounded by the call stack
    fn ascii_tree(&self, root: TypeKey, expanded: &mut HashSet<TypeKey>, out: &mut String) {
        let mut stack = vec![Walk::Enter(root, 0)];
        let mut path: Vec<TypeKey> = Vec::new();

        while let Some(walk) = stack.pop() {
            let (key, depth) = match walk {
                Walk::Enter(key, depth) => (key, depth),
                Walk::Leave => {
                    path.pop();
                    continue;
                }
            };

            let indent = "  ".repeat(depth);
            let prefix = if depth == 0 { "" } else { "└─ " };

            let Some(node) = self.graph.node(&key) else {
                out.push_str(&format!("{}{}{} (missing)\n", indent, prefix, key));
                continue;
            };

            if path.contains(&key) {
                out.push_str(&format!("{}{}{} (cycle)\n", indent, prefix, key));
                continue;
            }

            if !expanded.insert(key) {
                out.push_str(&format!("{}{}{} (see above)\n", indent, prefix, key));
                continue;
            }

            out.push_str(&format!("{}{}{} [{}]\n", indent, prefix, key, node.kind));
            path.push(key);
            stack.push(Walk::Leave);
            // reversed so dependencies print in declaration order
            for dependency in node.dependencies.iter().rev() {
                stack.push(Walk::Enter(*dependency, depth + 1));
            }
        }
    }
}

/// Pending work for the ASCII walk
enum Walk {
    Enter(TypeKey, usize),
    /// Leaving a node's subtree; pops it off the path
    Leave,
}
