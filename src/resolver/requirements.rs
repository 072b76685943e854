//! Target requirement resolution.
//!
//! Targets declare the targets they need through the `required` attribute
//! of their Buildfile bucket. Resolving a target expands those declarations
//! transitively and orders the result so every target comes after
//! everything it requires.

use std::collections::HashSet;

use crate::core::config_store::ConfigStore;
use crate::resolver::errors::CyclicDependencyError;
use crate::resolver::graph::DependencyGraph;

/// The reserved bucket holding requirements shared by every app.
pub const ALL: &str = "all";

/// Resolves target requirements within one mode.
#[derive(Debug, Clone, Copy)]
pub struct RequirementGraph<'a> {
    store: &'a ConfigStore,
    mode: &'a str,
}

impl<'a> RequirementGraph<'a> {
    /// Create a resolver over `store` for `mode`.
    pub fn new(store: &'a ConfigStore, mode: &'a str) -> Self {
        RequirementGraph { store, mode }
    }

    /// Every target reachable from `target`, in discovery order.
    ///
    /// The direct requirements of a target are listed before the expansion
    /// of each of them. `target` itself only appears when it is reachable
    /// from one of its requirements.
    pub fn expand(&self, target: &str) -> Vec<String> {
        let mut nodes = Vec::new();
        let mut expanded = HashSet::new();
        self.expand_into(target, &mut nodes, &mut expanded);
        nodes
    }

    fn expand_into(&self, target: &str, nodes: &mut Vec<String>, expanded: &mut HashSet<String>) {
        if !expanded.insert(target.to_string()) {
            return;
        }

        let mut requirements = self.store.required(self.mode, target);
        let mut seen = HashSet::new();
        requirements.retain(|r| seen.insert(r.clone()));

        for requirement in &requirements {
            if !nodes.contains(requirement) {
                nodes.push(requirement.clone());
            }
        }

        for requirement in &requirements {
            self.expand_into(requirement, nodes, expanded);
        }
    }

    /// Resolve `target` into its requirements in dependency order.
    pub fn resolve(&self, target: &str) -> Result<Vec<String>, CyclicDependencyError> {
        self.sort(self.expand(target))
    }

    /// Resolve the requirements of an app, including those shared by all
    /// apps through the reserved `all` bucket.
    pub fn resolve_for_app(&self, app: &str) -> Result<Vec<String>, CyclicDependencyError> {
        let mut nodes = self.expand(app);
        if app != ALL {
            for node in self.expand(ALL) {
                if !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        self.sort(nodes)
    }

    fn sort(&self, nodes: Vec<String>) -> Result<Vec<String>, CyclicDependencyError> {
        let mut graph = DependencyGraph::new();
        for node in &nodes {
            graph.add_node(node);
        }
        for node in &nodes {
            for requirement in self.store.required(self.mode, node) {
                graph.add_edge(node, &requirement);
            }
        }

        let order = graph.sort()?;
        tracing::debug!("requirements ({}): {}", self.mode, order.join(", "));
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buildfile::Buildfile;
    use crate::core::config_store::REQUIRED;

    fn depends_on(order: &[String], dependent: &str, dependency: &str) -> bool {
        let a = order.iter().position(|n| n == dependency).unwrap();
        let b = order.iter().position(|n| n == dependent).unwrap();
        a < b
    }

    fn store(buildfile: &str) -> ConfigStore {
        let mut store = ConfigStore::new();
        Buildfile::parse(buildfile).unwrap().evaluate(&mut store);
        store
    }

    const SPROUTCORE: &str = r#"
[config.all]
required = ["sproutcore"]

[config.sproutcore]
required = ["desktop", "datastore"]

[config.desktop]
required = ["foundation"]

[config.foundation]
required = ["runtime", "jquery"]

[config.datastore]
required = ["runtime"]
"#;

    #[test]
    fn test_exposes_required_targets_in_dependency_order() {
        let store = store(SPROUTCORE);
        let order = RequirementGraph::new(&store, "global").resolve(ALL).unwrap();

        assert!(depends_on(&order, "foundation", "jquery"));
        assert!(depends_on(&order, "foundation", "runtime"));
        assert!(depends_on(&order, "desktop", "jquery"));
        assert!(depends_on(&order, "desktop", "runtime"));
        assert!(depends_on(&order, "sproutcore", "desktop"));
        assert!(depends_on(&order, "sproutcore", "datastore"));
        assert!(depends_on(&order, "sproutcore", "foundation"));
        assert!(depends_on(&order, "sproutcore", "runtime"));
        assert!(depends_on(&order, "sproutcore", "jquery"));
        assert!(!order.contains(&ALL.to_string()));
    }

    #[test]
    fn test_resolve_is_a_permutation_of_the_expansion() {
        let store = store(SPROUTCORE);
        let graph = RequirementGraph::new(&store, "global");

        let mut expanded = graph.expand("sproutcore");
        let mut order = graph.resolve("sproutcore").unwrap();
        expanded.sort();
        order.sort();
        assert_eq!(expanded, order);
    }

    #[test]
    fn test_expansion_order_is_discovery_order() {
        let store = store(SPROUTCORE);
        let expanded = RequirementGraph::new(&store, "global").expand("sproutcore");

        assert_eq!(
            expanded,
            vec!["desktop", "datastore", "foundation", "runtime", "jquery"]
        );
    }

    #[test]
    fn test_ties_broken_by_discovery_order() {
        let store = store(SPROUTCORE);
        let order = RequirementGraph::new(&store, "global")
            .resolve("sproutcore")
            .unwrap();

        assert_eq!(
            order,
            vec!["runtime", "jquery", "foundation", "desktop", "datastore"]
        );
    }

    #[test]
    fn test_undeclared_dependency_is_a_leaf() {
        let store = store("[config.app]\nrequired = [\"ghost\"]\n");
        let order = RequirementGraph::new(&store, "global").resolve("app").unwrap();

        assert_eq!(order, vec!["ghost"]);
    }

    #[test]
    fn test_cycle_is_fatal_from_either_side() {
        let mut store = ConfigStore::new();
        let global = store.declare_mode("global");
        store.merge(&global, "A", [(REQUIRED, vec!["B"])]);
        store.merge(&global, "B", [(REQUIRED, vec!["A"])]);

        let graph = RequirementGraph::new(&store, "global");
        for target in ["A", "B"] {
            let err = graph.resolve(target).unwrap_err();
            assert!(err.involves("A"));
            assert!(err.involves("B"));
        }
    }

    #[test]
    fn test_resolve_for_app_merges_shared_requirements() {
        let store = store(
            r#"
[config.all]
required = ["runtime"]

[config.todos]
required = ["datastore"]

[config.datastore]
required = ["runtime"]
"#,
        );
        let graph = RequirementGraph::new(&store, "global");

        assert_eq!(
            graph.resolve_for_app("todos").unwrap(),
            vec!["runtime", "datastore"]
        );
        assert_eq!(graph.resolve_for_app(ALL).unwrap(), vec!["runtime"]);
    }

    #[test]
    fn test_unknown_mode_resolves_empty() {
        let store = store(SPROUTCORE);
        assert!(RequirementGraph::new(&store, "debug")
            .resolve(ALL)
            .unwrap()
            .is_empty());
    }
}
