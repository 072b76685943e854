//! Ordered dependency graph shared by target and file resolution.
//!
//! Nodes keep their insertion order, which is the traversal seed: the sort
//! is a depth-first post-order walk that starts from each node in insertion
//! order and visits requirements in the order they were declared. Every
//! requirement therefore lands before its requirer, and nodes with no
//! ordering constraint between them keep their seed order.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::resolver::errors::CyclicDependencyError;

/// A graph whose edges point from a requirer to what it requires.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

struct Frame {
    node: NodeIndex,
    children: Vec<NodeIndex>,
    next: usize,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        DependencyGraph::default()
    }

    /// Add a node, returning its position in insertion order.
    ///
    /// Adding an existing name is a no-op.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&node) = self.index.get(name) {
            return node.index();
        }

        let node = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), node);
        node.index()
    }

    /// Record that `from` requires `to`. Both nodes are created if needed.
    ///
    /// Self edges and repeated edges are ignored.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from == to {
            tracing::debug!("ignoring self requirement on {}", from);
            return;
        }

        let from = NodeIndex::new(self.add_node(from));
        let to = NodeIndex::new(self.add_node(to));
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Whether a node exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Requirements of a node, in declaration order.
    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields neighbors newest edge first
        let mut children: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        children.reverse();
        children
    }

    /// Fail with the first cycle, by seed order of its members.
    fn check_acyclic(&self) -> Result<(), CyclicDependencyError> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .collect();

        for scc in &mut cycles {
            scc.sort_by_key(|n| n.index());
        }
        cycles.sort_by_key(|scc| scc[0].index());

        match cycles.into_iter().next() {
            Some(scc) => Err(CyclicDependencyError {
                nodes: scc.into_iter().map(|n| self.graph[n].clone()).collect(),
            }),
            None => Ok(()),
        }
    }

    /// Sort the graph, returning insertion positions in dependency order.
    pub fn sort_indices(&self) -> Result<Vec<usize>, CyclicDependencyError> {
        self.check_acyclic()?;

        let mut visited = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(self.graph.node_count());

        for start in self.graph.node_indices() {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;

            let mut stack = vec![Frame {
                node: start,
                children: self.children(start),
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                match frame.children.get(frame.next).copied() {
                    Some(child) => {
                        frame.next += 1;
                        if !visited[child.index()] {
                            visited[child.index()] = true;
                            stack.push(Frame {
                                node: child,
                                children: self.children(child),
                                next: 0,
                            });
                        }
                    }
                    None => {
                        order.push(frame.node.index());
                        stack.pop();
                    }
                }
            }
        }

        Ok(order)
    }

    /// Sort the graph, returning node names in dependency order.
    pub fn sort(&self) -> Result<Vec<String>, CyclicDependencyError> {
        Ok(self
            .sort_indices()?
            .into_iter()
            .map(|i| self.graph[NodeIndex::new(i)].clone())
            .collect())
    }
}
