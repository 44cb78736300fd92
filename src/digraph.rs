use std::collections::BTreeMap;
use crate::{NodeId, NodeSet, UnGraph};

/// A simple directed graph.
///
/// `DiGraph` itself doesn't check for cycles; acyclicity is
/// maintained by the owning [`CausalGraph`].  Derived graphs, such as
/// back-door graphs, are subgraphs of a DAG and hence acyclic too.
///
/// [`CausalGraph`]: crate::CausalGraph
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct DiGraph {
    nodes:    NodeSet,
    children: BTreeMap<NodeId, NodeSet>,
    parents:  BTreeMap<NodeId, NodeSet>,
}

impl DiGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_node(&mut self, node: NodeId) {
        if self.nodes.insert(node) {
            self.children.insert(node, NodeSet::new());
            self.parents.insert(node, NodeSet::new());
        }
    }

    pub fn add_edge(&mut self, cause: NodeId, effect: NodeId) {
        self.add_node(cause);
        self.add_node(effect);
        self.children.entry(cause).or_default().insert(effect);
        self.parents.entry(effect).or_default().insert(cause);
    }

    pub fn remove_edge(&mut self, cause: NodeId, effect: NodeId) -> bool {
        let found = self.children.get_mut(&cause).map_or(false, |kids| kids.remove(&effect));

        if found {
            if let Some(folks) = self.parents.get_mut(&effect) {
                folks.remove(&cause);
            }
        }

        found
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn has_edge(&self, cause: NodeId, effect: NodeId) -> bool {
        self.children.get(&cause).map_or(false, |kids| kids.contains(&effect))
    }

    #[inline]
    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children.get(&node).into_iter().flat_map(|kids| kids.iter().copied())
    }

    pub fn parents(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.parents.get(&node).into_iter().flat_map(|folks| folks.iter().copied())
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.children.iter().flat_map(|(&u, kids)| kids.iter().map(move |&v| (u, v)))
    }

    pub fn num_edges(&self) -> usize {
        self.children.values().map(|kids| kids.len()).sum()
    }

    /// Returns the set of strict ancestors of `node`.
    pub fn ancestors(&self, node: NodeId) -> NodeSet {
        closure(&self.parents, node)
    }

    /// Returns the set of strict descendants of `node`.
    pub fn descendants(&self, node: NodeId) -> NodeSet {
        closure(&self.children, node)
    }

    /// Returns `true` iff there is a directed path of positive length
    /// from `source` to `target`.
    pub fn has_path(&self, source: NodeId, target: NodeId) -> bool {
        let mut visited = NodeSet::new();
        let mut stack = vec![source];

        while let Some(u) = stack.pop() {
            for v in self.children(u) {
                if v == target {
                    return true
                } else if visited.insert(v) {
                    stack.push(v);
                }
            }
        }

        false
    }

    /// Returns the subgraph induced by `nodes`.  Nodes absent from
    /// this graph are ignored.
    pub fn induced_subgraph(&self, nodes: &NodeSet) -> DiGraph {
        let mut result = DiGraph::new();

        for &u in self.nodes.intersection(nodes) {
            result.add_node(u);

            for v in self.children(u) {
                if nodes.contains(&v) {
                    result.add_edge(u, v);
                }
            }
        }

        result
    }

    /// Iterates over all simple directed paths from `source` to
    /// `target`.
    pub fn simple_paths(&self, source: NodeId, target: NodeId) -> SimplePaths<'_> {
        SimplePaths::new(self, source, target)
    }

    /// Returns the moral graph: parents of a common child are
    /// married, then directions are dropped.
    pub fn moral_graph(&self) -> UnGraph {
        let mut result = UnGraph::new();

        for &node in self.nodes.iter() {
            result.add_node(node);
        }

        for (cause, effect) in self.edges() {
            result.add_edge(cause, effect);
        }

        for folks in self.parents.values() {
            for (pos, &u) in folks.iter().enumerate() {
                for &v in folks.iter().skip(pos + 1) {
                    result.add_edge(u, v);
                }
            }
        }

        result
    }
}

fn closure(step: &BTreeMap<NodeId, NodeSet>, node: NodeId) -> NodeSet {
    let mut result = NodeSet::new();
    let mut stack = vec![node];

    while let Some(u) = stack.pop() {
        for &v in step.get(&u).into_iter().flatten() {
            if result.insert(v) {
                stack.push(v);
            }
        }
    }

    result.remove(&node);
    result
}

/// An iterator over simple directed paths between two nodes.
///
/// Paths are produced lazily by depth-first search with an explicit
/// stack.  Branches leading to nodes from which `target` is
/// unreachable are pruned, so no partial path is ever a dead end.
pub struct SimplePaths<'a> {
    graph:   &'a DiGraph,
    target:  NodeId,
    viable:  NodeSet,
    path:    Vec<NodeId>,
    on_path: NodeSet,
    stack:   Vec<Vec<NodeId>>,
}

impl<'a> SimplePaths<'a> {
    fn new(graph: &'a DiGraph, source: NodeId, target: NodeId) -> Self {
        let mut viable = graph.ancestors(target);
        let mut path = Vec::new();
        let mut on_path = NodeSet::new();
        let mut stack = Vec::new();

        viable.insert(target);

        if source != target && viable.contains(&source) {
            path.push(source);
            on_path.insert(source);
            stack.push(graph.children(source).filter(|v| viable.contains(v)).collect());
        }

        SimplePaths { graph, target, viable, path, on_path, stack }
    }
}

impl Iterator for SimplePaths<'_> {
    type Item = Vec<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pending) = self.stack.last_mut() {
            if let Some(v) = pending.pop() {
                if v == self.target {
                    let mut result = self.path.clone();

                    result.push(v);

                    return Some(result)
                } else if !self.on_path.contains(&v) {
                    let next: Vec<_> =
                        self.graph.children(v).filter(|w| self.viable.contains(w)).collect();

                    self.path.push(v);
                    self.on_path.insert(v);
                    self.stack.push(next);
                }
            } else {
                self.stack.pop();

                if let Some(u) = self.path.pop() {
                    self.on_path.remove(&u);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID;

    fn n(id: usize) -> NodeId {
        NodeId(ID::new(id).unwrap())
    }

    fn set(ids: &[usize]) -> NodeSet {
        ids.iter().map(|&id| n(id)).collect()
    }

    fn diamond() -> DiGraph {
        // 1 -> 2 -> 4, 1 -> 3 -> 4, 4 -> 5, 6 -> 3
        let mut graph = DiGraph::new();

        for &(u, v) in &[(1, 2), (2, 4), (1, 3), (3, 4), (4, 5), (6, 3)] {
            graph.add_edge(n(u), n(v));
        }

        graph
    }

    #[test]
    fn test_closures() {
        let graph = diamond();
        assert_eq!(graph.ancestors(n(4)), set(&[1, 2, 3, 6]));
        assert_eq!(graph.descendants(n(3)), set(&[4, 5]));
        assert_eq!(graph.ancestors(n(1)), set(&[]));
        assert!(graph.has_path(n(6), n(5)));
        assert!(!graph.has_path(n(5), n(1)));
        assert!(!graph.has_path(n(4), n(4)));
    }

    #[test]
    fn test_simple_paths() {
        let graph = diamond();
        let mut paths: Vec<_> = graph.simple_paths(n(1), n(5)).collect();
        paths.sort();
        assert_eq!(paths, vec![vec![n(1), n(2), n(4), n(5)], vec![n(1), n(3), n(4), n(5)]]);
        assert_eq!(graph.simple_paths(n(2), n(3)).count(), 0);
        assert_eq!(graph.simple_paths(n(2), n(2)).count(), 0);
        let paths: Vec<_> = graph.simple_paths(n(6), n(4)).collect();
        assert_eq!(paths, vec![vec![n(6), n(3), n(4)]]);
    }

    #[test]
    fn test_subgraph_and_removal() {
        let mut graph = diamond().induced_subgraph(&set(&[1, 2, 3, 4]));
        assert_eq!(graph.num_edges(), 4);
        assert!(!graph.contains(n(5)));
        assert!(graph.remove_edge(n(1), n(2)));
        assert!(!graph.remove_edge(n(1), n(2)));
        assert_eq!(graph.parents(n(2)).count(), 0);
        assert_eq!(graph.children(n(1)).collect::<Vec<_>>(), vec![n(3)]);
    }

    #[test]
    fn test_moral_graph() {
        let moral = diamond().moral_graph();
        assert_eq!(moral.nodes(), &set(&[1, 2, 3, 4, 5, 6]));
        assert!(moral.has_edge(n(2), n(3)));
        assert!(moral.has_edge(n(1), n(6)));
        assert!(!moral.has_edge(n(2), n(6)));
        assert_eq!(moral.num_edges(), 8);
    }
}
