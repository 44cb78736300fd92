use std::collections::{BTreeMap, VecDeque};
use crate::{NodeId, NodeSet};

/// A simple undirected graph.
///
/// This is the structure on which all adjustment-set searches
/// operate: moral graphs (_H<sub>0</sub>_) and their contractions
/// (_H<sub>1</sub>_) are `UnGraph`s.  Self-loops are never stored.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct UnGraph {
    nodes:     NodeSet,
    neighbors: BTreeMap<NodeId, NodeSet>,
}

impl UnGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_node(&mut self, node: NodeId) {
        if self.nodes.insert(node) {
            self.neighbors.insert(node, NodeSet::new());
        }
    }

    /// Adds an edge, together with its end nodes if missing.
    /// Self-loops are silently dropped.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.add_node(u);
        self.add_node(v);

        if u != v {
            self.neighbors.entry(u).or_default().insert(v);
            self.neighbors.entry(v).or_default().insert(u);
        }
    }

    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let found = self.neighbors.get_mut(&u).map_or(false, |nbrs| nbrs.remove(&v));

        if found {
            if let Some(nbrs) = self.neighbors.get_mut(&v) {
                nbrs.remove(&u);
            }
        }

        found
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.neighbors.get(&u).map_or(false, |nbrs| nbrs.contains(&v))
    }

    #[inline]
    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbors.get(&node).into_iter().flat_map(|nbrs| nbrs.iter().copied())
    }

    /// Iterates over edges as ordered pairs `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.neighbors
            .iter()
            .flat_map(|(&u, nbrs)| nbrs.range(u..).filter(move |&&v| v != u).map(move |&v| (u, v)))
    }

    pub fn num_edges(&self) -> usize {
        self.neighbors.values().map(|nbrs| nbrs.len()).sum::<usize>() / 2
    }

    /// Returns the subgraph induced by `nodes`.  Nodes absent from
    /// this graph are ignored.
    pub fn induced_subgraph(&self, nodes: &NodeSet) -> UnGraph {
        let mut result = UnGraph::new();

        for &u in self.nodes.intersection(nodes) {
            result.add_node(u);

            for v in self.neighbors(u) {
                if nodes.contains(&v) {
                    result.add_edge(u, v);
                }
            }
        }

        result
    }

    /// Returns a copy of this graph with `nodes` (and their incident
    /// edges) removed.
    pub fn without_nodes(&self, nodes: &NodeSet) -> UnGraph {
        let kept: NodeSet = self.nodes.difference(nodes).copied().collect();

        self.induced_subgraph(&kept)
    }

    /// Returns the set of nodes outside `nodes` which are adjacent to
    /// at least one node in `nodes`.
    pub fn node_boundary(&self, nodes: &NodeSet) -> NodeSet {
        nodes
            .iter()
            .flat_map(|&u| self.neighbors(u))
            .filter(|v| !nodes.contains(v))
            .collect()
    }

    /// Returns the set of nodes of the connected component containing
    /// `node`, or an empty set if `node` isn't in the graph.
    pub fn connected_component(&self, node: NodeId) -> NodeSet {
        let mut component = NodeSet::new();

        if !self.contains(node) {
            return component
        }

        let mut queue = VecDeque::new();

        component.insert(node);
        queue.push_back(node);

        while let Some(u) = queue.pop_front() {
            for v in self.neighbors(u) {
                if component.insert(v) {
                    queue.push_back(v);
                }
            }
        }

        component
    }

    /// Checks whether there is a path from `u` to `v` with all
    /// intermediate nodes in `via`.
    ///
    /// Any such path may be shortened to a simple one, so this is
    /// equivalent to asking for a simple path through `via`, without
    /// enumerating them.
    pub fn is_linked_through(&self, u: NodeId, v: NodeId, via: &NodeSet) -> bool {
        if u == v || !self.contains(u) || !self.contains(v) {
            return false
        }

        let mut visited = NodeSet::new();
        let mut stack = vec![u];

        visited.insert(u);

        while let Some(w) = stack.pop() {
            for x in self.neighbors(w) {
                if x == v {
                    return true
                } else if via.contains(&x) && visited.insert(x) {
                    stack.push(x);
                }
            }
        }

        false
    }
}
