//! Vertex cuts and node-disjoint paths in undirected graphs.
//!
//! All three entry points reduce to a maximum flow problem in the
//! usual split network: every node _v_ other than the terminals is
//! replaced by an arc _v<sub>in</sub>_ &rarr; _v<sub>out</sub>_ of
//! capacity equal to the cost of _v_, and every edge _u_&ndash;_v_ by
//! a pair of uncapacitated arcs _u<sub>out</sub>_ &rarr;
//! _v<sub>in</sub>_ and _v<sub>out</sub>_ &rarr; _u<sub>in</sub>_.  By
//! Menger's theorem, the value of a maximum flow from the source to
//! the sink is the cost of a minimum vertex cut separating them and,
//! for unit costs, the number of internally node-disjoint paths.
//!
//! Maximum flows are found with the Edmonds&ndash;Karp method
//! (shortest augmenting paths).

use std::collections::{BTreeMap, VecDeque};
use crate::{NodeId, NodeSet, UnGraph, Cost};

const INFINITE: u64 = u64::MAX;

#[derive(Clone, Debug)]
struct Arc {
    head:     usize,
    capacity: u64,
    residual: u64,
}

/// A split network built over an [`UnGraph`].
///
/// Arcs are stored in pairs, so that the reverse of arc `a` is
/// `a ^ 1`.  Forward arcs have even indices.  Uncapacitated arcs keep
/// an infinite residual forever; the flow along a forward arc is
/// always equal to the residual of its reverse.
#[derive(Debug)]
pub(crate) struct FlowNetwork {
    nodes:    Vec<NodeId>,
    arcs:     Vec<Arc>,
    outgoing: Vec<Vec<usize>>,
    source:   usize,
    sink:     usize,
}

#[inline]
fn in_copy(pos: usize) -> usize {
    2 * pos
}

#[inline]
fn out_copy(pos: usize) -> usize {
    2 * pos + 1
}

impl FlowNetwork {
    /// Returns `None` if a terminal is missing from the graph or if
    /// both terminals are the same node.
    pub(crate) fn from_graph<F>(
        graph: &UnGraph,
        source: NodeId,
        sink: NodeId,
        cost: F,
    ) -> Option<Self>
    where
        F: Fn(NodeId) -> Cost,
    {
        if source == sink || !graph.contains(source) || !graph.contains(sink) {
            return None
        }

        let nodes: Vec<NodeId> = graph.nodes().iter().copied().collect();
        let positions: BTreeMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(pos, &node)| (node, pos)).collect();

        let capacities: Vec<(usize, u64)> = nodes
            .iter()
            .enumerate()
            .filter(|&(_, &node)| node != source && node != sink)
            .map(|(pos, &node)| {
                let node_cost = cost(node);

                (pos, if node_cost.is_omega() { INFINITE } else { node_cost.get() })
            })
            .collect();

        let mut network = FlowNetwork {
            source: out_copy(positions[&source]),
            sink: in_copy(positions[&sink]),
            outgoing: vec![Vec::new(); 2 * nodes.len()],
            arcs: Vec::new(),
            nodes,
        };

        for (pos, capacity) in capacities {
            network.add_arc(in_copy(pos), out_copy(pos), capacity);
        }

        for (u, v) in graph.edges() {
            let (upos, vpos) = (positions[&u], positions[&v]);

            // No arc enters the source, no arc leaves the sink.
            if v != source && u != sink {
                network.add_arc(out_copy(upos), in_copy(vpos), INFINITE);
            }
            if u != source && v != sink {
                network.add_arc(out_copy(vpos), in_copy(upos), INFINITE);
            }
        }

        Some(network)
    }

    fn add_arc(&mut self, tail: usize, head: usize, capacity: u64) {
        let pos = self.arcs.len();

        self.arcs.push(Arc { head, capacity, residual: capacity });
        self.arcs.push(Arc { head: tail, capacity: 0, residual: 0 });
        self.outgoing[tail].push(pos);
        self.outgoing[head].push(pos + 1);
    }

    /// Returns predecessor arcs of a shortest augmenting path, or
    /// `None` if the sink is unreachable in the residual network.
    fn find_augmenting_path(&self) -> Option<Vec<usize>> {
        let mut pred: Vec<Option<usize>> = vec![None; self.outgoing.len()];
        let mut visited = vec![false; self.outgoing.len()];
        let mut queue = VecDeque::new();

        visited[self.source] = true;
        queue.push_back(self.source);

        while let Some(x) = queue.pop_front() {
            for &a in self.outgoing[x].iter() {
                let arc = &self.arcs[a];

                if arc.residual > 0 && !visited[arc.head] {
                    visited[arc.head] = true;
                    pred[arc.head] = Some(a);

                    if arc.head == self.sink {
                        let mut path = Vec::new();
                        let mut y = self.sink;

                        while let Some(b) = pred[y] {
                            path.push(b);
                            y = self.arcs[b ^ 1].head;
                        }

                        return Some(path)
                    }

                    queue.push_back(arc.head);
                }
            }
        }

        None
    }

    /// Saturates the network and returns the value of a maximum flow,
    /// or `None` if it is unbounded (the sink can be reached through
    /// uncapacitated arcs only).
    ///
    /// The flow along a single arc never exceeds a finite node cost,
    /// but the total may exceed `u64::MAX`.
    pub(crate) fn max_flow(&mut self) -> Option<u128> {
        let mut value = 0u128;

        while let Some(path) = self.find_augmenting_path() {
            let bottleneck = path.iter().map(|&a| self.arcs[a].residual).min().unwrap_or(0);

            if bottleneck == INFINITE {
                return None
            }

            for &a in path.iter() {
                if self.arcs[a].capacity != INFINITE {
                    self.arcs[a].residual -= bottleneck;
                }
                if self.arcs[a ^ 1].capacity != INFINITE {
                    self.arcs[a ^ 1].residual += bottleneck;
                }
            }

            value += u128::from(bottleneck);
        }

        Some(value)
    }

    fn residual_reach(&self) -> Vec<bool> {
        let mut visited = vec![false; self.outgoing.len()];
        let mut stack = vec![self.source];

        visited[self.source] = true;

        while let Some(x) = stack.pop() {
            for &a in self.outgoing[x].iter() {
                let arc = &self.arcs[a];

                if arc.residual > 0 && !visited[arc.head] {
                    visited[arc.head] = true;
                    stack.push(arc.head);
                }
            }
        }

        visited
    }

    /// Returns the minimum cut closest to the source, i.e. the nodes
    /// whose in-copy is reachable from the source in the residual
    /// network, while their out-copy isn't.  Call this only after
    /// [`max_flow()`](FlowNetwork::max_flow) returned a finite value.
    pub(crate) fn source_side_cut(&self) -> NodeSet {
        let reach = self.residual_reach();

        self.nodes
            .iter()
            .enumerate()
            .filter(|&(pos, _)| reach[in_copy(pos)] && !reach[out_copy(pos)])
            .map(|(_, &node)| node)
            .collect()
    }

    /// Decomposes a saturated unit-cost network into node-disjoint
    /// paths, each listed from the source node to the sink node.
    pub(crate) fn disjoint_paths(&self) -> Vec<Vec<NodeId>> {
        let mut flow: Vec<u64> = (0..self.arcs.len())
            .map(|a| if a % 2 == 0 { self.arcs[a ^ 1].residual } else { 0 })
            .collect();
        let mut paths = Vec::new();

        loop {
            let mut x = self.source;
            let mut path = vec![self.nodes[x / 2]];

            while x != self.sink {
                let next = self.outgoing[x].iter().copied().find(|&a| a % 2 == 0 && flow[a] > 0);

                if let Some(a) = next {
                    flow[a] -= 1;
                    x = self.arcs[a].head;

                    if x % 2 == 0 {
                        path.push(self.nodes[x / 2]);
                    }
                } else if x == self.source {
                    return paths
                } else {
                    // Flow conservation makes this unreachable.
                    warn!("Broken flow at {:?}", self.nodes[x / 2]);
                    return paths
                }
            }

            paths.push(path);
        }
    }
}

/// Returns the size of a minimum vertex cut separating `source` from
/// `sink` in `graph`.
///
/// Returns `None` if no vertex cut exists, i.e. if the two nodes are
/// adjacent, or if any of them is missing from the graph.
pub fn minimum_node_cut_size(graph: &UnGraph, source: NodeId, sink: NodeId) -> Option<usize> {
    if graph.has_edge(source, sink) {
        return None
    }

    let mut network = FlowNetwork::from_graph(graph, source, sink, |_| Cost::default())?;

    network.max_flow().map(|value| value as usize)
}

/// Returns a maximum set of internally node-disjoint paths from
/// `source` to `sink` in `graph`.
///
/// If the two nodes are adjacent, the direct path `[source, sink]` is
/// the first one listed.
pub fn node_disjoint_paths(graph: &UnGraph, source: NodeId, sink: NodeId) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();

    let network = if graph.has_edge(source, sink) {
        let mut graph = graph.clone();

        graph.remove_edge(source, sink);
        paths.push(vec![source, sink]);

        FlowNetwork::from_graph(&graph, source, sink, |_| Cost::default())
    } else {
        FlowNetwork::from_graph(graph, source, sink, |_| Cost::default())
    };

    if let Some(mut network) = network {
        if network.max_flow().is_some() {
            paths.extend(network.disjoint_paths());
        }
    }

    paths
}

/// Returns the total cost and the members of a minimum-cost vertex
/// cut separating `source` from `sink`, closest to `source` among all
/// such cuts.
///
/// Returns `None` if there is no finite-cost vertex cut, or if any of
/// the two nodes is missing from the graph.
pub fn minimum_cost_node_cut<F>(
    graph: &UnGraph,
    source: NodeId,
    sink: NodeId,
    cost: F,
) -> Option<(u128, NodeSet)>
where
    F: Fn(NodeId) -> Cost,
{
    let mut network = FlowNetwork::from_graph(graph, source, sink, cost)?;
    let value = network.max_flow()?;

    Some((value, network.source_side_cut()))
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

    fn graph(edges: &[(usize, usize)]) -> UnGraph {
        let mut graph = UnGraph::new();

        for &(u, v) in edges {
            graph.add_edge(n(u), n(v));
        }

        graph
    }

    // Two routes from 1 to 6: through 2, 3 and through 4, 5; 2 is
    // also linked to 5.
    fn ladder() -> UnGraph {
        graph(&[(1, 2), (2, 3), (3, 6), (1, 4), (4, 5), (5, 6), (2, 5)])
    }

    #[test]
    fn test_cut_size() {
        let ladder = ladder();
        assert_eq!(minimum_node_cut_size(&ladder, n(1), n(6)), Some(2));
        assert_eq!(minimum_node_cut_size(&ladder, n(1), n(2)), None);
        assert_eq!(minimum_node_cut_size(&ladder, n(1), n(7)), None);

        let split = graph(&[(1, 2), (3, 4)]);
        assert_eq!(minimum_node_cut_size(&split, n(1), n(4)), Some(0));

        let bottleneck = graph(&[(1, 2), (1, 3), (2, 4), (3, 4), (4, 5), (5, 6), (4, 6)]);
        assert_eq!(minimum_node_cut_size(&bottleneck, n(1), n(6)), Some(1));
    }

    #[test]
    fn test_disjoint_paths() {
        let ladder = ladder();
        let paths = node_disjoint_paths(&ladder, n(1), n(6));
        assert_eq!(paths.len(), 2);

        let mut interiors = NodeSet::new();
        for path in paths.iter() {
            assert_eq!(path.first(), Some(&n(1)));
            assert_eq!(path.last(), Some(&n(6)));
            for pair in path.windows(2) {
                assert!(ladder.has_edge(pair[0], pair[1]));
            }
            for &node in &path[1..path.len() - 1] {
                assert!(interiors.insert(node));
            }
        }

        let direct = graph(&[(1, 2), (1, 3), (3, 2)]);
        assert_eq!(
            node_disjoint_paths(&direct, n(1), n(2)),
            vec![vec![n(1), n(2)], vec![n(1), n(3), n(2)]]
        );

        let split = graph(&[(1, 2), (3, 4)]);
        assert!(node_disjoint_paths(&split, n(1), n(4)).is_empty());
    }

    #[test]
    fn test_cost_cut() {
        let ladder = ladder();
        let (value, cut) = minimum_cost_node_cut(&ladder, n(1), n(6), |_| Cost::default()).unwrap();
        assert_eq!(value, 2);
        assert_eq!(cut, set(&[2, 4]));

        let (value, cut) = minimum_cost_node_cut(&ladder, n(6), n(1), |_| Cost::default()).unwrap();
        assert_eq!(value, 2);
        assert_eq!(cut, set(&[3, 5]));

        let pricey = |node: NodeId| {
            if node == n(2) {
                Cost::finite(5).unwrap()
            } else {
                Cost::default()
            }
        };
        let (value, cut) = minimum_cost_node_cut(&ladder, n(1), n(6), pricey).unwrap();
        assert_eq!(value, 2);
        assert_eq!(cut, set(&[3, 5]));
    }

    #[test]
    fn test_cost_cut_omega() {
        let ladder = ladder();
        let blocked = |node: NodeId| {
            if node == n(4) || node == n(5) {
                Cost::omega()
            } else {
                Cost::default()
            }
        };
        assert_eq!(minimum_cost_node_cut(&ladder, n(1), n(6), blocked), None);

        let chain = graph(&[(1, 2), (2, 3), (3, 4)]);
        let one_way = |node: NodeId| if node == n(2) { Cost::omega() } else { Cost::default() };
        assert_eq!(minimum_cost_node_cut(&chain, n(1), n(4), one_way), Some((1, set(&[3]))));
    }

    #[test]
    fn test_cost_cut_wide_total() {
        // Two routes from 1 to 4, each priced above half of u64::MAX.
        let square = graph(&[(1, 2), (2, 4), (1, 3), (3, 4)]);
        let half = u64::MAX / 2 + 1;
        let heavy = |_: NodeId| Cost::finite(half).unwrap();
        let (value, cut) = minimum_cost_node_cut(&square, n(1), n(4), heavy).unwrap();
        assert_eq!(value, 2 * u128::from(half));
        assert!(value > u128::from(u64::MAX));
        assert_eq!(cut, set(&[2, 3]));
    }
}
