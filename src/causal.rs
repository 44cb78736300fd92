use std::collections::BTreeMap;
use crate::{NodeId, NodeSet, Cost, DiGraph, UnGraph, AdjError, name::NameSpace};

/// A causal directed acyclic graph over named nodes.
///
/// Instances of this type own node names, the causal structure, and
/// the costs of adjusting for individual nodes.  Edges enter the
/// graph only through [`add_edge()`], which refuses anything that
/// would close a directed cycle, so a `CausalGraph` is a DAG at all
/// times.
///
/// All queries take `&self`; the graphs they derive (back-door
/// graphs, _H<sub>0</sub>_, _H<sub>1</sub>_) are fresh values, built
/// anew for every call.
///
/// [`add_edge()`]: CausalGraph::add_edge()
#[derive(Clone, Default, Debug)]
pub struct CausalGraph {
    names: NameSpace,
    dag:   DiGraph,
    costs: BTreeMap<NodeId, Cost>,
}

impl CausalGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a graph from a list of `(cause, effect)` name pairs.
    pub fn from_edges<I, S, T>(edges: I) -> Result<Self, AdjError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut graph = CausalGraph::new();

        for (cause, effect) in edges {
            graph.add_edge(cause, effect)?;
        }

        Ok(graph)
    }

    // Nodes

    /// Returns the identifier of a node of a given name, inserting the
    /// node if it is new.
    pub fn add_node<S: AsRef<str>>(&mut self, name: S) -> NodeId {
        let id = NodeId(self.names.share_name(name));

        self.dag.add_node(id);

        id
    }

    pub fn get_node_id<S: AsRef<str>>(&self, name: S) -> Option<NodeId> {
        self.names.get_id(name).map(NodeId)
    }

    pub fn get_node_name(&self, node_id: NodeId) -> Option<&str> {
        self.names.get_name(node_id.get())
    }

    /// Like [`get_node_id()`](CausalGraph::get_node_id()), but fails
    /// with [`AdjError::InvalidNode`] for unknown names.
    pub fn node_id<S: AsRef<str>>(&self, name: S) -> Result<NodeId, AdjError> {
        let name = name.as_ref();

        self.get_node_id(name).ok_or_else(|| AdjError::InvalidNode(name.to_owned()))
    }

    pub fn node_set<I, S>(&self, names: I) -> Result<NodeSet, AdjError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| self.node_id(name)).collect()
    }

    #[inline]
    pub fn all_nodes(&self) -> &NodeSet {
        self.dag.nodes()
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.dag.contains(node_id)
    }

    pub(crate) fn name_of(&self, node_id: NodeId) -> String {
        self.get_node_name(node_id).map_or_else(|| format!("{}", node_id), |name| name.to_owned())
    }

    pub(crate) fn check_node(&self, node_id: NodeId) -> Result<(), AdjError> {
        if self.contains(node_id) {
            Ok(())
        } else {
            Err(AdjError::InvalidNode(self.name_of(node_id)))
        }
    }

    pub(crate) fn check_endpoints(
        &self,
        treatment: NodeId,
        outcome: NodeId,
    ) -> Result<(), AdjError> {
        self.check_node(treatment)?;
        self.check_node(outcome)?;

        if treatment == outcome {
            Err(AdjError::SameEndpoints(self.name_of(treatment)))
        } else {
            Ok(())
        }
    }

    /// Renders a set of nodes as a brace-delimited list of names.
    pub fn show_nodes(&self, nodes: &NodeSet) -> String {
        let names: Vec<_> = nodes.iter().map(|&id| self.name_of(id)).collect();

        format!("{{{}}}", names.join(", "))
    }

    // Edges

    /// Adds an edge `cause -> effect`, together with its end nodes if
    /// missing.
    ///
    /// Fails on self-loops and on edges closing a directed cycle; the
    /// graph is left unchanged, apart from possibly new isolated nodes.
    pub fn add_edge<S, T>(&mut self, cause: S, effect: T) -> Result<(), AdjError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let cause_id = self.add_node(cause.as_ref());
        let effect_id = self.add_node(effect.as_ref());

        if cause_id == effect_id {
            Err(AdjError::SelfLoop(cause.as_ref().to_owned()))
        } else if self.dag.has_path(effect_id, cause_id) {
            Err(AdjError::CycleDetected(cause.as_ref().to_owned(), effect.as_ref().to_owned()))
        } else {
            self.dag.add_edge(cause_id, effect_id);

            Ok(())
        }
    }

    pub fn has_edge(&self, cause: NodeId, effect: NodeId) -> bool {
        self.dag.has_edge(cause, effect)
    }

    #[inline]
    pub fn as_digraph(&self) -> &DiGraph {
        &self.dag
    }

    // Costs

    pub fn set_cost(&mut self, node_id: NodeId, cost: Cost) -> Result<(), AdjError> {
        self.check_node(node_id)?;
        self.costs.insert(node_id, cost);

        Ok(())
    }

    pub fn get_cost(&self, node_id: NodeId) -> Cost {
        self.costs.get(&node_id).copied().unwrap_or_default()
    }

    // Graph transformations

    /// Returns the union of `nodes` and all their ancestors.
    pub fn ancestors_all(&self, nodes: &NodeSet) -> Result<NodeSet, AdjError> {
        let mut result = NodeSet::new();

        for &node in nodes.iter() {
            self.check_node(node)?;

            if result.insert(node) {
                result.extend(self.dag.ancestors(node));
            }
        }

        Ok(result)
    }

    /// Returns the back-door graph: a copy of this graph with the
    /// first edge of every directed path from `treatment` to `outcome`
    /// removed.
    pub fn backdoor_graph(&self, treatment: NodeId, outcome: NodeId) -> Result<DiGraph, AdjError> {
        self.check_endpoints(treatment, outcome)?;

        Ok(backdoor_of(&self.dag, treatment, outcome))
    }

    /// Returns the nodes lying on directed paths from `treatment` to
    /// `outcome`, `treatment` excluded.  The result is empty if
    /// `outcome` isn't a descendant of `treatment`.
    pub fn causal_vertices(&self, treatment: NodeId, outcome: NodeId) -> Result<NodeSet, AdjError> {
        self.check_endpoints(treatment, outcome)?;

        let upstream = self.dag.ancestors(outcome);
        let mut result: NodeSet =
            self.dag.descendants(treatment).intersection(&upstream).copied().collect();

        if self.dag.has_path(treatment, outcome) {
            result.insert(outcome);
        }

        Ok(result)
    }

    /// Returns the forbidden set: causal vertices, all their
    /// descendants, and `treatment`.
    pub fn forbidden(&self, treatment: NodeId, outcome: NodeId) -> Result<NodeSet, AdjError> {
        let mut result = NodeSet::new();

        for node in self.causal_vertices(treatment, outcome)? {
            if result.insert(node) {
                result.extend(self.dag.descendants(node));
            }
        }

        result.insert(treatment);

        Ok(result)
    }

    /// Returns the nodes to be contracted away when building
    /// _H<sub>1</sub>_: ancestors of `forced` &cup; {`treatment`,
    /// `outcome`}, other than the two endpoints, which are either
    /// outside `eligible` or forbidden.
    pub fn ignore(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<NodeSet, AdjError> {
        let mut relevant = self.ancestors_all(&with_endpoints(forced, treatment, outcome))?;

        relevant.remove(&treatment);
        relevant.remove(&outcome);

        let forbidden = self.forbidden(treatment, outcome)?;

        Ok(relevant
            .into_iter()
            .filter(|node| !eligible.contains(node) || forbidden.contains(node))
            .collect())
    }

    /// Builds _H<sub>0</sub>_: the moral graph of the back-door graph
    /// of the subgraph induced by ancestors of `forced` &cup;
    /// {`treatment`, `outcome`}.
    pub fn build_h0(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
    ) -> Result<UnGraph, AdjError> {
        self.check_endpoints(treatment, outcome)?;

        let relevant = self.ancestors_all(&with_endpoints(forced, treatment, outcome))?;
        let restricted = self.dag.induced_subgraph(&relevant);
        let h0 = backdoor_of(&restricted, treatment, outcome).moral_graph();

        trace!("H0 has {} nodes and {} edges", h0.nodes().len(), h0.num_edges());

        Ok(h0)
    }

    /// Builds _H<sub>1</sub>_ from _H<sub>0</sub>_ by contracting
    /// ignorable nodes.
    ///
    /// Two retained nodes become adjacent iff they are linked in
    /// _H<sub>0</sub>_ by a path whose interior consists of ignorable
    /// nodes only.  Every forced node is then linked to both
    /// `treatment` and `outcome`.
    pub fn build_h1(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<UnGraph, AdjError> {
        let h0 = self.build_h0(treatment, outcome, forced)?;
        let ignored = self.ignore(treatment, outcome, forced, eligible)?;
        let mut h1 = h0.without_nodes(&ignored);
        let retained: Vec<NodeId> = h1.nodes().iter().copied().collect();

        for (pos, &u) in retained.iter().enumerate() {
            for &v in retained.iter().skip(pos + 1) {
                if !h1.has_edge(u, v) && h0.is_linked_through(u, v, &ignored) {
                    h1.add_edge(u, v);
                }
            }
        }

        for &node in forced.iter() {
            h1.add_edge(treatment, node);
            h1.add_edge(node, outcome);
        }

        trace!(
            "H1 has {} nodes and {} edges, {} ignored",
            h1.nodes().len(),
            h1.num_edges(),
            ignored.len()
        );

        Ok(h1)
    }
}

fn with_endpoints(nodes: &NodeSet, treatment: NodeId, outcome: NodeId) -> NodeSet {
    let mut result = nodes.clone();

    result.insert(treatment);
    result.insert(outcome);

    result
}

/// The first edge of a directed path from `treatment` to `outcome` is
/// any edge `treatment -> c`, such that `c` is `outcome` or one of its
/// ancestors.
fn backdoor_of(dag: &DiGraph, treatment: NodeId, outcome: NodeId) -> DiGraph {
    let mut result = dag.clone();
    let upstream = dag.ancestors(outcome);

    for child in dag.children(treatment) {
        if child == outcome || upstream.contains(&child) {
            result.remove_edge(treatment, child);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // T -> M -> Y, T -> Y, C -> T, C -> Y, M -> D, A -> C, Y -> S
    fn mediated() -> CausalGraph {
        CausalGraph::from_edges(vec![
            ("T", "M"),
            ("M", "Y"),
            ("T", "Y"),
            ("C", "T"),
            ("C", "Y"),
            ("M", "D"),
            ("A", "C"),
            ("Y", "S"),
        ])
        .unwrap()
    }

    fn ids(graph: &CausalGraph, names: &[&str]) -> NodeSet {
        graph.node_set(names).unwrap()
    }

    #[test]
    fn test_add_edge() {
        let mut graph = mediated();
        assert_eq!(graph.num_nodes(), 7);
        assert_eq!(graph.add_edge("Y", "T"), Err(AdjError::CycleDetected("Y".into(), "T".into())));
        assert_eq!(graph.add_edge("S", "A"), Err(AdjError::CycleDetected("S".into(), "A".into())));
        assert_eq!(graph.add_edge("M", "M"), Err(AdjError::SelfLoop("M".into())));
        assert!(graph.add_edge("A", "S").is_ok());
        assert_eq!(graph.node_id("Z"), Err(AdjError::InvalidNode("Z".into())));

        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        assert!(graph.has_edge(t, y));
        assert!(!graph.has_edge(y, t));
    }

    #[test]
    fn test_ancestors_all() {
        let graph = mediated();
        let y = graph.node_id("Y").unwrap();
        assert_eq!(
            graph.ancestors_all(&ids(&graph, &["Y"])).unwrap(),
            ids(&graph, &["A", "C", "T", "M", "Y"])
        );
        assert_eq!(
            graph.ancestors_all(&ids(&graph, &["A", "D"])).unwrap(),
            ids(&graph, &["A", "C", "T", "M", "D"])
        );
        assert!(graph.ancestors_all(&ids(&graph, &["S"])).unwrap().contains(&y));

        for &node in graph.all_nodes() {
            let single = Some(node).into_iter().collect();
            assert!(graph.ancestors_all(&single).unwrap().contains(&node));
        }
    }

    #[test]
    fn test_backdoor_graph() {
        let graph = mediated();
        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        let m = graph.node_id("M").unwrap();
        let c = graph.node_id("C").unwrap();
        let bd = graph.backdoor_graph(t, y).unwrap();

        assert!(!bd.has_edge(t, y));
        assert!(!bd.has_edge(t, m));
        assert!(bd.has_edge(m, y));
        assert!(bd.has_edge(c, t));
        assert_eq!(bd.num_edges(), graph.as_digraph().num_edges() - 2);

        // Same as removing first edges of enumerated paths.
        let mut expected = graph.as_digraph().clone();
        for path in graph.as_digraph().simple_paths(t, y) {
            expected.remove_edge(path[0], path[1]);
        }
        assert_eq!(bd, expected);

        assert_eq!(graph.backdoor_graph(t, t), Err(AdjError::SameEndpoints("T".into())));
    }

    #[test]
    fn test_causal_and_forbidden() {
        let graph = mediated();
        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        let a = graph.node_id("A").unwrap();

        assert_eq!(graph.causal_vertices(t, y).unwrap(), ids(&graph, &["M", "Y"]));
        assert_eq!(graph.forbidden(t, y).unwrap(), ids(&graph, &["T", "M", "Y", "D", "S"]));

        let mut on_paths = NodeSet::new();
        for path in graph.as_digraph().simple_paths(t, y) {
            on_paths.extend(path.into_iter().skip(1));
        }
        assert_eq!(graph.causal_vertices(t, y).unwrap(), on_paths);

        // No directed path from S to A.
        let s = graph.node_id("S").unwrap();
        assert!(graph.causal_vertices(s, a).unwrap().is_empty());
        assert_eq!(graph.forbidden(s, a).unwrap(), ids(&graph, &["S"]));
    }

    #[test]
    fn test_ignore() {
        let graph = mediated();
        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        let all = graph.all_nodes().clone();

        assert_eq!(graph.ignore(t, y, &NodeSet::new(), &all).unwrap(), ids(&graph, &["M"]));
        assert_eq!(
            graph.ignore(t, y, &NodeSet::new(), &ids(&graph, &["T", "Y", "A"])).unwrap(),
            ids(&graph, &["C", "M"])
        );
    }

    #[test]
    fn test_build_h0() {
        let graph = mediated();
        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        let h0 = graph.build_h0(t, y, &NodeSet::new()).unwrap();

        assert_eq!(h0.nodes(), &ids(&graph, &["A", "C", "T", "M", "Y"]));

        // Back-door graph: A -> C, C -> T, C -> Y, M -> Y; married: C - M.
        let id = |name: &str| graph.node_id(name).unwrap();
        let edge = |u: &str, v: &str| h0.has_edge(id(u), id(v));
        assert!(edge("A", "C"));
        assert!(edge("C", "T"));
        assert!(edge("C", "Y"));
        assert!(edge("M", "Y"));
        assert!(edge("C", "M"));
        assert!(!edge("T", "Y"));
        assert!(!edge("T", "M"));
        assert_eq!(h0.num_edges(), 5);
    }

    #[test]
    fn test_build_h1() {
        let graph = mediated();
        let t = graph.node_id("T").unwrap();
        let y = graph.node_id("Y").unwrap();
        let all = graph.all_nodes().clone();
        let h1 = graph.build_h1(t, y, &NodeSet::new(), &all).unwrap();

        // M is contracted: C - Y was already there, nothing new.
        assert_eq!(h1.nodes(), &ids(&graph, &["A", "C", "T", "Y"]));
        assert_eq!(h1.num_edges(), 3);
        assert_eq!(h1, graph.build_h1(t, y, &NodeSet::new(), &all).unwrap());

        let forced = ids(&graph, &["A"]);
        let h1 = graph.build_h1(t, y, &forced, &all).unwrap();
        let a = graph.node_id("A").unwrap();
        assert!(h1.has_edge(t, a));
        assert!(h1.has_edge(a, y));
    }
}
