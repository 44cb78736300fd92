//! Searches for adjustment sets.
//!
//! Every search starts by building _H<sub>1</sub>_ for the given
//! treatment, outcome, forced set _L_ and eligible set _N_, and then
//! reduces the problem to a question about vertex separation of the
//! treatment from the outcome in _H<sub>1</sub>_.  An adjustment set
//! formed by eligible nodes exists iff the two aren't adjacent in
//! _H<sub>1</sub>_.

use std::fmt;
use crate::{
    CausalGraph, NodeId, NodeSet, UnGraph, AdjError,
    flow::{minimum_node_cut_size, node_disjoint_paths, minimum_cost_node_cut},
};

/// Kinds of adjustment sets.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Method {
    /// Variance-optimal among all valid sets.
    Optimal,
    /// Smallest among optimal sets, by inclusion.
    OptimalMinimal,
    /// Of minimum cardinality, and optimal among such sets.
    OptimalMinimum,
    /// Of minimum total cost, and optimal among such sets.
    OptimalMincost,
}

impl Method {
    pub fn all() -> [Method; 4] {
        [Method::Optimal, Method::OptimalMinimal, Method::OptimalMinimum, Method::OptimalMincost]
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Optimal => write!(f, "optimal"),
            Method::OptimalMinimal => write!(f, "optimal minimal"),
            Method::OptimalMinimum => write!(f, "optimal minimum"),
            Method::OptimalMincost => write!(f, "optimal minimum-cost"),
        }
    }
}

/// Parameters of a single adjustment-set search.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Query {
    pub treatment: NodeId,
    pub outcome:   NodeId,
    /// Nodes which have to be included in any adjustment set.
    pub forced:    NodeSet,
    /// Nodes which may be adjusted for.
    pub eligible:  NodeSet,
}

impl Query {
    /// Creates a query with no forced nodes and all nodes of `graph`
    /// eligible.
    pub fn new(graph: &CausalGraph, treatment: NodeId, outcome: NodeId) -> Self {
        Query { treatment, outcome, forced: NodeSet::new(), eligible: graph.all_nodes().clone() }
    }

    pub fn with_forced(mut self, forced: NodeSet) -> Self {
        self.forced = forced;
        self
    }

    pub fn with_eligible(mut self, eligible: NodeSet) -> Self {
        self.eligible = eligible;
        self
    }

    pub fn run(&self, graph: &CausalGraph, method: Method) -> Result<NodeSet, AdjError> {
        let (t, y, forced, eligible) = (self.treatment, self.outcome, &self.forced, &self.eligible);

        match method {
            Method::Optimal => graph.optimal_adj_set(t, y, forced, eligible),
            Method::OptimalMinimal => graph.optimal_minimal_adj_set(t, y, forced, eligible),
            Method::OptimalMinimum => graph.optimal_minimum_adj_set(t, y, forced, eligible),
            Method::OptimalMincost => graph.optimal_mincost_adj_set(t, y, forced, eligible),
        }
    }
}

impl CausalGraph {
    /// Checks query parameters and builds _H<sub>1</sub>_, failing
    /// with [`AdjError::NoAdjustment`] if `treatment` and `outcome`
    /// are adjacent in it.
    fn prepare(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<UnGraph, AdjError> {
        self.check_endpoints(treatment, outcome)?;

        for &node in eligible.iter() {
            self.check_node(node)?;
        }

        let mut endpoints = NodeSet::new();

        endpoints.insert(treatment);
        endpoints.insert(outcome);

        let upstream = self.ancestors_all(&endpoints)?;

        for &node in forced.iter() {
            self.check_node(node)?;

            if !upstream.contains(&node) || endpoints.contains(&node) {
                return Err(AdjError::ForcedNotAncestor(self.name_of(node)))
            }
        }

        let h1 = self.build_h1(treatment, outcome, forced, eligible)?;

        if h1.has_edge(treatment, outcome) {
            debug!(
                "No adjustment set for {} -> {}",
                self.name_of(treatment),
                self.name_of(outcome)
            );

            Err(AdjError::NoAdjustment)
        } else {
            Ok(h1)
        }
    }

    fn report(
        &self,
        method: Method,
        treatment: NodeId,
        outcome: NodeId,
        result: NodeSet,
    ) -> NodeSet {
        debug!(
            "The {} adjustment set for {} -> {} is {}",
            method,
            self.name_of(treatment),
            self.name_of(outcome),
            self.show_nodes(&result)
        );

        result
    }

    /// Returns the boundary of the connected component of `treatment`
    /// in `graph` with `blocked` nodes removed.
    pub fn unblocked(graph: &UnGraph, treatment: NodeId, blocked: &NodeSet) -> NodeSet {
        let component = graph.without_nodes(blocked).connected_component(treatment);

        graph.node_boundary(&component)
    }

    /// Returns `true` iff `node` belongs to some minimum vertex cut
    /// separating `treatment` from `outcome` in `graph`.
    ///
    /// Linking `node` to both ends forces it into every vertex cut, so
    /// the minimum cut size stays the same iff some minimum cut
    /// already contained `node`.
    pub fn is_in_minimum(
        graph: &UnGraph,
        treatment: NodeId,
        outcome: NodeId,
        node: NodeId,
    ) -> bool {
        if node == treatment || node == outcome {
            return false
        }

        let before = minimum_node_cut_size(graph, treatment, outcome);

        let mut modified = graph.clone();

        modified.add_edge(treatment, node);
        modified.add_edge(outcome, node);

        let after = minimum_node_cut_size(&modified, treatment, outcome);

        before.is_some() && before == after
    }

    /// Returns the optimal adjustment set: the neighbourhood of
    /// `outcome` in _H<sub>1</sub>_.
    ///
    /// Optimality is guaranteed only if `eligible` is the set of all
    /// nodes, or if it consists of ancestors of `forced` &cup;
    /// {`treatment`, `outcome`}; otherwise the search fails with
    /// [`AdjError::ConditionNotMet`].
    pub fn optimal_adj_set(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<NodeSet, AdjError> {
        let h1 = self.prepare(treatment, outcome, forced, eligible)?;

        let mut relevant = forced.clone();

        relevant.insert(treatment);
        relevant.insert(outcome);

        if eligible == self.all_nodes() || eligible.is_subset(&self.ancestors_all(&relevant)?) {
            let result = h1.neighbors(outcome).collect();

            Ok(self.report(Method::Optimal, treatment, outcome, result))
        } else {
            Err(AdjError::ConditionNotMet)
        }
    }

    /// Returns the optimal minimal adjustment set: the part of the
    /// neighbourhood of `outcome` in _H<sub>1</sub>_ which is reachable
    /// from `treatment` without crossing the neighbourhood itself.
    pub fn optimal_minimal_adj_set(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<NodeSet, AdjError> {
        let h1 = self.prepare(treatment, outcome, forced, eligible)?;
        let closest: NodeSet = h1.neighbors(outcome).collect();
        let result = CausalGraph::unblocked(&h1, treatment, &closest);

        Ok(self.report(Method::OptimalMinimal, treatment, outcome, result))
    }

    /// Returns the optimal minimum adjustment set: a minimum vertex cut
    /// between `treatment` and `outcome` in _H<sub>1</sub>_, closest to
    /// `outcome`.
    ///
    /// Along each of a maximum number of node-disjoint paths from
    /// `outcome` to `treatment`, the first node belonging to some
    /// minimum cut is selected.
    pub fn optimal_minimum_adj_set(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<NodeSet, AdjError> {
        let h1 = self.prepare(treatment, outcome, forced, eligible)?;
        let mut result = NodeSet::new();

        if !h1.connected_component(treatment).contains(&outcome) {
            return Ok(self.report(Method::OptimalMinimum, treatment, outcome, result))
        }

        let in_minimum =
            |&&node: &&NodeId| CausalGraph::is_in_minimum(&h1, treatment, outcome, node);

        for path in node_disjoint_paths(&h1, outcome, treatment) {
            let interior = path.iter().skip(1).take(path.len().saturating_sub(2));

            if let Some(&node) = interior.clone().find(&in_minimum) {
                result.insert(node);
            } else {
                // A maximum set of disjoint paths crosses every
                // minimum cut, one node per path.
                warn!(
                    "No minimum cut node on path {}",
                    self.show_nodes(&interior.copied().collect())
                );
            }
        }

        Ok(self.report(Method::OptimalMinimum, treatment, outcome, result))
    }

    /// Returns the optimal minimum-cost adjustment set: a vertex cut
    /// between `treatment` and `outcome` in _H<sub>1</sub>_ of minimum
    /// total cost, closest to `outcome` among such cuts.
    ///
    /// Node costs are taken from this graph (see
    /// [`set_cost()`](CausalGraph::set_cost())); with unit costs the
    /// result coincides with
    /// [`optimal_minimum_adj_set()`](CausalGraph::optimal_minimum_adj_set()).
    /// Fails with [`AdjError::NoAdjustment`] if every separating set
    /// includes a node of infinite cost.
    pub fn optimal_mincost_adj_set(
        &self,
        treatment: NodeId,
        outcome: NodeId,
        forced: &NodeSet,
        eligible: &NodeSet,
    ) -> Result<NodeSet, AdjError> {
        let h1 = self.prepare(treatment, outcome, forced, eligible)?;

        if !h1.connected_component(treatment).contains(&outcome) {
            return Ok(self.report(Method::OptimalMincost, treatment, outcome, NodeSet::new()))
        }

        let (total, result) =
            minimum_cost_node_cut(&h1, outcome, treatment, |node| self.get_cost(node))
                .ok_or(AdjError::NoAdjustment)?;

        debug!("Minimum adjustment cost is {}", total);

        Ok(self.report(Method::OptimalMincost, treatment, outcome, result))
    }
}
