//! Optimal covariate adjustment sets in causal graphical models.
//!
//! Given a causal DAG, a treatment node _T_ and an outcome node _Y_,
//! an _adjustment set_ is a set of nodes which, when controlled for,
//! yields an unbiased estimate of the causal effect of _T_ on _Y_.
//! The searches implemented here find, among all such sets which
//! include a given set _L_ and are included in a given set _N_, the
//! ones minimizing the asymptotic variance of the estimate, possibly
//! under secondary criteria (inclusion-minimality, cardinality or
//! total cost).
//!
//! Several definitions used throughout the crate are collected below.
//!
//! # Back-door graph
//!
//! The _causal vertices_ relative to _(T, Y)_ are all nodes, other
//! than _T_, lying on directed paths from _T_ to _Y_.  The
//! _forbidden_ set consists of _T_, the causal vertices, and all their
//! descendants; no forbidden node may appear in an adjustment set.
//!
//! The _back-door graph_ is obtained by removing the first edge of
//! every directed path from _T_ to _Y_.  In the back-door graph, any
//! path linking _T_ and _Y_ is a non-causal one.
//!
//! # Moral graph
//!
//! The _moral graph_ of a DAG is the undirected graph in which any
//! two nodes are adjacent iff they are adjacent in the DAG or they
//! share a child.  Restricted to an ancestral set, d-separation in a
//! DAG is equivalent to vertex separation in its moral graph.
//!
//! # H<sub>0</sub> and H<sub>1</sub>
//!
//! _H<sub>0</sub>_ is the moral graph of the back-door graph of the
//! subgraph induced by the ancestors of _L_ &cup; {_T_, _Y_}.  The
//! _ignorable_ nodes are those ancestors, other than _T_ and _Y_,
//! which are forbidden or not in _N_.
//!
//! _H<sub>1</sub>_ is obtained from _H<sub>0</sub>_ by removing all
//! ignorable nodes, linking any two remaining nodes which were linked
//! through ignorable nodes only, and finally linking every node of _L_
//! to both _T_ and _Y_.  Adjustment sets are exactly the vertex cuts
//! separating _T_ from _Y_ in _H<sub>1</sub>_, so that an adjustment
//! set exists iff _T_ and _Y_ aren't adjacent in _H<sub>1</sub>_.
//!
//! # The four searches
//!
//! * The _optimal_ set is the neighbourhood of _Y_ in
//!   _H<sub>1</sub>_.  It is guaranteed to minimize the asymptotic
//!   variance only if _N_ contains all nodes or consists of ancestors
//!   of _L_ &cup; {_T_, _Y_}.
//!
//! * The _optimal minimal_ set is the part of the optimal set which
//!   borders the component of _T_ once the optimal set is removed.
//!
//! * The _optimal minimum_ set is the minimum vertex cut closest to
//!   _Y_.
//!
//! * The _optimal minimum-cost_ set is the vertex cut of minimum total
//!   cost closest to _Y_, given a cost attached to each node.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

mod error;
mod name;
mod node;
mod digraph;
mod ungraph;
mod flow;
mod causal;
mod adjustment;
mod yaml_script;
mod logging;

pub use error::AdjError;
pub use node::{NodeId, NodeSet, Cost};
pub use digraph::{DiGraph, SimplePaths};
pub use ungraph::UnGraph;
pub use flow::{minimum_node_cut_size, node_disjoint_paths, minimum_cost_node_cut};
pub use causal::CausalGraph;
pub use adjustment::{Method, Query};
pub use yaml_script::YamlScript;
pub use logging::Logger;

use std::num::NonZeroUsize;

/// A generic one-based serial identifier.
///
/// Used as a common internal type backing [`NodeId`]s.
pub(crate) type ID = NonZeroUsize;
