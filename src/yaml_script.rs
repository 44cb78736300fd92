use std::{fs::File, io::Read, path::Path, error::Error};
use regex::Regex;
use yaml_rust::{Yaml, YamlLoader};
use crate::{CausalGraph, NodeSet, Cost, Query, AdjError};

/// A causal graph together with a list of adjustment queries, as
/// described in a YAML-formatted script.
///
/// The script is a single dictionary:
///
/// ```yaml
/// name: confounder
/// edges: [ "A -> C", "C -> T, Y", "T -> Y -> S" ]
/// nodes: [ Isolated ]
/// costs: { C: 2, A: omega }
/// queries:
///   - { treatment: T, outcome: Y }
///   - { treatment: T, outcome: Y, L: [ A ], N: [ A, C, T, Y ] }
/// ```
///
/// All keys other than `edges` are optional.  An edge description is
/// a chain of one or more arrows, and every arrow links all nodes
/// listed on its left to all nodes listed on its right.  Missing `L`
/// defaults to the empty set, missing `N` to the set of all nodes.
#[derive(Debug)]
pub struct YamlScript {
    name:    Option<String>,
    graph:   CausalGraph,
    queries: Vec<Query>,
}

lazy_static! {
    static ref ARROW_RE: Regex = Regex::new(r"\s*->\s*").unwrap();
    // Node name is a nonempty sequence of words free of commas and
    // angle brackets.
    static ref NAME_RE: Regex = Regex::new(r"^[^\s,<>]+(\s+[^\s,<>]+)*$").unwrap();
}

fn parse_names(description: &str) -> Option<Vec<&str>> {
    description
        .split(',')
        .map(|name| {
            let name = name.trim();

            if NAME_RE.is_match(name) {
                Some(name)
            } else {
                None
            }
        })
        .collect()
}

/// Parses an edge description into a list of `(cause, effect)` pairs.
fn parse_edge_description(description: &str) -> Result<Vec<(&str, &str)>, AdjError> {
    let invalid = || AdjError::ScriptEdgeInvalid(description.to_owned());

    let levels: Vec<Vec<&str>> = ARROW_RE
        .split(description.trim())
        .map(parse_names)
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;

    if levels.len() < 2 {
        return Err(invalid())
    }

    let mut result = Vec::new();

    for pair in levels.windows(2) {
        for &cause in pair[0].iter() {
            for &effect in pair[1].iter() {
                result.push((cause, effect));
            }
        }
    }

    Ok(result)
}

fn query_invalid<S: Into<String>>(what: S) -> AdjError {
    AdjError::ScriptQueryInvalid(what.into())
}

fn key_invalid(key: &str) -> AdjError {
    AdjError::ScriptKeyInvalid(key.to_owned())
}

fn get_strings<'a>(yaml: &'a Yaml, what: &str) -> Result<Vec<&'a str>, AdjError> {
    match yaml {
        Yaml::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| query_invalid(format!("non-string in {}", what)))
            })
            .collect(),
        Yaml::String(single) => Ok(vec![single.as_str()]),
        Yaml::Null => Ok(Vec::new()),
        _ => Err(query_invalid(format!("{} is not a list", what))),
    }
}

fn parse_cost(yaml: &Yaml) -> Result<Cost, AdjError> {
    match yaml {
        Yaml::Integer(value) if *value > 0 => {
            Cost::finite(*value as u64).ok_or_else(|| AdjError::CostInvalid(value.to_string()))
        }
        Yaml::String(text) => text.parse(),
        other => Err(AdjError::CostInvalid(format!("{:?}", other))),
    }
}

impl YamlScript {
    pub fn from_str<S: AsRef<str>>(script: S) -> Result<Self, Box<dyn Error>> {
        let docs = YamlLoader::load_from_str(script.as_ref())?;

        if docs.is_empty() {
            Err(Box::new(AdjError::ScriptEmpty))
        } else if docs.len() > 1 {
            Err(Box::new(AdjError::ScriptMultiple))
        } else {
            Ok(Self::from_yaml(&docs[0])?)
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut fp = File::open(path)?;
        let mut script = String::new();
        fp.read_to_string(&mut script)?;

        Self::from_str(&script)
    }

    fn from_yaml(yaml: &Yaml) -> Result<Self, AdjError> {
        let dict = yaml.as_hash().ok_or(AdjError::ScriptNotADict)?;

        let mut name = None;
        let mut graph = CausalGraph::new();
        let mut costs = None;
        let mut queries = None;

        for (key, value) in dict.iter() {
            match key.as_str() {
                Some("name") => {
                    name = Some(value.as_str().ok_or_else(|| key_invalid("name"))?.to_owned());
                }
                Some("edges") => {
                    let edges = value.as_vec().ok_or_else(|| key_invalid("edges"))?;

                    for edge in edges {
                        let description = edge.as_str().ok_or(AdjError::ScriptNodeInvalid)?;

                        for (cause, effect) in parse_edge_description(description)? {
                            graph.add_edge(cause, effect)?;
                        }
                    }
                }
                Some("nodes") => {
                    let nodes = value.as_vec().ok_or_else(|| key_invalid("nodes"))?;

                    for node in nodes {
                        graph.add_node(node.as_str().ok_or(AdjError::ScriptNodeInvalid)?);
                    }
                }
                // Costs and queries refer to nodes, so they are
                // resolved after the whole graph is known.
                Some("costs") => costs = Some(value),
                Some("queries") => queries = Some(value),
                Some(other) => return Err(AdjError::ScriptKeyInvalid(other.to_owned())),
                None => return Err(AdjError::ScriptKeyInvalid(format!("{:?}", key))),
            }
        }

        if let Some(costs) = costs {
            let costs = costs.as_hash().ok_or_else(|| key_invalid("costs"))?;

            for (node, cost) in costs.iter() {
                let node_id = graph.node_id(node.as_str().ok_or(AdjError::ScriptNodeInvalid)?)?;

                graph.set_cost(node_id, parse_cost(cost)?)?;
            }
        }

        let queries = match queries {
            Some(Yaml::Array(items)) => {
                items.iter().map(|item| Self::parse_query(&graph, item)).collect::<Result<_, _>>()?
            }
            Some(Yaml::Null) | None => Vec::new(),
            Some(_) => return Err(key_invalid("queries")),
        };

        Ok(YamlScript { name, graph, queries })
    }

    fn parse_query(graph: &CausalGraph, yaml: &Yaml) -> Result<Query, AdjError> {
        let dict = yaml.as_hash().ok_or_else(|| query_invalid("not a dictionary"))?;

        let mut treatment = None;
        let mut outcome = None;
        let mut forced = NodeSet::new();
        let mut eligible = None;

        for (key, value) in dict.iter() {
            let single = |what: &str| {
                value.as_str().ok_or_else(|| query_invalid(format!("{} is not a node name", what)))
            };

            match key.as_str() {
                Some("treatment") => treatment = Some(graph.node_id(single("treatment")?)?),
                Some("outcome") => outcome = Some(graph.node_id(single("outcome")?)?),
                Some("L") => forced = graph.node_set(get_strings(value, "L")?)?,
                Some("N") => eligible = Some(graph.node_set(get_strings(value, "N")?)?),
                _ => return Err(query_invalid(format!("unexpected key {:?}", key))),
            }
        }

        let treatment = treatment.ok_or_else(|| query_invalid("missing treatment"))?;
        let outcome = outcome.ok_or_else(|| query_invalid("missing outcome"))?;
        let mut query = Query::new(graph, treatment, outcome).with_forced(forced);

        if let Some(eligible) = eligible {
            query = query.with_eligible(eligible);
        }

        Ok(query)
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get_graph(&self) -> &CausalGraph {
        &self.graph
    }

    pub fn get_queries(&self) -> &[Query] {
        self.queries.as_slice()
    }

    pub fn into_parts(self) -> (CausalGraph, Vec<Query>) {
        (self.graph, self.queries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn script_error(script: &str) -> AdjError {
        let err = YamlScript::from_str(script).unwrap_err();

        err.downcast_ref::<AdjError>().cloned().unwrap()
    }

    #[test]
    fn test_edge_description() {
        assert_eq!(parse_edge_description("A -> B").unwrap(), vec![("A", "B")]);
        assert_eq!(
            parse_edge_description("A, B -> C -> D").unwrap(),
            vec![("A", "C"), ("B", "C"), ("C", "D")]
        );
        assert_eq!(parse_edge_description("low income->T").unwrap(), vec![("low income", "T")]);
        assert!(parse_edge_description("A").is_err());
        assert!(parse_edge_description("A -> ").is_err());
        assert!(parse_edge_description("A, -> B").is_err());
        assert!(parse_edge_description("A -> B >").is_err());
    }

    #[test]
    fn test_script() {
        let script = YamlScript::from_str(
            r"
name: confounder
edges: [ 'A -> C', 'C -> T, Y', 'T -> Y -> S' ]
nodes: [ Isolated ]
costs: { C: 2, A: omega }
queries:
  - { treatment: T, outcome: Y }
  - { treatment: T, outcome: Y, L: [ A ], N: [ A, C, T, Y ] }
",
        )
        .unwrap();

        assert_eq!(script.get_name(), Some("confounder"));

        let graph = script.get_graph();
        assert_eq!(graph.num_nodes(), 6);
        assert_eq!(graph.get_cost(graph.node_id("C").unwrap()), Cost::finite(2).unwrap());
        assert_eq!(graph.get_cost(graph.node_id("A").unwrap()), Cost::omega());
        assert_eq!(graph.get_cost(graph.node_id("T").unwrap()), Cost::default());

        let queries = script.get_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(&queries[0].eligible, graph.all_nodes());
        assert!(queries[0].forced.is_empty());
        assert_eq!(queries[1].forced, graph.node_set(&["A"]).unwrap());

        let c = graph.node_set(&["C"]).unwrap();
        assert_eq!(queries[0].run(graph, Method::Optimal), Ok(c.clone()));
        assert_eq!(queries[0].run(graph, Method::OptimalMincost), Ok(c));
        let a_c = graph.node_set(&["A", "C"]).unwrap();
        assert_eq!(queries[1].run(graph, Method::Optimal), Ok(a_c));
    }

    #[test]
    fn test_script_errors() {
        assert_eq!(script_error(""), AdjError::ScriptEmpty);
        assert_eq!(script_error("--- 1\n--- 2\n"), AdjError::ScriptMultiple);
        assert_eq!(script_error("[ 'A -> B' ]"), AdjError::ScriptNotADict);
        assert_eq!(
            script_error("edges: [ 'A -> B' ]\nweights: {}"),
            AdjError::ScriptKeyInvalid("weights".into())
        );
        assert_eq!(script_error("edges: [ 'A B' ]"), AdjError::ScriptEdgeInvalid("A B".into()));
        assert_eq!(
            script_error("edges: [ 'A -> B', 'B -> A' ]"),
            AdjError::CycleDetected("B".into(), "A".into())
        );
        assert_eq!(
            script_error("edges: [ 'A -> B' ]\ncosts: { A: 0 }"),
            AdjError::CostInvalid("Integer(0)".into())
        );
        assert_eq!(
            script_error("edges: [ 'A -> B' ]\ncosts: { Z: 1 }"),
            AdjError::InvalidNode("Z".into())
        );
        assert_eq!(
            script_error("edges: [ 'A -> B' ]\nqueries: [ { treatment: A } ]"),
            AdjError::ScriptQueryInvalid("missing outcome".into())
        );
        assert_eq!(
            script_error("edges: [ 'A -> B' ]\nqueries: [ { treatment: A, outcome: C } ]"),
            AdjError::InvalidNode("C".into())
        );
    }
}
