use std::{fmt, error::Error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjError {
    InvalidNode(String),
    SameEndpoints(String),
    SelfLoop(String),
    CycleDetected(String, String),
    ForcedNotAncestor(String),
    CostInvalid(String),

    ConditionNotMet,
    NoAdjustment,

    ScriptEmpty,
    ScriptMultiple,
    ScriptNotADict,
    ScriptKeyInvalid(String),
    ScriptEdgeInvalid(String),
    ScriptNodeInvalid,
    ScriptQueryInvalid(String),
}

impl AdjError {
    /// Returns `true` for errors caused by a graph or a query
    /// referring to nodes improperly, as opposed to errors reporting
    /// on graphical conditions of an otherwise well-formed query.
    pub fn is_invalid_node(&self) -> bool {
        use AdjError::*;

        matches!(self, InvalidNode(_) | SameEndpoints(_) | ForcedNotAncestor(_))
    }
}

impl fmt::Display for AdjError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AdjError::*;

        match self {
            InvalidNode(name) => write!(f, "Node '{}' is not in the graph", name),
            SameEndpoints(name) => {
                write!(f, "Node '{}' can't be both the treatment and the outcome", name)
            }
            SelfLoop(name) => write!(f, "Self-loop at node '{}'", name),
            CycleDetected(cause, effect) => {
                write!(f, "Edge '{} -> {}' would create a directed cycle", cause, effect)
            }
            ForcedNotAncestor(name) => write!(
                f,
                "Forced covariate '{}' is neither an ancestor of the treatment nor of the outcome",
                name
            ),
            CostInvalid(text) => write!(f, "Invalid node cost '{}'", text),

            ConditionNotMet => write!(
                f,
                "Conditions to guarantee the existence of an optimal adjustment set are not \
                 satisfied"
            ),
            NoAdjustment => {
                write!(f, "An adjustment set formed by observable variables does not exist")
            }

            ScriptEmpty => write!(f, "YAML description is empty"),
            ScriptMultiple => write!(f, "Multiple YAML descriptions"),
            ScriptNotADict => write!(f, "Bad YAML description (not a dictionary)"),
            ScriptKeyInvalid(key) => write!(f, "Invalid key '{}' in YAML description", key),
            ScriptEdgeInvalid(text) => write!(f, "Invalid edge '{}' in YAML description", text),
            ScriptNodeInvalid => write!(f, "Non-string node name in YAML description"),
            ScriptQueryInvalid(what) => write!(f, "Invalid query in YAML description: {}", what),
        }
    }
}

impl Error for AdjError {}
