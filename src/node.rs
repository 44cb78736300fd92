use std::{collections::BTreeSet, fmt, str::FromStr};
use crate::{ID, AdjError};

/// An identifier of a single node of a causal graph.
///
/// There is no type `Node` in _optadj_: the algorithms need nothing
/// beyond node identity.  Names are resolved through the
/// [`CausalGraph`] which issued the identifier, and identifiers issued
/// by different graphs aren't interchangeable.
///
/// [`CausalGraph`]: crate::CausalGraph
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(pub(crate) ID);

impl NodeId {
    #[inline]
    pub const fn get(self) -> ID {
        self.0
    }
}

impl From<NodeId> for ID {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered set of nodes.  All set-valued results are of this type.
pub type NodeSet = BTreeSet<NodeId>;

/// The price of adjusting for a node.
///
/// Valid costs are positive integers or _&omega;_ (infinite cost),
/// the latter marking a node which may never be selected.  The
/// default value is 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Cost(u64);

impl Cost {
    #[inline]
    pub const fn omega() -> Self {
        Cost(u64::MAX)
    }

    pub fn finite(value: u64) -> Option<Self> {
        if value > 0 && value < u64::MAX {
            Some(Cost(value))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_omega(self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0 < u64::MAX
    }

    #[inline]
    pub(crate) fn get(self) -> u64 {
        self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost(1)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_omega() {
            write!(f, "\u{03c9}")
        } else {
            self.0.fmt(f)
        }
    }
}

impl FromStr for Cost {
    type Err = AdjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "omega" | "\u{03c9}" | "inf" => Ok(Cost::omega()),
            v => v
                .parse::<u64>()
                .ok()
                .and_then(Cost::finite)
                .ok_or_else(|| AdjError::CostInvalid(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_parse() {
        assert_eq!("3".parse::<Cost>().unwrap(), Cost::finite(3).unwrap());
        assert_eq!("omega".parse::<Cost>().unwrap(), Cost::omega());
        assert!("0".parse::<Cost>().is_err());
        assert!("-1".parse::<Cost>().is_err());
        assert!("x".parse::<Cost>().is_err());
    }

    #[test]
    fn test_cost_order() {
        assert!(Cost::default() < Cost::finite(2).unwrap());
        assert!(Cost::finite(1000).unwrap() < Cost::omega());
        assert!(Cost::omega().is_omega());
        assert!(!Cost::omega().is_finite());
        assert_eq!(format!("{}", Cost::default()), "1");
    }
}
