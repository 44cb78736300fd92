use std::collections::HashMap;
use crate::ID;

/// A variable name, interned.
type Name = string_cache::DefaultAtom;

/// Variable names of a single causal graph.
///
/// A variable is registered once, on first mention in an edge or in
/// the node list, and keeps its [`ID`] for the lifetime of the graph.
/// Identifiers are issued in registration order, starting from 1.
#[derive(Clone, Debug)]
pub(crate) struct NameSpace {
    names: Vec<Name>,
    ids:   HashMap<Name, ID>,
}

impl NameSpace {
    pub(crate) fn get_name(&self, id: ID) -> Option<&str> {
        self.names.get(id.get()).map(|n| n.as_ref())
    }

    pub(crate) fn get_id<S: AsRef<str>>(&self, name: S) -> Option<ID> {
        self.ids.get(&Name::from(name.as_ref())).copied()
    }

    pub(crate) fn share_name<S: AsRef<str>>(&mut self, name: S) -> ID {
        self.ids.get(&Name::from(name.as_ref())).copied().unwrap_or_else(|| {
            // Slot zero holds the empty name, hence the length is never zero.
            let id = ID::new(self.names.len()).unwrap_or_else(|| unreachable!());
            let name = Name::from(name.as_ref());

            self.names.push(name.clone());
            self.ids.insert(name, id);

            id
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len() - 1
    }
}

impl Default for NameSpace {
    fn default() -> Self {
        Self { names: vec![Name::from("")], ids: Default::default() }
    }
}
