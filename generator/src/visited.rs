use std::collections::HashMap;

use dt_wsdl::{NodeId, PartBagId};

use crate::namespace::QName;

/// What a definition was resolved from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisitKey {
    /// A named schema type.
    Qualified(QName),
    /// An anonymous schema node, by identity.
    Node(NodeId),
    /// A part bag, by identity.
    Parts(PartBagId),
}

/// Append-only record of the definition name allocated for each resolved key.
///
/// Entries are added before the body of a definition is resolved, so a key that is seen again
/// while its own body is being resolved yields a back-reference instead of recursing.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    names: HashMap<VisitKey, String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &VisitKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: VisitKey, name: String) {
        let previous = self.names.insert(key, name);
        debug_assert!(previous.is_none(), "visited entries are never replaced");
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
