use std::collections::HashMap;

/// The XML Schema namespace. Types from it are primitive leaves.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The SOAP 1.1 encoding namespace, home of the `Array` base type and its `arrayType` attribute.
pub const SOAP_ENCODING_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

pub const WSDL_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/";

/// Prefix to namespace URI table of a whole document.
///
/// The default namespace (`xmlns="..."`) is stored under the empty prefix. The first declaration
/// of a prefix wins; later redeclarations in nested scopes are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    prefixes: HashMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `prefix`, unless it is already bound. Returns whether the binding was added.
    pub fn declare(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> bool {
        let prefix = prefix.into();
        if self.prefixes.contains_key(&prefix) {
            return false;
        }
        self.prefixes.insert(prefix, uri.into());
        true
    }

    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Finds a prefix bound to `uri`. The shortest (then alphabetically first) prefix is returned
    /// so the answer does not depend on hash order.
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .filter(|(prefix, bound)| !prefix.is_empty() && bound.as_str() == uri)
            .map(|(prefix, _)| prefix.as_str())
            .min_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
