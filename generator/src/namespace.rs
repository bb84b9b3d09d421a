use dt_wsdl::NamespaceTable;

use crate::error::ResolveError;

/// A resolved `(namespace, local name)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: String,
    pub local_name: String,
}

/// Maps possibly prefixed type names to namespaces, using the document's prefix table.
#[derive(Copy, Clone, Debug)]
pub struct NamespaceResolver<'a> {
    table: &'a NamespaceTable,
}

impl<'a> NamespaceResolver<'a> {
    pub fn new(table: &'a NamespaceTable) -> Self {
        Self { table }
    }

    /// Resolves `name` against `context`.
    ///
    /// Without a context, the prefix of `name` is looked up (unprefixed names use the default
    /// namespace). With a context, the context is looked up as a prefix, or else taken to be a
    /// URI itself. An unbound prefix is also taken as the URI.
    pub fn resolve(&self, name: &str, context: Option<&str>) -> Result<QName, ResolveError> {
        let (prefix, local_name) = match name.rsplit_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        };
        let namespace = match (context, prefix) {
            (None, Some(prefix)) => self.table.lookup(prefix).unwrap_or(prefix),
            (None, None) => self.table.lookup("").unwrap_or(""),
            (Some(context), _) => self.table.lookup(context).unwrap_or(context),
        };
        if namespace.is_empty() {
            return Err(ResolveError::NamespaceResolution {
                name: name.to_string(),
            });
        }
        Ok(QName {
            namespace: namespace.to_string(),
            local_name: local_name.to_string(),
        })
    }
}
