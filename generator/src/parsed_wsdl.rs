use std::collections::HashMap;
use std::fmt;

use crate::error::{Diagnostic, ResolveError};
use crate::naming::NameAllocator;

/// The resolved shape of a schema type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlType {
    /// A scalar leaf. Unknown type names are kept verbatim.
    Primitive(String),
    Array(Box<XmlType>),
    /// The name of a registered [`Definition`]. Never inlined.
    Reference(String),
    /// A record; fields are in schema declaration order.
    Map(Vec<Field>),
}

impl XmlType {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn array(element: XmlType) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Self::Map(fields) => fields,
            _ => &[],
        }
    }
}

impl fmt::Display for XmlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) => write!(f, "{name}"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Reference(name) => write!(f, "&{name}"),
            Self::Map(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field.name, field.type_)?;
                }
                if !fields.is_empty() {
                    write!(f, " ")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_: XmlType,
}

impl Field {
    pub fn new(name: impl Into<String>, type_: XmlType) -> Self {
        Self {
            name: name.into(),
            type_,
        }
    }
}

/// Index of a [`Definition`] in [`ParsedWsdl::definitions`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(usize);

impl DefinitionId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub source_name: String,
    pub docs: Vec<String>,
    pub type_: XmlType,
}

impl Definition {
    /// A definition whose type is still being resolved.
    pub fn placeholder(name: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_name: source_name.into(),
            docs: Vec::new(),
            type_: XmlType::Map(Vec::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub param_name: String,
    pub param_definition: Option<DefinitionId>,
    pub return_definition: Option<DefinitionId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PortId(usize);

impl PortId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub source_name: String,
    pub methods: Vec<Method>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub source_name: String,
    pub ports: Vec<PortId>,
}

/// Result of one resolution pass: every definition, port and service of a document.
///
/// Definitions are append-only and kept in the order they were first encountered. Their names
/// come from the embedded [`NameAllocator`] and are unique across the pass.
#[derive(Debug, Default)]
pub struct ParsedWsdl {
    pub name: String,
    /// File name of the source document, if known.
    pub wsdl_file_name: Option<String>,
    /// Path or URL the source document was read from, if known.
    pub wsdl_path: Option<String>,
    pub definitions: Vec<Definition>,
    pub ports: Vec<Port>,
    pub services: Vec<Service>,
    pub diagnostics: Vec<Diagnostic>,
    by_name: HashMap<String, DefinitionId>,
    names: NameAllocator,
}

impl ParsedWsdl {
    pub fn new(name: impl Into<String>, names: NameAllocator) -> Self {
        Self {
            name: name.into(),
            names,
            ..Self::default()
        }
    }

    /// Records the path or URL the document was read from. The file name is its last segment,
    /// without any query or fragment.
    pub fn set_source(&mut self, path: &str) {
        let location = path.split(['?', '#']).next().unwrap_or(path);
        self.wsdl_file_name = location
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        self.wsdl_path = Some(path.to_string());
    }

    pub fn allocate_name(&mut self, base: &str) -> Result<String, ResolveError> {
        self.names.allocate(base)
    }

    /// The name a definition derived from `base` would get, were it free.
    pub fn candidate_name(&self, base: &str) -> String {
        self.names.candidate(base)
    }

    /// Appends a definition. Its name must come from [`ParsedWsdl::allocate_name`].
    pub fn push(&mut self, definition: Definition) -> DefinitionId {
        let id = DefinitionId(self.definitions.len());
        self.by_name.insert(definition.name.clone(), id);
        self.definitions.push(definition);
        id
    }

    pub fn find_definition(&self, name: &str) -> Option<DefinitionId> {
        self.by_name.get(name).copied()
    }

    pub fn definition(&self, id: DefinitionId) -> &Definition {
        &self.definitions[id.0]
    }

    /// Fills in a pushed placeholder once its body has been resolved.
    pub(crate) fn complete(&mut self, id: DefinitionId, type_: XmlType, docs: Vec<String>) {
        let definition = &mut self.definitions[id.0];
        definition.type_ = type_;
        definition.docs = docs;
    }

    pub fn add_port(&mut self, port: Port) -> PortId {
        self.ports.push(port);
        PortId(self.ports.len() - 1)
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0]
    }
}

impl fmt::Display for ParsedWsdl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for definition in &self.definitions {
            for doc in &definition.docs {
                writeln!(f, "  /// {doc}")?;
            }
            writeln!(f, "  type {} = {}", definition.name, definition.type_)?;
        }
        let name_of = |id: Option<DefinitionId>| {
            id.map_or_else(|| "()".to_string(), |id| self.definition(id).name.clone())
        };
        for service in &self.services {
            writeln!(f, "  service {}", service.name)?;
            for port in service.ports.iter().map(|id| self.port(*id)) {
                writeln!(f, "    port {}", port.name)?;
                for method in &port.methods {
                    writeln!(
                        f,
                        "      fn {}({}: {}) -> {}",
                        method.name,
                        method.param_name,
                        name_of(method.param_definition),
                        name_of(method.return_definition)
                    )?;
                }
            }
        }
        Ok(())
    }
}
