use std::collections::HashMap;
use std::fmt;

/// Index of a [`SchemaNode`] in the node arena of a [`Definitions`](crate::Definitions).
///
/// Node ids double as node identity: two references to the same id are references to the same
/// raw schema node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<node #{}>", self.0)
    }
}

/// The shapes of schema nodes the resolver distinguishes. Everything else is a [`Leaf`].
///
/// [`Leaf`]: NodeKind::Leaf
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    ComplexType,
    /// `xs:sequence`, and `xs:all` which has the same field semantics.
    Sequence,
    Element,
    Attribute,
    ComplexContent,
    Extension,
    Restriction,
    /// Any other node; carries the local tag name it was read from.
    Leaf(String),
}

/// A node of the loaded schema graph: kind, attributes, children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    /// The target namespace of the schema this node was declared in.
    pub namespace: Option<String>,
    /// Attributes by local name, in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<NodeId>,
    pub text: Option<String>,
    /// Text of `xs:annotation/xs:documentation` children.
    pub documentation: Vec<String>,
}

impl SchemaNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            documentation: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The value of the `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

/// The named top-level components of one target namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub target_namespace: String,
    pub complex_types: HashMap<String, NodeId>,
    pub elements: HashMap<String, NodeId>,
    /// Simple type name to the qualified name of its base type.
    pub simple_types: HashMap<String, String>,
}

impl Schema {
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            ..Self::default()
        }
    }
}
