use std::fmt;

use crate::NodeId;

/// Index of a [`PartBag`] in a [`Definitions`](crate::Definitions); also its identity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartBagId(u32);

impl PartBagId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PartBagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<parts #{}>", self.0)
    }
}

/// Name of the sentinel part some loaders leave behind when they fail to describe a message.
pub const UNDEFINED_PART: &str = "undefined";

/// Name of the marker part carrying the prefix bound to the target namespace.
pub const TARGET_NS_ALIAS_PART: &str = "targetNSAlias";

/// Name of the marker part carrying the target namespace URI.
pub const TARGET_NAMESPACE_PART: &str = "targetNamespace";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartValue {
    /// A (possibly prefixed) type name, e.g. `xsd:string` or `tns:Employee`.
    Type(String),
    /// A schema node, usually an element declaration.
    Node(NodeId),
    /// A nested, anonymous bag of parts.
    Bag(PartBagId),
    /// No value at all. Only meaningful together with [`UNDEFINED_PART`].
    Undefined,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub value: PartValue,
}

impl Part {
    pub fn new(name: impl Into<String>, value: PartValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn is_marker(&self) -> bool {
        self.name == TARGET_NS_ALIAS_PART || self.name == TARGET_NAMESPACE_PART
    }
}

/// A flat, ordered name to type-hint map describing a message payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartBag {
    pub parts: Vec<Part>,
}

impl PartBag {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Whether the bag contains the `undefined` sentinel left by a failed description.
    pub fn has_undefined_sentinel(&self) -> bool {
        self.parts
            .iter()
            .any(|p| p.name == UNDEFINED_PART && p.value == PartValue::Undefined)
    }
}

/// The element a document-style message refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageElement {
    pub name: String,
    /// The declared `type` of the element, if it has one.
    pub type_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub element: Option<MessageElement>,
    pub parts: Option<PartBagId>,
}
