use std::collections::HashMap;

use crate::{
    Binding, BindingId, Message, NamespaceTable, NodeId, PartBag, PartBagId, Schema, SchemaNode,
    Service,
};

/// A loaded service description.
///
/// This is the read-only surface the type resolver works against: a namespace table, schema
/// nodes addressed by [`NodeId`], part bags addressed by [`PartBagId`], messages, bindings and
/// services. Loaders (such as [`read_wsdl`](crate::read_wsdl)) fill it through the `add_*`
/// methods.
#[derive(Clone, Debug, Default)]
pub struct Definitions {
    pub target_namespace: Option<String>,
    namespaces: NamespaceTable,
    schemas: HashMap<String, Schema>,
    nodes: Vec<SchemaNode>,
    part_bags: Vec<PartBag>,
    messages: HashMap<String, Message>,
    bindings: Vec<Binding>,
    services: Vec<Service>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    pub fn schema(&self, namespace: &str) -> Option<&Schema> {
        self.schemas.get(namespace)
    }

    /// Returns the schema for `namespace`, creating an empty one first if needed.
    pub fn schema_mut(&mut self, namespace: &str) -> &mut Schema {
        self.schemas
            .entry(namespace.to_string())
            .or_insert_with(|| Schema::new(namespace))
    }

    pub fn complex_type(&self, namespace: &str, name: &str) -> Option<NodeId> {
        self.schema(namespace)?.complex_types.get(name).copied()
    }

    pub fn element(&self, namespace: &str, name: &str) -> Option<NodeId> {
        self.schema(namespace)?.elements.get(name).copied()
    }

    /// The qualified base type name of a named simple type.
    pub fn simple_type(&self, namespace: &str, name: &str) -> Option<&str> {
        self.schema(namespace)?
            .simple_types
            .get(name)
            .map(String::as_str)
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    pub fn add_node(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn part_bag(&self, id: PartBagId) -> &PartBag {
        &self.part_bags[id.index()]
    }

    pub fn add_part_bag(&mut self, bag: PartBag) -> PartBagId {
        let id = PartBagId::from_index(self.part_bags.len());
        self.part_bags.push(bag);
        id
    }

    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.get(name)
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.insert(message.name.clone(), message);
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0]
    }

    pub fn find_binding(&self, name: &str) -> Option<BindingId> {
        self.bindings
            .iter()
            .position(|b| b.name == name)
            .map(BindingId)
    }

    pub fn add_binding(&mut self, binding: Binding) -> BindingId {
        self.bindings.push(binding);
        BindingId(self.bindings.len() - 1)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }
}
