use std::collections::HashMap;

use roxmltree::Node;

use crate::{
    error::WsdlError,
    message::{TARGET_NAMESPACE_PART, TARGET_NS_ALIAS_PART, UNDEFINED_PART},
    Binding, Definitions, Message, MessageElement, NodeId, NodeKind, Operation, OperationIo, Part,
    PartBag, PartBagId, PartValue, Port, SchemaNode, Service,
};

/// Strips the prefix off a qualified name.
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, WsdlError> {
    node.attribute(attribute)
        .ok_or(WsdlError::MissingAttribute { element, attribute })
}

fn declare_namespaces(definitions: &mut Definitions, node: Node) {
    for namespace in node.namespaces() {
        definitions
            .namespaces_mut()
            .declare(namespace.name().unwrap_or(""), namespace.uri());
    }
}

/// Resolves a qualified name in the scope of `context` to `(namespace, local name)`.
fn qualified(qname: &str, context: Node) -> Result<(String, String), WsdlError> {
    let (prefix, local) = match qname.rsplit_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    };
    let namespace = context
        .lookup_namespace_uri(prefix)
        .ok_or_else(|| WsdlError::NamePrefixNotResolved(prefix.unwrap_or("").to_string()))?;
    Ok((namespace.to_string(), local.to_string()))
}

fn node_kind(tag: &str) -> NodeKind {
    match tag {
        "complexType" => NodeKind::ComplexType,
        "sequence" | "all" => NodeKind::Sequence,
        "element" => NodeKind::Element,
        "attribute" => NodeKind::Attribute,
        "complexContent" => NodeKind::ComplexContent,
        "extension" => NodeKind::Extension,
        "restriction" => NodeKind::Restriction,
        other => NodeKind::Leaf(other.to_string()),
    }
}

fn map_node(definitions: &mut Definitions, node: Node, target_namespace: &str) -> NodeId {
    let mut schema_node =
        SchemaNode::new(node_kind(node.tag_name().name())).with_namespace(target_namespace);
    for attribute in node.attributes() {
        schema_node
            .attributes
            .push((attribute.name().to_string(), attribute.value().to_string()));
    }
    for child in node.children().filter(Node::is_element) {
        if child.tag_name().name() == "annotation" {
            schema_node.documentation.extend(
                children_named(child, "documentation")
                    .filter_map(|d| d.text())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            );
            continue;
        }
        let child = map_node(definitions, child, target_namespace);
        schema_node.children.push(child);
    }
    schema_node.text = node
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    definitions.add_node(schema_node)
}

fn read_schema(definitions: &mut Definitions, schema: Node) {
    let target_namespace = schema.attribute("targetNamespace").unwrap_or("").to_string();
    definitions.schema_mut(&target_namespace);

    for top_level in schema.children().filter(Node::is_element) {
        let Some(name) = top_level.attribute("name") else {
            continue;
        };
        match top_level.tag_name().name() {
            "complexType" => {
                let id = map_node(definitions, top_level, &target_namespace);
                definitions
                    .schema_mut(&target_namespace)
                    .complex_types
                    .insert(name.to_string(), id);
            }
            "element" => {
                let id = map_node(definitions, top_level, &target_namespace);
                definitions
                    .schema_mut(&target_namespace)
                    .elements
                    .insert(name.to_string(), id);
            }
            "simpleType" => {
                let base = top_level
                    .descendants()
                    .find(|d| d.tag_name().name() == "restriction")
                    .and_then(|r| r.attribute("base"))
                    .unwrap_or("string");
                definitions
                    .schema_mut(&target_namespace)
                    .simple_types
                    .insert(name.to_string(), base.to_string());
            }
            _ => {}
        }
    }
}

/// Collects the element declarations making up the content of a complex type, descending through
/// sequences.
fn content_elements(definitions: &Definitions, id: NodeId, out: &mut Vec<NodeId>) {
    for child in definitions.node(id).children.iter().copied() {
        match definitions.node(child).kind {
            NodeKind::Element => out.push(child),
            NodeKind::Sequence => content_elements(definitions, child, out),
            _ => {}
        }
    }
}

/// Builds the part bag describing a global element: marker parts first, then one part per
/// element of its content.
fn element_part_bag(definitions: &Definitions, namespace: &str, element: NodeId) -> PartBag {
    let mut parts = Vec::new();
    if !namespace.is_empty() {
        if let Some(alias) = definitions.namespaces().prefix_of(namespace) {
            parts.push(Part::new(
                TARGET_NS_ALIAS_PART,
                PartValue::Type(alias.to_string()),
            ));
        }
        parts.push(Part::new(
            TARGET_NAMESPACE_PART,
            PartValue::Type(namespace.to_string()),
        ));
    }

    let node = definitions.node(element);
    let content = match node.attribute("type") {
        Some(type_name) => {
            let prefix = type_name.rsplit_once(':').map_or("", |(prefix, _)| prefix);
            definitions
                .namespaces()
                .lookup(prefix)
                .and_then(|ns| definitions.complex_type(ns, local_name(type_name)))
        }
        None => node
            .children
            .iter()
            .copied()
            .find(|c| definitions.node(*c).kind == NodeKind::ComplexType),
    };

    match content {
        Some(content) => {
            let mut elements = Vec::new();
            content_elements(definitions, content, &mut elements);
            for id in elements {
                let child = definitions.node(id);
                let name = child
                    .name()
                    .or_else(|| child.attribute("ref").map(local_name))
                    .unwrap_or(UNDEFINED_PART);
                parts.push(Part::new(name, PartValue::Node(id)));
            }
        }
        None => {
            if let (Some(name), Some(type_name)) = (node.name(), node.attribute("type")) {
                parts.push(Part::new(name, PartValue::Type(type_name.to_string())));
            }
        }
    }
    PartBag::new(parts)
}

fn read_message(
    definitions: &mut Definitions,
    element_bags: &mut HashMap<(String, String), PartBagId>,
    message: Node,
) -> Result<Message, WsdlError> {
    let name = required_attribute(message, "message", "name")?.to_string();
    let parts: Vec<Node> = children_named(message, "part").collect();

    if let Some(part) = parts.iter().find(|p| p.attribute("element").is_some()) {
        let element_qname = required_attribute(*part, "part", "element")?;
        let (namespace, local) = qualified(element_qname, *part)?;
        let element_node = definitions.element(&namespace, &local);
        let element = MessageElement {
            name: local.clone(),
            type_name: element_node
                .and_then(|id| definitions.node(id).attribute("type"))
                .map(str::to_string),
        };

        let key = (namespace, local);
        let bag = match element_bags.get(&key) {
            Some(bag) => *bag,
            None => {
                let bag = match element_node {
                    Some(id) => element_part_bag(definitions, &key.0, id),
                    None => PartBag::new(vec![Part::new(UNDEFINED_PART, PartValue::Undefined)]),
                };
                let bag = definitions.add_part_bag(bag);
                element_bags.insert(key, bag);
                bag
            }
        };
        return Ok(Message {
            name,
            element: Some(element),
            parts: Some(bag),
        });
    }

    let mut bag = Vec::new();
    for part in parts {
        let part_name = required_attribute(part, "part", "name")?;
        let type_name = required_attribute(part, "part", "type")?;
        bag.push(Part::new(part_name, PartValue::Type(type_name.to_string())));
    }
    let parts = if bag.is_empty() {
        None
    } else {
        Some(definitions.add_part_bag(PartBag::new(bag)))
    };
    Ok(Message {
        name,
        element: None,
        parts,
    })
}

fn read_operation_io(operation: Node, direction: &'static str) -> Option<OperationIo> {
    let io = children_named(operation, direction).next()?;
    let message = io.attribute("message").map(local_name).unwrap_or("");
    Some(OperationIo {
        name: io.attribute("name").map(str::to_string),
        message: message.to_string(),
    })
}

fn read_port_type(port_type: Node) -> Result<Vec<Operation>, WsdlError> {
    children_named(port_type, "operation")
        .map(|operation| {
            Ok(Operation {
                name: required_attribute(operation, "operation", "name")?.to_string(),
                input: read_operation_io(operation, "input"),
                output: read_operation_io(operation, "output"),
            })
        })
        .collect()
}

fn read_binding(
    binding: Node,
    port_types: &HashMap<String, Vec<Operation>>,
) -> Result<Binding, WsdlError> {
    let name = required_attribute(binding, "binding", "name")?.to_string();
    let port_type = local_name(required_attribute(binding, "binding", "type")?);
    let abstract_operations = port_types
        .get(port_type)
        .ok_or_else(|| WsdlError::PortTypeNotFound(name.clone()))?;

    let mut operations = Vec::new();
    for operation in children_named(binding, "operation") {
        let operation_name = required_attribute(operation, "operation", "name")?;
        let Some(abstract_operation) = abstract_operations
            .iter()
            .find(|o| o.name == operation_name)
        else {
            continue;
        };
        let mut operation_def = abstract_operation.clone();
        for (direction, io) in [
            ("input", operation_def.input.as_mut()),
            ("output", operation_def.output.as_mut()),
        ] {
            let explicit_name = children_named(operation, direction)
                .next()
                .and_then(|n| n.attribute("name"));
            if let (Some(io), Some(explicit_name)) = (io, explicit_name) {
                io.name = Some(explicit_name.to_string());
            }
        }
        operations.push(operation_def);
    }
    Ok(Binding { name, operations })
}

/// Reads a WSDL 1.1 document into a [`Definitions`] model.
pub fn read_wsdl(document: &roxmltree::Document) -> Result<Definitions, WsdlError> {
    let root = document.root_element();
    if root.tag_name().name() != "definitions" {
        return Err(WsdlError::NotWsdl(root.tag_name().name().to_string()));
    }

    let mut definitions = Definitions::new();
    definitions.target_namespace = root.attribute("targetNamespace").map(str::to_string);
    declare_namespaces(&mut definitions, root);

    for types in children_named(root, "types") {
        for schema in children_named(types, "schema") {
            declare_namespaces(&mut definitions, schema);
            read_schema(&mut definitions, schema);
        }
    }

    let mut element_bags = HashMap::new();
    for message in children_named(root, "message") {
        let message = read_message(&mut definitions, &mut element_bags, message)?;
        definitions.add_message(message);
    }

    let mut port_types = HashMap::new();
    for port_type in children_named(root, "portType") {
        let name = required_attribute(port_type, "portType", "name")?;
        port_types.insert(name.to_string(), read_port_type(port_type)?);
    }

    for binding in children_named(root, "binding") {
        let binding = read_binding(binding, &port_types)?;
        definitions.add_binding(binding);
    }

    for service in children_named(root, "service") {
        let name = required_attribute(service, "service", "name")?.to_string();
        let mut ports = Vec::new();
        for port in children_named(service, "port") {
            let port_name = required_attribute(port, "port", "name")?;
            let binding_name = local_name(required_attribute(port, "port", "binding")?);
            let binding = definitions
                .find_binding(binding_name)
                .ok_or_else(|| WsdlError::BindingNotFound(binding_name.to_string()))?;
            ports.push(Port {
                name: port_name.to_string(),
                binding,
            });
        }
        definitions.add_service(Service { name, ports });
    }

    Ok(definitions)
}
