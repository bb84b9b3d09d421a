use dt_wsdl::{
    message::PartValue,
    namespaces::{SOAP_ENCODING_NAMESPACE, XSD_NAMESPACE},
    Definitions, MessageElement, NodeId, NodeKind, PartBagId, SchemaNode,
};
use tracing::{debug, trace, warn};

use crate::{
    error::{Diagnostic, DiagnosticKind, ResolveError},
    namespace::{NamespaceResolver, QName},
    naming::pascal,
    parsed_wsdl::{Definition, Field, ParsedWsdl, XmlType},
    visited::{VisitKey, VisitedRegistry},
};

/// Field name given to the content of a `complexContent` node.
const CONTENT_FIELD: &str = "item";

/// Type of elements that declare neither a type nor content.
const ANY_TYPE: &str = "anyType";

fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

fn is_repeated(node: &SchemaNode) -> bool {
    match node.attribute("maxOccurs") {
        Some("unbounded") => true,
        Some(max) => max.parse::<u64>().map_or(false, |max| max > 1),
        None => false,
    }
}

/// State of one resolution pass over a document.
///
/// Resolving a schema type registers a [`Definition`] for it in the [`ParsedWsdl`] before its
/// body is resolved. Any later request for the same type, including one made while its body is
/// still being resolved, yields an [`XmlType::Reference`] to that definition.
pub struct ResolutionContext<'d, 'p> {
    document: &'d Definitions,
    namespaces: NamespaceResolver<'d>,
    parsed: &'p mut ParsedWsdl,
    visited: VisitedRegistry,
    /// Names being resolved, outermost first; used for diagnostics and to name anonymous types.
    stack: Vec<String>,
    /// Number of definitions currently being resolved.
    depth: usize,
    max_depth: usize,
}

impl<'d, 'p> ResolutionContext<'d, 'p> {
    pub fn new(document: &'d Definitions, parsed: &'p mut ParsedWsdl, max_depth: usize) -> Self {
        Self {
            document,
            namespaces: NamespaceResolver::new(document.namespaces()),
            parsed,
            visited: VisitedRegistry::new(),
            stack: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    pub fn document(&self) -> &'d Definitions {
        self.document
    }

    pub fn parsed(&self) -> &ParsedWsdl {
        self.parsed
    }

    pub fn parsed_mut(&mut self) -> &mut ParsedWsdl {
        self.parsed
    }

    fn path(&self) -> String {
        self.stack.join(".")
    }

    fn diagnose(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            kind,
            path: self.path(),
        };
        warn!("{diagnostic}");
        self.parsed.diagnostics.push(diagnostic);
    }

    /// Runs `f` with `name` pushed onto the path.
    fn descend<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        self.stack.push(name.to_string());
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Runs `f` inside the body of the definition `name`. Only definitions count towards the
    /// nesting limit.
    fn enter_definition<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        if self.depth >= self.max_depth {
            return Err(ResolveError::NestingTooDeep {
                path: self.path(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.descend(name, f);
        self.depth -= 1;
        result
    }

    /// Name for an anonymous type: the innermost name on the path.
    fn anonymous_name(&self) -> String {
        self.stack.last().cloned().unwrap_or_else(|| "Type".to_string())
    }

    /// Resolves a possibly prefixed type name.
    ///
    /// Built-in schema and SOAP encoding types are primitives. Complex types become references to
    /// their definition, simple types resolve to their base. Anything else is degraded to a
    /// primitive and reported as a diagnostic.
    pub fn resolve_type_name(
        &mut self,
        name: &str,
        context: Option<&str>,
    ) -> Result<XmlType, ResolveError> {
        let qname = self.namespaces.resolve(name, context)?;
        if qname.namespace == XSD_NAMESPACE || qname.namespace == SOAP_ENCODING_NAMESPACE {
            return Ok(XmlType::Primitive(qname.local_name));
        }

        let document = self.document;
        if let Some(node) = document.complex_type(&qname.namespace, &qname.local_name) {
            let base_name = qname.local_name.clone();
            return self.resolve_definition(VisitKey::Qualified(qname), &base_name, node);
        }
        if let Some(base) = document.simple_type(&qname.namespace, &qname.local_name) {
            return Ok(XmlType::primitive(local_name(base)));
        }

        self.diagnose(DiagnosticKind::SchemaTypeNotFound {
            namespace: qname.namespace,
            name: qname.local_name.clone(),
        });
        Ok(XmlType::Primitive(qname.local_name))
    }

    /// Resolves the complex type `node` under `key`, registering its definition on first sight.
    fn resolve_definition(
        &mut self,
        key: VisitKey,
        base_name: &str,
        node: NodeId,
    ) -> Result<XmlType, ResolveError> {
        if let Some(name) = self.visited.get(&key) {
            trace!(definition = name, "back-reference");
            return Ok(XmlType::reference(name));
        }

        let name = self.parsed.allocate_name(base_name)?;
        let id = self.parsed.push(Definition::placeholder(&name, base_name));
        self.visited.insert(key, name.clone());
        debug!(definition = %name, path = %self.path(), "registered definition");

        let type_ = self.enter_definition(base_name, |this| this.resolve_body(node))?;
        let docs = self.document.node(node).documentation.clone();
        self.parsed.complete(id, type_, docs);
        Ok(XmlType::Reference(name))
    }

    /// The structure of a complex type: its `complexContent`, or the fields of its children.
    fn resolve_body(&mut self, id: NodeId) -> Result<XmlType, ResolveError> {
        let document = self.document;
        let node = document.node(id);
        if let [only] = node.children.as_slice() {
            if document.node(*only).kind == NodeKind::ComplexContent {
                return self.resolve_node(*only);
            }
        }
        Ok(XmlType::Map(self.collect_fields(&node.children)?))
    }

    /// Resolves any schema node.
    pub fn resolve_node(&mut self, id: NodeId) -> Result<XmlType, ResolveError> {
        let document = self.document;
        let node = document.node(id);
        match &node.kind {
            NodeKind::Element => self.resolve_element(id),
            NodeKind::Sequence => Ok(XmlType::Map(self.collect_fields(&node.children)?)),
            NodeKind::ComplexType => match node.name() {
                Some(name) => {
                    let qname = self.namespaces.resolve(name, node.namespace.as_deref())?;
                    self.resolve_definition(VisitKey::Qualified(qname), name, id)
                }
                None => {
                    let name = self.anonymous_name();
                    self.resolve_definition(VisitKey::Node(id), &name, id)
                }
            },
            NodeKind::ComplexContent => Ok(XmlType::Map(self.content_fields(id)?)),
            NodeKind::Extension | NodeKind::Restriction => self.resolve_derivation(id),
            NodeKind::Attribute => match node.attribute("type") {
                Some(type_name) => self.resolve_type_name(type_name, None),
                None => Ok(XmlType::primitive("string")),
            },
            NodeKind::Leaf(tag) => Ok(XmlType::primitive(node.text.as_deref().unwrap_or(tag))),
        }
    }

    /// The type of an element declaration, ignoring its occurrence bounds.
    fn resolve_element(&mut self, id: NodeId) -> Result<XmlType, ResolveError> {
        let document = self.document;
        let node = document.node(id);

        if let Some(type_name) = node.attribute("type") {
            return self.resolve_type_name(type_name, None);
        }

        if let Some(reference) = node.attribute("ref") {
            let QName {
                namespace,
                local_name,
            } = self.namespaces.resolve(reference, None)?;
            if let Some(element) = document.element(&namespace, &local_name) {
                return self.resolve_node(element);
            }
            self.diagnose(DiagnosticKind::SchemaTypeNotFound {
                namespace,
                name: local_name.clone(),
            });
            return Ok(XmlType::Primitive(local_name));
        }

        for child in node.children.iter().copied() {
            let child_node = document.node(child);
            match &child_node.kind {
                NodeKind::ComplexType => return self.resolve_node(child),
                NodeKind::Leaf(tag) if tag == "simpleType" => {
                    let base = child_node
                        .children
                        .iter()
                        .map(|c| document.node(*c))
                        .find(|c| c.kind == NodeKind::Restriction)
                        .and_then(|r| r.attribute("base"))
                        .unwrap_or("string");
                    return Ok(XmlType::primitive(local_name(base)));
                }
                _ => {}
            }
        }

        Ok(XmlType::primitive(ANY_TYPE))
    }

    /// Resolves an element declaration into a field, wrapping repeated elements in an array.
    fn resolve_element_field(&mut self, id: NodeId) -> Result<Field, ResolveError> {
        let document = self.document;
        let node = document.node(id);
        let name = node
            .name()
            .or_else(|| node.attribute("ref").map(local_name))
            .unwrap_or(CONTENT_FIELD);
        let type_ = self.descend(name, |this| this.resolve_element(id))?;
        let type_ = if is_repeated(node) {
            XmlType::array(type_)
        } else {
            type_
        };
        Ok(Field::new(name, type_))
    }

    /// Fields declared by `children`, in order. Nested sequences are flattened.
    fn collect_fields(&mut self, children: &[NodeId]) -> Result<Vec<Field>, ResolveError> {
        let document = self.document;
        let mut fields = Vec::new();
        for child in children.iter().copied() {
            let node = document.node(child);
            match &node.kind {
                NodeKind::Element => fields.push(self.resolve_element_field(child)?),
                NodeKind::Sequence => fields.extend(self.collect_fields(&node.children)?),
                NodeKind::Attribute => {
                    // Unnamed attributes are references such as `soapenc:arrayType`.
                    if let Some(name) = node.name() {
                        let type_ = self.descend(name, |this| this.resolve_node(child))?;
                        fields.push(Field::new(name, type_));
                    }
                }
                NodeKind::ComplexContent => fields.extend(self.content_fields(child)?),
                NodeKind::ComplexType => {
                    let name = node.name().unwrap_or(CONTENT_FIELD);
                    let type_ = self.resolve_node(child)?;
                    fields.push(Field::new(name, type_));
                }
                NodeKind::Extension | NodeKind::Restriction | NodeKind::Leaf(_) => {
                    trace!(path = %self.path(), kind = ?node.kind, "skipping non-field node");
                }
            }
        }
        Ok(fields)
    }

    /// The content of a `complexContent` node: its derivation, or its fields.
    fn resolve_content(&mut self, id: NodeId) -> Result<XmlType, ResolveError> {
        let document = self.document;
        let node = document.node(id);
        let derivation = node.children.iter().copied().find(|c| {
            matches!(
                document.node(*c).kind,
                NodeKind::Extension | NodeKind::Restriction
            )
        });
        match derivation {
            Some(derivation) => self.resolve_node(derivation),
            None => Ok(XmlType::Map(self.collect_fields(&node.children)?)),
        }
    }

    /// Fields contributed by a `complexContent` node. Content derived from the SOAP encoding
    /// `Array` type is a single `item` field; any other content contributes its fields directly.
    fn content_fields(&mut self, id: NodeId) -> Result<Vec<Field>, ResolveError> {
        let is_array = self.is_array_content(id);
        Ok(match self.resolve_content(id)? {
            XmlType::Map(fields) if !is_array => fields,
            content => vec![Field::new(CONTENT_FIELD, content)],
        })
    }

    fn is_soap_array(&self, base: &str) -> bool {
        self.namespaces.resolve(base, None).map_or(false, |qname| {
            qname.namespace == SOAP_ENCODING_NAMESPACE && qname.local_name == "Array"
        })
    }

    fn is_array_content(&self, id: NodeId) -> bool {
        let document = self.document;
        document.node(id).children.iter().any(|child| {
            let child = document.node(*child);
            matches!(child.kind, NodeKind::Extension | NodeKind::Restriction)
                && child
                    .attribute("base")
                    .map_or(false, |base| self.is_soap_array(base))
        })
    }

    /// An extension or restriction. Derivations of the SOAP encoding `Array` type become arrays
    /// of their `arrayType`; others contribute their own fields.
    fn resolve_derivation(&mut self, id: NodeId) -> Result<XmlType, ResolveError> {
        let document = self.document;
        let node = document.node(id);
        let is_array = node
            .attribute("base")
            .map_or(false, |base| self.is_soap_array(base));
        if !is_array {
            return Ok(XmlType::Map(self.collect_fields(&node.children)?));
        }

        let array_type = node
            .children
            .iter()
            .map(|c| document.node(*c))
            .find_map(|c| c.attribute("arrayType"));
        if let Some(array_type) = array_type {
            return self.resolve_array_type(array_type);
        }

        let mut fields = self.collect_fields(&node.children)?;
        Ok(match fields.len() {
            0 => XmlType::array(XmlType::primitive(ANY_TYPE)),
            1 => match fields.remove(0).type_ {
                array @ XmlType::Array(_) => array,
                element => XmlType::array(element),
            },
            _ => XmlType::array(XmlType::Map(fields)),
        })
    }

    /// Resolves an `arrayType` value such as `ns1:TEmployee[]`; each `[...]` suffix adds one
    /// array dimension.
    fn resolve_array_type(&mut self, array_type: &str) -> Result<XmlType, ResolveError> {
        match array_type.strip_suffix(']').and_then(|s| s.rfind('[').map(|i| &s[..i])) {
            Some(element) => Ok(XmlType::array(self.resolve_array_type(element)?)),
            None => self.resolve_type_name(array_type, None),
        }
    }

    /// Resolves a bag of message parts into a definition named after `name`, returning the
    /// definition name. A bag that was resolved before yields the existing definition.
    ///
    /// Parts named `targetNSAlias` or `targetNamespace` become documentation. A bag holding the
    /// `undefined` sentinel is reported and leaves the definition without fields.
    pub fn resolve_parts(
        &mut self,
        name: &str,
        bag: Option<PartBagId>,
    ) -> Result<String, ResolveError> {
        self.resolve_bag(name, bag, None)
    }

    /// Resolves the parts of a message referring to the global `element`.
    ///
    /// When the element is declared with a complex type, the resulting definition also stands
    /// for that type: later uses of the type refer to it, and a type resolved earlier is reused.
    pub fn resolve_element_parts(
        &mut self,
        element: &MessageElement,
        bag: Option<PartBagId>,
    ) -> Result<String, ResolveError> {
        let Some(type_name) = element.type_name.as_deref() else {
            return self.resolve_bag(&element.name, bag, None);
        };
        let document = self.document;
        let key = self
            .namespaces
            .resolve(type_name, None)
            .ok()
            .filter(|qname| {
                document
                    .complex_type(&qname.namespace, &qname.local_name)
                    .is_some()
            })
            .map(VisitKey::Qualified);
        if let Some(existing) = key.as_ref().and_then(|key| self.visited.get(key)) {
            trace!(definition = existing, "back-reference to element type");
            return Ok(existing.to_string());
        }
        self.resolve_bag(local_name(type_name), bag, key)
    }

    /// Resolves `bag` into a definition named after `name`, also registering it under `alias`.
    fn resolve_bag(
        &mut self,
        name: &str,
        bag: Option<PartBagId>,
        alias: Option<VisitKey>,
    ) -> Result<String, ResolveError> {
        if let Some(existing) = bag.and_then(|bag| self.visited.get(&VisitKey::Parts(bag))) {
            trace!(definition = existing, "back-reference to message parts");
            return Ok(existing.to_string());
        }

        let definition_name = self.parsed.allocate_name(&pascal(name))?;
        let id = self
            .parsed
            .push(Definition::placeholder(&definition_name, name));
        debug!(definition = %definition_name, path = %self.path(), "registered message definition");
        if let Some(alias) = alias {
            self.visited.insert(alias, definition_name.clone());
        }

        let Some(bag) = bag else {
            return Ok(definition_name);
        };
        self.visited
            .insert(VisitKey::Parts(bag), definition_name.clone());

        let parts = self.document.part_bag(bag);
        if parts.has_undefined_sentinel() {
            self.enter_definition(name, |this| {
                this.diagnose(DiagnosticKind::MalformedMessageParts);
                Ok(())
            })?;
            return Ok(definition_name);
        }

        let (fields, docs) = self.enter_definition(name, |this| {
            let mut fields = Vec::new();
            let mut docs = Vec::new();
            for part in &parts.parts {
                if part.is_marker() {
                    if let PartValue::Type(value) = &part.value {
                        docs.push(format!("{} `{value}`", part.name));
                    }
                    continue;
                }
                let (field_name, is_array) = match part.name.strip_suffix("[]") {
                    Some(stripped) => (stripped, true),
                    None => (part.name.as_str(), false),
                };
                let type_ = this.descend(field_name, |this| match &part.value {
                    PartValue::Type(hint) => this.resolve_type_name(hint, None),
                    PartValue::Node(node) => {
                        let element = this.document.node(*node);
                        if element.kind == NodeKind::Element {
                            let type_ = this.resolve_element(*node)?;
                            Ok(if is_repeated(element) {
                                XmlType::array(type_)
                            } else {
                                type_
                            })
                        } else {
                            this.resolve_node(*node)
                        }
                    }
                    PartValue::Bag(nested) => this
                        .resolve_parts(field_name, Some(*nested))
                        .map(XmlType::Reference),
                    PartValue::Undefined => Ok(XmlType::primitive(ANY_TYPE)),
                })?;
                let type_ = if is_array {
                    XmlType::array(type_)
                } else {
                    type_
                };
                fields.push(Field::new(field_name, type_));
            }
            Ok((fields, docs))
        })?;

        self.parsed.complete(id, XmlType::Map(fields), docs);
        Ok(definition_name)
    }
}

#[cfg(test)]
mod tests {
    use dt_wsdl::{Part, PartBag, SchemaNode};

    use super::*;

    const NS: &str = "urn:test";
    const SOAP_ENC: &str = SOAP_ENCODING_NAMESPACE;

    fn document() -> Definitions {
        let mut document = Definitions::new();
        document.namespaces_mut().declare("tns", NS);
        document.namespaces_mut().declare("xs", XSD_NAMESPACE);
        document.namespaces_mut().declare("soapenc", SOAP_ENC);
        document
    }

    fn element(document: &mut Definitions, name: &str, type_: &str) -> NodeId {
        document.add_node(
            SchemaNode::new(NodeKind::Element)
                .with_namespace(NS)
                .with_attribute("name", name)
                .with_attribute("type", type_),
        )
    }

    fn sequence(document: &mut Definitions, children: Vec<NodeId>) -> NodeId {
        document.add_node(
            SchemaNode::new(NodeKind::Sequence)
                .with_namespace(NS)
                .with_children(children),
        )
    }

    fn complex_type(document: &mut Definitions, name: &str, fields: Vec<NodeId>) -> NodeId {
        let body = sequence(document, fields);
        let node = document.add_node(
            SchemaNode::new(NodeKind::ComplexType)
                .with_namespace(NS)
                .with_attribute("name", name)
                .with_children([body]),
        );
        document
            .schema_mut(NS)
            .complex_types
            .insert(name.to_string(), node);
        node
    }

    /// `name` as a SOAP encoded array of `tns:{item}`.
    fn soap_array(document: &mut Definitions, name: &str, item: &str) -> NodeId {
        let array_type = document.add_node(
            SchemaNode::new(NodeKind::Attribute)
                .with_attribute("ref", "soapenc:arrayType")
                .with_attribute("arrayType", format!("tns:{item}[]")),
        );
        let restriction = document.add_node(
            SchemaNode::new(NodeKind::Restriction)
                .with_attribute("base", "soapenc:Array")
                .with_children([array_type]),
        );
        let content = document
            .add_node(SchemaNode::new(NodeKind::ComplexContent).with_children([restriction]));
        let node = document.add_node(
            SchemaNode::new(NodeKind::ComplexType)
                .with_namespace(NS)
                .with_attribute("name", name)
                .with_children([content]),
        );
        document
            .schema_mut(NS)
            .complex_types
            .insert(name.to_string(), node);
        node
    }

    fn resolve(document: &Definitions, name: &str) -> (Result<XmlType, ResolveError>, ParsedWsdl) {
        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(document, &mut parsed, 64);
        let result = context.resolve_type_name(name, None);
        (result, parsed)
    }

    fn type_of<'a>(parsed: &'a ParsedWsdl, name: &str) -> &'a XmlType {
        &parsed.definition(parsed.find_definition(name).unwrap()).type_
    }

    #[test]
    fn sequence_preserves_declaration_order() {
        let mut document = document();
        let a = element(&mut document, "a", "xs:string");
        let b = element(&mut document, "b", "xs:int");
        let body = sequence(&mut document, vec![a, b]);

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        assert_eq!(
            context.resolve_node(body).unwrap(),
            XmlType::Map(vec![
                Field::new("a", XmlType::primitive("string")),
                Field::new("b", XmlType::primitive("int")),
            ])
        );
        assert!(parsed.definitions.is_empty());
    }

    #[test]
    fn self_reference_terminates() {
        let mut document = document();
        let value = element(&mut document, "value", "xs:int");
        let next = element(&mut document, "next", "tns:Node");
        complex_type(&mut document, "Node", vec![value, next]);

        let (result, parsed) = resolve(&document, "tns:Node");
        assert_eq!(result.unwrap(), XmlType::reference("Node"));
        assert_eq!(parsed.definitions.len(), 1);
        assert_eq!(
            type_of(&parsed, "Node"),
            &XmlType::Map(vec![
                Field::new("value", XmlType::primitive("int")),
                Field::new("next", XmlType::reference("Node")),
            ])
        );
    }

    #[test]
    fn mutual_recursion_terminates() {
        let mut document = document();
        let to_b = element(&mut document, "b", "tns:B");
        complex_type(&mut document, "A", vec![to_b]);
        let to_a = element(&mut document, "a", "tns:A");
        complex_type(&mut document, "B", vec![to_a]);

        let (result, parsed) = resolve(&document, "tns:A");
        assert_eq!(result.unwrap(), XmlType::reference("A"));
        let names: Vec<&str> = parsed.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(type_of(&parsed, "B").fields()[0].type_, XmlType::reference("A"));
    }

    #[test]
    fn shared_types_are_materialized_once() {
        let mut document = document();
        let id = element(&mut document, "id", "xs:int");
        complex_type(&mut document, "Employee", vec![id]);
        let manager = element(&mut document, "manager", "tns:Employee");
        let deputy = element(&mut document, "deputy", "tns:Employee");
        complex_type(&mut document, "Team", vec![manager, deputy]);

        let (result, parsed) = resolve(&document, "tns:Team");
        result.unwrap();
        assert_eq!(parsed.definitions.len(), 2);
        let team = type_of(&parsed, "Team").fields();
        assert_eq!(team[0].type_, XmlType::reference("Employee"));
        assert_eq!(team[1].type_, XmlType::reference("Employee"));
    }

    #[test]
    fn soap_arrays_resolve_to_arrays_of_references() {
        let mut document = document();
        let name = element(&mut document, "name", "xs:string");
        complex_type(&mut document, "TEmployee", vec![name]);
        soap_array(&mut document, "TEmployeeArray", "TEmployee");
        let staff = element(&mut document, "staff", "tns:TEmployeeArray");
        let boss = element(&mut document, "boss", "tns:TEmployee");
        complex_type(&mut document, "Company", vec![staff, boss]);

        let (result, parsed) = resolve(&document, "tns:Company");
        result.unwrap();
        assert_eq!(
            type_of(&parsed, "TEmployeeArray"),
            &XmlType::Map(vec![Field::new(
                "item",
                XmlType::array(XmlType::reference("TEmployee"))
            )])
        );
        assert_eq!(parsed.definitions.len(), 3);
    }

    #[test]
    fn soap_arrays_do_not_depend_on_registration_order() {
        let mut document = document();
        let name = element(&mut document, "name", "xs:string");
        complex_type(&mut document, "TEmployee", vec![name]);
        soap_array(&mut document, "TEmployeeArray", "TEmployee");
        let boss = element(&mut document, "boss", "tns:TEmployee");
        let staff = element(&mut document, "staff", "tns:TEmployeeArray");
        complex_type(&mut document, "Company", vec![boss, staff]);

        let (result, parsed) = resolve(&document, "tns:Company");
        result.unwrap();
        assert_eq!(
            type_of(&parsed, "TEmployeeArray").fields()[0].type_,
            XmlType::array(XmlType::reference("TEmployee"))
        );
    }

    #[test]
    fn nested_array_suffixes_add_dimensions() {
        let document = document();
        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        assert_eq!(
            context.resolve_array_type("xs:int[][]").unwrap(),
            XmlType::array(XmlType::array(XmlType::primitive("int")))
        );
    }

    #[test]
    fn missing_complex_type_degrades_to_primitive() {
        let document = document();
        let (result, parsed) = resolve(&document, "tns:Missing");
        assert_eq!(result.unwrap(), XmlType::primitive("Missing"));
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::SchemaTypeNotFound {
                namespace: NS.into(),
                name: "Missing".into(),
            }
        );
    }

    #[test]
    fn unresolvable_namespace_is_fatal() {
        let document = document();
        let (result, _) = resolve(&document, "Employee");
        assert_eq!(
            result,
            Err(ResolveError::NamespaceResolution {
                name: "Employee".into()
            })
        );
    }

    #[test]
    fn simple_types_resolve_to_their_base() {
        let mut document = document();
        document
            .schema_mut(NS)
            .simple_types
            .insert("Grade".into(), "xs:string".into());
        let (result, parsed) = resolve(&document, "tns:Grade");
        assert_eq!(result.unwrap(), XmlType::primitive("string"));
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn repeated_elements_become_arrays() {
        let mut document = document();
        let tags = document.add_node(
            SchemaNode::new(NodeKind::Element)
                .with_attribute("name", "tags")
                .with_attribute("type", "xs:string")
                .with_attribute("maxOccurs", "unbounded"),
        );
        let once = document.add_node(
            SchemaNode::new(NodeKind::Element)
                .with_attribute("name", "once")
                .with_attribute("type", "xs:string")
                .with_attribute("maxOccurs", "1"),
        );
        complex_type(&mut document, "Tagged", vec![tags, once]);

        let (result, parsed) = resolve(&document, "tns:Tagged");
        result.unwrap();
        assert_eq!(
            type_of(&parsed, "Tagged"),
            &XmlType::Map(vec![
                Field::new("tags", XmlType::array(XmlType::primitive("string"))),
                Field::new("once", XmlType::primitive("string")),
            ])
        );
    }

    #[test]
    fn anonymous_types_are_named_after_their_element() {
        let mut document = document();
        let street = element(&mut document, "street", "xs:string");
        let body = sequence(&mut document, vec![street]);
        let inline =
            document.add_node(SchemaNode::new(NodeKind::ComplexType).with_children([body]));
        let address = document.add_node(
            SchemaNode::new(NodeKind::Element)
                .with_attribute("name", "address")
                .with_children([inline]),
        );
        complex_type(&mut document, "Person", vec![address]);

        let (result, parsed) = resolve(&document, "tns:Person");
        result.unwrap();
        assert_eq!(
            type_of(&parsed, "Person").fields()[0].type_,
            XmlType::reference("address")
        );
        assert_eq!(
            type_of(&parsed, "address").fields()[0],
            Field::new("street", XmlType::primitive("string"))
        );
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let mut document = document();
        complex_type(&mut document, "Item", vec![]);
        document.namespaces_mut().declare("other", "urn:other");
        let other = document.add_node(
            SchemaNode::new(NodeKind::ComplexType)
                .with_namespace("urn:other")
                .with_attribute("name", "Item"),
        );
        document
            .schema_mut("urn:other")
            .complex_types
            .insert("Item".into(), other);
        let mine = element(&mut document, "mine", "tns:Item");
        let theirs = element(&mut document, "theirs", "other:Item");
        complex_type(&mut document, "Both", vec![mine, theirs]);

        let (result, parsed) = resolve(&document, "tns:Both");
        result.unwrap();
        let both = type_of(&parsed, "Both").fields();
        assert_eq!(both[0].type_, XmlType::reference("Item"));
        assert_eq!(both[1].type_, XmlType::reference("Item1"));
        let item1 = parsed.find_definition("Item1").unwrap();
        assert_eq!(parsed.definition(item1).source_name, "Item");
    }

    /// Declares `T0` to `T{len - 1}`, each holding a `next` field of the following type.
    fn type_chain(document: &mut Definitions, len: usize) {
        for i in 0..len {
            let next = if i + 1 == len {
                element(document, "next", "xs:string")
            } else {
                element(document, "next", &format!("tns:T{}", i + 1))
            };
            complex_type(document, &format!("T{i}"), vec![next]);
        }
    }

    #[test]
    fn nesting_beyond_the_limit_is_fatal() {
        let mut document = document();
        type_chain(&mut document, 10);
        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 4);
        assert_eq!(
            context.resolve_type_name("tns:T0", None),
            Err(ResolveError::NestingTooDeep {
                path: "T0.next.T1.next.T2.next.T3.next".into(),
                limit: 4,
            })
        );
    }

    #[test]
    fn long_type_chains_resolve_under_the_default_limit() {
        let mut document = document();
        type_chain(&mut document, 100);
        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, crate::DEFAULT_MAX_DEPTH);
        assert_eq!(
            context.resolve_type_name("tns:T0", None).unwrap(),
            XmlType::reference("T0")
        );
        assert_eq!(parsed.definitions.len(), 100);
        assert_eq!(
            type_of(&parsed, "T99").fields()[0].type_,
            XmlType::primitive("string")
        );
    }

    #[test]
    fn extensions_contribute_their_own_fields() {
        let mut document = document();
        let x = element(&mut document, "x", "xs:string");
        let body = sequence(&mut document, vec![x]);
        let extension = document.add_node(
            SchemaNode::new(NodeKind::Extension)
                .with_attribute("base", "tns:Base")
                .with_children([body]),
        );
        let content =
            document.add_node(SchemaNode::new(NodeKind::ComplexContent).with_children([extension]));
        let flag = document.add_node(
            SchemaNode::new(NodeKind::Attribute)
                .with_attribute("name", "flag")
                .with_attribute("type", "xs:boolean"),
        );
        let derived = document.add_node(
            SchemaNode::new(NodeKind::ComplexType)
                .with_namespace(NS)
                .with_attribute("name", "Derived")
                .with_children([content, flag]),
        );
        document
            .schema_mut(NS)
            .complex_types
            .insert("Derived".into(), derived);

        let (result, parsed) = resolve(&document, "tns:Derived");
        result.unwrap();
        assert_eq!(
            type_of(&parsed, "Derived"),
            &XmlType::Map(vec![
                Field::new("x", XmlType::primitive("string")),
                Field::new("flag", XmlType::primitive("boolean")),
            ])
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut document = document();
        let a = element(&mut document, "a", "xs:string");
        let b = element(&mut document, "b", "tns:Leaf");
        complex_type(&mut document, "Root", vec![a, b]);
        let c = element(&mut document, "c", "xs:int");
        complex_type(&mut document, "Leaf", vec![c]);

        let (first, first_parsed) = resolve(&document, "tns:Root");
        let (second, second_parsed) = resolve(&document, "tns:Root");
        assert_eq!(first, second);
        assert_eq!(first_parsed.definitions, second_parsed.definitions);
    }

    #[test]
    fn part_bags_become_definitions_with_marker_docs() {
        let mut document = document();
        let bag = document.add_part_bag(PartBag::new(vec![
            Part::new("targetNSAlias", PartValue::Type("tns".into())),
            Part::new("targetNamespace", PartValue::Type(NS.into())),
            Part::new("id", PartValue::Type("xs:int".into())),
            Part::new("names[]", PartValue::Type("xs:string".into())),
        ]));

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let name = context.resolve_parts("getEmployee", Some(bag)).unwrap();
        assert_eq!(name, "GetEmployee");
        let definition = parsed.definition(parsed.find_definition(&name).unwrap());
        assert_eq!(definition.source_name, "getEmployee");
        assert_eq!(
            definition.docs,
            vec!["targetNSAlias `tns`", "targetNamespace `urn:test`"]
        );
        assert_eq!(
            definition.type_,
            XmlType::Map(vec![
                Field::new("id", XmlType::primitive("int")),
                Field::new("names", XmlType::array(XmlType::primitive("string"))),
            ])
        );
    }

    #[test]
    fn shared_part_bags_collapse_to_one_definition() {
        let mut document = document();
        let address = document.add_part_bag(PartBag::new(vec![Part::new(
            "street",
            PartValue::Type("xs:string".into()),
        )]));
        let person = document.add_part_bag(PartBag::new(vec![
            Part::new("home", PartValue::Bag(address)),
            Part::new("work", PartValue::Bag(address)),
        ]));

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let name = context.resolve_parts("person", Some(person)).unwrap();
        assert_eq!(parsed.definitions.len(), 2);
        assert_eq!(
            type_of(&parsed, &name),
            &XmlType::Map(vec![
                Field::new("home", XmlType::reference("Home")),
                Field::new("work", XmlType::reference("Home")),
            ])
        );
    }

    #[test]
    fn undefined_sentinel_leaves_definition_empty() {
        let mut document = document();
        let bag = document.add_part_bag(PartBag::new(vec![Part::new(
            "undefined",
            PartValue::Undefined,
        )]));

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let name = context.resolve_parts("Broken", Some(bag)).unwrap();
        assert!(type_of(&parsed, &name).fields().is_empty());
        assert_eq!(
            parsed.diagnostics,
            vec![Diagnostic {
                kind: DiagnosticKind::MalformedMessageParts,
                path: "Broken".into(),
            }]
        );
    }

    #[test]
    fn messages_without_parts_get_empty_definitions() {
        let document = document();
        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let first = context.resolve_parts("ping", None).unwrap();
        let second = context.resolve_parts("ping", None).unwrap();
        assert_eq!(first, "Ping");
        assert_eq!(second, "Ping1");
        assert!(type_of(&parsed, "Ping").fields().is_empty());
    }

    fn employee_element(document: &mut Definitions) -> (MessageElement, PartBagId) {
        let id = element(document, "id", "xs:int");
        complex_type(document, "Employee", vec![id]);
        let bag = document.add_part_bag(PartBag::new(vec![Part::new("id", PartValue::Node(id))]));
        let element = MessageElement {
            name: "GetEmployeeResponse".into(),
            type_name: Some("tns:Employee".into()),
        };
        (element, bag)
    }

    #[test]
    fn element_messages_stand_for_their_type() {
        let mut document = document();
        let (element, bag) = employee_element(&mut document);

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let name = context.resolve_element_parts(&element, Some(bag)).unwrap();
        assert_eq!(name, "Employee");
        assert_eq!(
            context.resolve_type_name("tns:Employee", None).unwrap(),
            XmlType::reference("Employee")
        );
        assert_eq!(parsed.definitions.len(), 1);
    }

    #[test]
    fn element_messages_reuse_resolved_types() {
        let mut document = document();
        let (element, bag) = employee_element(&mut document);

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        context.resolve_type_name("tns:Employee", None).unwrap();
        let name = context.resolve_element_parts(&element, Some(bag)).unwrap();
        assert_eq!(name, "Employee");
        assert_eq!(parsed.definitions.len(), 1);
    }

    #[test]
    fn element_parts_keep_their_occurrence_bounds() {
        let mut document = document();
        let ids = document.add_node(
            SchemaNode::new(NodeKind::Element)
                .with_attribute("name", "ids")
                .with_attribute("type", "xs:long")
                .with_attribute("maxOccurs", "10"),
        );
        let bag = document.add_part_bag(PartBag::new(vec![Part::new(
            "ids",
            PartValue::Node(ids),
        )]));

        let mut parsed = ParsedWsdl::default();
        let mut context = ResolutionContext::new(&document, &mut parsed, 64);
        let name = context.resolve_parts("Lookup", Some(bag)).unwrap();
        assert_eq!(
            type_of(&parsed, &name).fields()[0].type_,
            XmlType::array(XmlType::primitive("long"))
        );
    }
}
