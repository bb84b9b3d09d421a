use dt_wsdl::{loader, Definitions, Message, OperationIo};
use tracing::debug;

use crate::{
    error::ResolveError,
    naming::{pascal, TargetLanguage},
    parsed_wsdl::{DefinitionId, Method, Port, Service},
    resolver::ResolutionContext,
};

/// Parameter name of operations without an input message.
const DEFAULT_PARAM_NAME: &str = "request";

/// Walks services, ports and operations of a document, resolving every message they use.
pub struct ServiceWalker<'c, 'd, 'p> {
    context: &'c mut ResolutionContext<'d, 'p>,
    target: TargetLanguage,
}

impl<'c, 'd, 'p> ServiceWalker<'c, 'd, 'p> {
    pub fn new(context: &'c mut ResolutionContext<'d, 'p>, target: TargetLanguage) -> Self {
        Self { context, target }
    }

    pub fn walk(&mut self) -> Result<(), ResolveError> {
        let document = self.context.document();
        for service in document.services() {
            let mut ports = Vec::new();
            for port in &service.ports {
                let binding = document.binding(port.binding);
                let mut methods = Vec::with_capacity(binding.operations.len());
                for operation in &binding.operations {
                    debug!(
                        service = %service.name,
                        port = %port.name,
                        operation = %operation.name,
                        "resolving operation"
                    );
                    methods.push(self.method(
                        document,
                        &operation.name,
                        operation.input.as_ref(),
                        operation.output.as_ref(),
                    )?);
                }
                let port = Port {
                    name: pascal(&port.name),
                    source_name: port.name.clone(),
                    methods,
                };
                ports.push(self.context.parsed_mut().add_port(port));
            }
            self.context.parsed_mut().services.push(Service {
                name: pascal(&service.name),
                source_name: service.name.clone(),
                ports,
            });
        }
        Ok(())
    }

    fn method(
        &mut self,
        document: &Definitions,
        name: &str,
        input: Option<&OperationIo>,
        output: Option<&OperationIo>,
    ) -> Result<Method, ResolveError> {
        let param_name = input
            .map(|io| io.message.as_str())
            .unwrap_or(DEFAULT_PARAM_NAME);
        let param_definition = match input {
            Some(io) => self.message_definition(document, &io.message)?,
            None => None,
        };
        let return_definition = match output {
            Some(io) => self.message_definition(document, &io.message)?,
            None => None,
        };
        Ok(Method {
            name: name.to_string(),
            param_name: self.target.param_name(param_name),
            param_definition,
            return_definition,
        })
    }

    /// The definition describing a message's payload; `None` for messages without parts.
    ///
    /// Messages referring to an element reuse a definition of the same name if one exists, or
    /// the definition of the element's type.
    fn message_definition(
        &mut self,
        document: &Definitions,
        name: &str,
    ) -> Result<Option<DefinitionId>, ResolveError> {
        let Message {
            name: message_name,
            element,
            parts,
        } = document
            .message(name)
            .ok_or_else(|| ResolveError::MessageNotFound(name.to_string()))?;

        let definition_name = match element {
            Some(element) => {
                let type_name = element
                    .type_name
                    .as_deref()
                    .map(loader::local_name)
                    .unwrap_or(element.name.as_str());
                let existing = self
                    .context
                    .parsed()
                    .find_definition(&self.context.parsed().candidate_name(&pascal(type_name)));
                match existing {
                    Some(id) => return Ok(Some(id)),
                    None => self.context.resolve_element_parts(element, *parts)?,
                }
            }
            None if parts.is_some() => self.context.resolve_parts(message_name, *parts)?,
            None => return Ok(None),
        };
        Ok(self.context.parsed().find_definition(&definition_name))
    }
}
