use thiserror::Error;

#[derive(Debug, Error)]
pub enum WsdlError {
    #[error("the root element is not a WSDL <definitions> element, found <{0}>")]
    NotWsdl(String),
    #[error("<{element}> is missing the required attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("binding {0:?} refers to a port type which is not declared")]
    PortTypeNotFound(String),
    #[error("port refers to binding {0:?}, which is not declared")]
    BindingNotFound(String),
    #[error("failed to resolve prefix {0:?} to a namespace URI")]
    NamePrefixNotResolved(String),
}
