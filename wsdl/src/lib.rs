// TODO import/include of external schema documents

pub mod definitions;
pub mod error;
pub mod loader;
pub mod message;
pub mod namespaces;
pub mod schema;
pub mod service;

pub use definitions::Definitions;
pub use error::WsdlError;
pub use loader::read_wsdl;
pub use message::{Message, MessageElement, Part, PartBag, PartBagId, PartValue};
pub use namespaces::NamespaceTable;
pub use schema::{NodeId, NodeKind, Schema, SchemaNode};
pub use service::{Binding, BindingId, Operation, OperationIo, Port, Service};
