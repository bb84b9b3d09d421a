use std::fmt;

use thiserror::Error;

/// Errors that abort a resolution pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no namespace could be resolved for {name:?}")]
    NamespaceResolution { name: String },
    #[error("out of names for {base:?} after {attempts} suffixes, the schema is probably cyclic")]
    NameAllocationExhausted { base: String, attempts: u32 },
    #[error("operation refers to message {0:?}, which is not declared")]
    MessageNotFound(String),
    #[error("more than {limit} nested type definitions at {path}")]
    NestingTooDeep { path: String, limit: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A referenced complex type does not exist; the reference was degraded to a primitive.
    SchemaTypeNotFound { namespace: String, name: String },
    /// A part bag carried the `undefined` sentinel; its definition was left without fields.
    MalformedMessageParts,
}

/// A non-fatal problem found during a resolution pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Dotted path of the names being resolved when the problem was found.
    pub path: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::SchemaTypeNotFound { namespace, name } => write!(
                f,
                "{}: complex type {name:?} not found in namespace {namespace:?}, treated as primitive",
                self.path
            ),
            DiagnosticKind::MalformedMessageParts => write!(
                f,
                "{}: message parts could not be described, definition left empty",
                self.path
            ),
        }
    }
}
