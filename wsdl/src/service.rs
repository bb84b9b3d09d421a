#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub(crate) usize);

/// The input or output of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationIo {
    /// The explicit `name` of the input/output, if declared.
    pub name: Option<String>,
    /// Local name of the referenced message.
    pub message: String,
}

impl OperationIo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub input: Option<OperationIo>,
    pub output: Option<OperationIo>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub operations: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub binding: BindingId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub ports: Vec<Port>,
}
