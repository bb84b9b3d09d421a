pub mod error;
pub mod namespace;
pub mod naming;
pub mod parsed_wsdl;
pub mod resolver;
pub mod visited;
pub mod walker;

pub use error::{Diagnostic, DiagnosticKind, ResolveError};
pub use naming::{NameAllocator, TargetLanguage};
pub use parsed_wsdl::{
    Definition, DefinitionId, Field, Method, ParsedWsdl, Port, PortId, Service, XmlType,
};
pub use resolver::ResolutionContext;
pub use walker::ServiceWalker;

use dt_wsdl::Definitions;
use tracing::info;

/// Default bound on the number of type definitions resolved inside one another.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Prepended to every definition name.
    pub model_name_prefix: String,
    /// Appended to every definition name, after any collision suffix.
    pub model_name_suffix: String,
    /// Numeric suffixes tried on a name collision before giving up.
    pub max_name_suffix: u32,
    pub max_depth: usize,
    pub target: TargetLanguage,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            model_name_prefix: String::new(),
            model_name_suffix: String::new(),
            max_name_suffix: naming::DEFAULT_MAX_NAME_SUFFIX,
            max_depth: DEFAULT_MAX_DEPTH,
            target: TargetLanguage::default(),
        }
    }
}

/// Resolves every service of `document` into a [`ParsedWsdl`] called `name`.
///
/// Any fatal error aborts the pass and no partial result is returned.
pub fn parse_wsdl(
    document: &Definitions,
    name: &str,
    options: &Options,
) -> Result<ParsedWsdl, ResolveError> {
    let names = NameAllocator::new(
        options.model_name_prefix.clone(),
        options.model_name_suffix.clone(),
        options.max_name_suffix,
    );
    let mut parsed = ParsedWsdl::new(naming::pascal(name), names);

    let mut context = ResolutionContext::new(document, &mut parsed, options.max_depth);
    ServiceWalker::new(&mut context, options.target).walk()?;

    info!(
        definitions = parsed.definitions.len(),
        ports = parsed.ports.len(),
        services = parsed.services.len(),
        diagnostics = parsed.diagnostics.len(),
        "resolved {}",
        parsed.name
    );
    Ok(parsed)
}
