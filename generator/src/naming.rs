use std::collections::HashSet;

use check_keyword::CheckKeyword;
use clap::ValueEnum;
use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};

use crate::error::ResolveError;

/// Default number of numeric suffixes tried before a name counts as exhausted.
pub const DEFAULT_MAX_NAME_SUFFIX: u32 = 29;

/// Reserved words of JavaScript/TypeScript that cannot be used as parameter names.
const JAVASCRIPT_RESERVED: &[&str] = &[
    "abstract", "arguments", "await", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "debugger", "default", "delete", "do", "double", "else",
    "enum", "eval", "export", "extends", "false", "final", "finally", "float", "for",
    "function", "goto", "if", "implements", "import", "in", "instanceof", "int", "interface",
    "let", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "typeof", "var", "void", "volatile", "while", "with", "yield",
];

/// The language bindings are emitted for. Decides casing and reserved words of parameter names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TargetLanguage {
    #[default]
    Rust,
    Typescript,
}

impl TargetLanguage {
    pub fn is_reserved(self, ident: &str) -> bool {
        match self {
            Self::Rust => ident.is_keyword(),
            Self::Typescript => JAVASCRIPT_RESERVED.contains(&ident),
        }
    }

    /// Converts a source name into a parameter name, suffixing it if it is reserved.
    pub fn param_name(self, source: &str) -> String {
        let (name, suffix) = match self {
            Self::Rust => (source.to_snake_case(), "_param"),
            Self::Typescript => (source.to_lower_camel_case(), "Param"),
        };
        if self.is_reserved(&name) {
            format!("{name}{suffix}")
        } else {
            name
        }
    }
}

/// Turns any string into a safe identifier. Never fails.
pub fn sanitize(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ident.is_empty() {
        ident.push_str("Type");
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// PascalCase, sanitized form of `name`; used for message, port and service names.
pub fn pascal(name: &str) -> String {
    sanitize(&name.to_pascal_case())
}

/// Hands out names that are unique within one resolution pass.
#[derive(Debug)]
pub struct NameAllocator {
    used: HashSet<String>,
    prefix: String,
    suffix: String,
    max_suffix: u32,
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new("", "", DEFAULT_MAX_NAME_SUFFIX)
    }
}

impl NameAllocator {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, max_suffix: u32) -> Self {
        Self {
            used: HashSet::new(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            max_suffix,
        }
    }

    /// The name `base` gets if it does not collide.
    pub fn candidate(&self, base: &str) -> String {
        format!("{}{}{}", self.prefix, sanitize(base), self.suffix)
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Reserves a unique name derived from `base`, trying numeric suffixes `1..=max_suffix` on
    /// collision.
    pub fn allocate(&mut self, base: &str) -> Result<String, ResolveError> {
        let base = sanitize(base);
        let attempts =
            std::iter::once(String::new()).chain((1..=self.max_suffix).map(|i| i.to_string()));
        for numbering in attempts {
            let name = format!("{}{base}{numbering}{}", self.prefix, self.suffix);
            if !self.used.contains(&name) {
                self.used.insert(name.clone());
                return Ok(name);
            }
        }
        Err(ResolveError::NameAllocationExhausted {
            base,
            attempts: self.max_suffix,
        })
    }
}
