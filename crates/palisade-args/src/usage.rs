//! Usage string compilation.
//!
//! A usage string describes one accepted argument shape for a command,
//! with arguments separated by single spaces:
//!
//! ```text
//! Usage        → (Argument (" " Usage'))?
//! Usage'       → Argument (" " Usage')? | RestArgument
//! Argument     → Name ":" TypeName | '"' Keyword '"'
//! RestArgument → "..." Name
//! Name, TypeName, Keyword → one or more of [A-Za-z_]
//! ```
//!
//! Example: `messageToEdit:message "text" ...newContent`. Compilation
//! happens once at plugin-registration time; a [`UsageSyntaxError`] is a
//! fatal configuration error surfaced before the bot serves any
//! traffic, never per-invocation.

use crate::registry::TypeRegistry;

/// One compiled argument position within a usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// Consumes one token, coerced through the named type.
    Typed { name: String, type_name: String },
    /// Consumes one token that must equal the keyword verbatim; binds
    /// `true` under the keyword's name.
    Literal { keyword: String },
    /// Consumes all remaining raw text verbatim. Always last.
    Rest { name: String },
}

/// A compiled usage: the original string plus its ordered argument
/// specs. At most one [`ArgSpec::Rest`], and if present it is the final
/// element; the compiler guarantees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUsage {
    pub raw: String,
    pub specs: Vec<ArgSpec>,
}

/// A usage string that does not conform to the grammar.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsageSyntaxError {
    #[error("malformed argument \"{token}\" at position {position}")]
    MalformedArgument { token: String, position: usize },

    #[error("unknown argument type \"{type_name}\" at position {position}")]
    UnknownType { type_name: String, position: usize },

    #[error("rest argument \"...{name}\" is not at the end of the usage")]
    RestNotLast { name: String },
}

/// Compile a usage string against the given type registry.
///
/// The empty string compiles to the empty usage, which matches only
/// empty raw text.
pub fn compile_usage(
    usage: &str,
    registry: &TypeRegistry,
) -> Result<CompiledUsage, UsageSyntaxError> {
    if usage.is_empty() {
        return Ok(CompiledUsage {
            raw: String::new(),
            specs: Vec::new(),
        });
    }

    let tokens: Vec<&str> = usage.split(' ').collect();
    let mut specs = Vec::with_capacity(tokens.len());

    for (position, token) in tokens.iter().enumerate() {
        let spec = parse_argument(token, position, registry)?;

        if let ArgSpec::Rest { name } = &spec {
            if position != tokens.len() - 1 {
                return Err(UsageSyntaxError::RestNotLast { name: name.clone() });
            }
        }

        specs.push(spec);
    }

    Ok(CompiledUsage {
        raw: usage.to_string(),
        specs,
    })
}

fn parse_argument(
    token: &str,
    position: usize,
    registry: &TypeRegistry,
) -> Result<ArgSpec, UsageSyntaxError> {
    if let Some(name) = token.strip_prefix("...") {
        if !is_identifier(name) {
            return Err(malformed(token, position));
        }
        return Ok(ArgSpec::Rest {
            name: name.to_string(),
        });
    }

    if let Some(inner) = token.strip_prefix('"') {
        let Some(keyword) = inner.strip_suffix('"') else {
            return Err(malformed(token, position));
        };
        if !is_identifier(keyword) {
            return Err(malformed(token, position));
        }
        return Ok(ArgSpec::Literal {
            keyword: keyword.to_string(),
        });
    }

    let Some((name, type_name)) = token.split_once(':') else {
        return Err(malformed(token, position));
    };
    if !is_identifier(name) || !is_identifier(type_name) {
        return Err(malformed(token, position));
    }
    if registry.lookup(type_name).is_none() {
        return Err(UsageSyntaxError::UnknownType {
            type_name: type_name.to_string(),
            position,
        });
    }

    Ok(ArgSpec::Typed {
        name: name.to_string(),
        type_name: type_name.to_string(),
    })
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

fn malformed(token: &str, position: usize) -> UsageSyntaxError {
    UsageSyntaxError::MalformedArgument {
        token: token.to_string(),
        position,
    }
}
