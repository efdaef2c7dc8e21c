//! Backtracking argument matching.
//!
//! [`match_arguments`] resolves raw trailing text against a list of
//! compiled usages, in declaration order. Within a usage, consumption is
//! greedy and never backtracks: once a token is accepted it stays
//! consumed. Across usages, any failure abandons the current usage
//! wholesale and moves on to the next candidate. The first usage that
//! consumes *exactly* all of the input wins; a usage that matches every
//! spec but leaves trailing text is not a match.

use std::collections::HashMap;

use palisade_types::InvocationContext;

use crate::registry::{ArgValue, Coercion, TypeRegistry};
use crate::usage::{ArgSpec, CompiledUsage};

/// Argument names bound to their coerced values.
pub type ResolvedArgs = HashMap<String, ArgValue>;

/// The outcome of matching raw text against a set of usages.
///
/// Never partial: either one usage fully matched, or none did.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Matched(ResolvedArgs),
    NoMatch,
}

impl MatchResult {
    pub fn into_args(self) -> Option<ResolvedArgs> {
        match self {
            MatchResult::Matched(args) => Some(args),
            MatchResult::NoMatch => None,
        }
    }
}

/// Match raw trailing text against each usage in order and return the
/// bindings of the first usage that fully consumes it.
///
/// Coercions that fault (the platform lookup errored) are logged and
/// treated exactly like a failed type check: the current usage is
/// abandoned and the next candidate is tried.
pub async fn match_arguments(
    raw: &str,
    usages: &[CompiledUsage],
    registry: &TypeRegistry,
    ctx: &InvocationContext,
) -> MatchResult {
    'each_usage: for usage in usages {
        // Leading whitespace never separates anything, and dropping it
        // up front makes whitespace-only input count as empty, so a
        // no-argument usage still matches a message with a stray
        // trailing space. Trailing text is otherwise left verbatim for
        // rest-captures.
        let mut remainder = raw.trim_start();
        let mut bindings = ResolvedArgs::new();

        for spec in &usage.specs {
            match spec {
                ArgSpec::Rest { name } => {
                    // Rest always terminates consumption; the compiler
                    // guarantees it is the final spec.
                    bindings.insert(name.clone(), ArgValue::Text(remainder.to_string()));
                    return MatchResult::Matched(bindings);
                }
                ArgSpec::Literal { keyword } => {
                    let Some((token, rest)) = split_token(remainder) else {
                        continue 'each_usage;
                    };
                    if token != keyword {
                        continue 'each_usage;
                    }
                    bindings.insert(keyword.clone(), ArgValue::Flag(true));
                    remainder = rest;
                }
                ArgSpec::Typed { name, type_name } => {
                    let Some((token, rest)) = split_token(remainder) else {
                        continue 'each_usage;
                    };
                    // Unknown names cannot occur for usages that came
                    // out of compile_usage against this registry.
                    let Some(ty) = registry.lookup(type_name) else {
                        continue 'each_usage;
                    };
                    match ty.coerce(token, ctx).await {
                        Ok(Coercion::Value(value)) => {
                            bindings.insert(name.clone(), value);
                            remainder = rest;
                        }
                        Ok(Coercion::NoMatch) => continue 'each_usage,
                        Err(error) => {
                            tracing::warn!(
                                type_name = %type_name,
                                token = %token,
                                error = %format!("{error:#}"),
                                "argument coercion faulted; trying next usage"
                            );
                            continue 'each_usage;
                        }
                    }
                }
            }
        }

        if remainder.is_empty() {
            return MatchResult::Matched(bindings);
        }
    }

    MatchResult::NoMatch
}

/// Split off the first whitespace-delimited token, trimming whitespace
/// from the front of what remains. `None` if there is no token.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], s[end..].trim_start())),
        None => Some((s, "")),
    }
}
