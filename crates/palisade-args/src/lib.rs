//! Usage grammar compilation and argument matching for Palisade.
//!
//! A plugin declares how its arguments look with one or more *usage
//! strings* (`"who:member ...reason"`). At registration time each usage
//! string is compiled into an ordered list of argument specs; at
//! invocation time the matcher tries the compiled usages in declaration
//! order against the raw trailing text, coercing each token through the
//! type registry.
//!
//! - [`TypeRegistry`] / [`ArgumentType`] -- named token coercions, some
//!   backed by async platform lookups
//! - [`compile_usage`] / [`CompiledUsage`] -- the usage mini-grammar
//! - [`match_arguments`] -- backtracking resolution across usages

pub mod matcher;
pub mod registry;
pub mod usage;

pub use matcher::{match_arguments, MatchResult, ResolvedArgs};
pub use registry::{ArgValue, ArgumentType, Coercion, TypeRegistry};
pub use usage::{compile_usage, ArgSpec, CompiledUsage, UsageSyntaxError};
