//! Command dispatch for Palisade -- the plugin contract, the plugin
//! registry, and the dispatcher that ties permissions and argument
//! matching together.
//!
//! - [`Plugin`] -- the contract a command plugin implements
//! - [`HandlerSpec`] / [`CommandHandler`] -- usage-based vs trigger-based
//!   handlers, resolved to a tagged variant at registration time
//! - [`PluginRegistry`] -- compiled plugins keyed by name, plus help text
//! - [`Dispatcher`] -- per-message pipeline: lookup, authorize, match, run
//! - [`builtin`] -- small self-contained plugins (`ping`, `say`, `whois`)

pub mod builtin;
pub mod dispatch;
pub mod plugin;
pub mod registry;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use plugin::{CommandHandler, CommandInput, HandlerSpec, Plugin, Trigger};
pub use registry::{PluginRegistry, RegisteredPlugin};
