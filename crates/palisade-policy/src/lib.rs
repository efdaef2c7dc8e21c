//! Permission rule engine for Palisade.
//!
//! Compiles the declarative allow-list from [`palisade_types::PermissionConfig`]
//! (role/channel alias groups plus rules) into concrete per-role rules
//! and a role-keyed index, then answers "may this role set invoke this
//! command?" without re-scanning the rule list per check.

pub mod engine;
pub mod rules;

pub use engine::{CommandGrant, PermissionEngine};
pub use rules::{expand_rules, ChannelPattern, CommandPattern, PermissionRule};
