//! Core types shared across all Palisade crates.
//!
//! Defines typed identifiers, platform entity references, configuration,
//! and error types used by the argument matcher, permission engine, and
//! dispatcher.

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod ids;

pub use config::{load_config, save_config, BotConfig, PermissionConfig, PermissionRuleConfig, Scope};
pub use context::InvocationContext;
pub use entity::{ChannelRef, EntityResolver, MemberRef, MessageRef, UserRef};
pub use error::PalisadeError;
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
