//! Platform entity references and the resolution boundary.
//!
//! The core never talks to the chat platform directly. Typed argument
//! coercions that need to resolve an entity by id go through the
//! [`EntityResolver`] trait; production code implements it over the
//! platform API, tests implement it in memory.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, MessageId, UserId};

/// A resolved guild channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
}

/// A resolved guild member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub user_id: UserId,
    pub display_name: String,
    /// Role ids held by this member, used for permission checks.
    pub roles: Vec<crate::ids::RoleId>,
}

/// A resolved platform user (not necessarily a guild member).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

/// A resolved message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub content: String,
}

/// Asynchronous entity resolution against the chat platform.
///
/// Every method resolves an id within the guild the invocation came
/// from. `Ok(None)` means the id does not name such an entity (a soft
/// failure for the matcher); `Err` means the lookup itself faulted,
/// e.g. the platform was unreachable.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// The guild the current invocation belongs to.
    fn guild_id(&self) -> &GuildId;

    /// Resolve a channel by id.
    async fn channel(&self, id: &ChannelId) -> Result<Option<ChannelRef>>;

    /// Resolve a guild member by user id.
    async fn member(&self, id: &UserId) -> Result<Option<MemberRef>>;

    /// Resolve a user by id.
    async fn user(&self, id: &UserId) -> Result<Option<UserRef>>;

    /// Resolve a message by id within the given channel.
    async fn message(&self, channel: &ChannelId, id: &MessageId) -> Result<Option<MessageRef>>;
}
