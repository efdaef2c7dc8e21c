//! Shared fixtures for dispatcher integration tests: an in-memory
//! entity resolver and a ready-made invocation context.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use palisade_types::{
    ChannelId, ChannelRef, EntityResolver, GuildId, InvocationContext, MemberRef, MessageId,
    MessageRef, RoleId, UserId, UserRef,
};

/// Resolver backed by fixed in-memory tables.
pub struct FakeResolver {
    pub guild: GuildId,
    pub channels: Vec<ChannelRef>,
    pub members: Vec<MemberRef>,
    pub users: Vec<UserRef>,
    pub messages: Vec<MessageRef>,
}

#[async_trait]
impl EntityResolver for FakeResolver {
    fn guild_id(&self) -> &GuildId {
        &self.guild
    }

    async fn channel(&self, id: &ChannelId) -> Result<Option<ChannelRef>> {
        Ok(self.channels.iter().find(|c| &c.id == id).cloned())
    }

    async fn member(&self, id: &UserId) -> Result<Option<MemberRef>> {
        Ok(self.members.iter().find(|m| &m.user_id == id).cloned())
    }

    async fn user(&self, id: &UserId) -> Result<Option<UserRef>> {
        Ok(self.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn message(&self, channel: &ChannelId, id: &MessageId) -> Result<Option<MessageRef>> {
        Ok(self
            .messages
            .iter()
            .find(|m| &m.channel_id == channel && &m.id == id)
            .cloned())
    }
}

/// A context for a message from member `501` (alice) holding the given
/// roles, posted in channel `100` of guild `1`. The resolver also knows
/// channel `200`, user `502` (bob), and message `9001` in channel `100`.
pub fn context_with_roles(roles: &[&str]) -> InvocationContext {
    let here = ChannelRef {
        id: ChannelId::new("100"),
        name: "general".into(),
    };
    let author = MemberRef {
        user_id: UserId::new("501"),
        display_name: "alice".into(),
        roles: roles.iter().map(|r| RoleId::new(*r)).collect(),
    };
    let resolver = FakeResolver {
        guild: GuildId::new("1"),
        channels: vec![
            here.clone(),
            ChannelRef {
                id: ChannelId::new("200"),
                name: "mod-log".into(),
            },
        ],
        members: vec![author.clone()],
        users: vec![UserRef {
            id: UserId::new("502"),
            username: "bob".into(),
        }],
        messages: vec![MessageRef {
            id: MessageId::new("9001"),
            channel_id: ChannelId::new("100"),
            content: "hello".into(),
        }],
    };
    InvocationContext {
        resolver: Arc::new(resolver),
        channel: here,
        author,
        message_id: MessageId::new("9000"),
    }
}
