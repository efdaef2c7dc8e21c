//! Per-invocation context threaded through coercions and plugin actions.

use std::sync::Arc;

use crate::entity::{ChannelRef, EntityResolver, MemberRef};
use crate::ids::MessageId;

/// Everything a single command invocation knows about where it came
/// from. Built by the platform layer for each incoming message and
/// passed by reference through the matcher into typed coercions and the
/// plugin action. The core never mutates it.
#[derive(Clone)]
pub struct InvocationContext {
    /// Resolver bound to the guild the message arrived in.
    pub resolver: Arc<dyn EntityResolver>,
    /// The channel the command message was posted in.
    pub channel: ChannelRef,
    /// The member who sent the command message.
    pub author: MemberRef,
    /// Id of the command message itself.
    pub message_id: MessageId,
}

impl std::fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("channel", &self.channel)
            .field("author", &self.author)
            .field("message_id", &self.message_id)
            .finish_non_exhaustive()
    }
}
