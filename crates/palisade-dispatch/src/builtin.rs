//! Small built-in plugins.
//!
//! These are self-contained commands that need nothing beyond the
//! invocation context, shipped mostly so a fresh deployment has
//! something to respond with. They also cover both handler shapes:
//! `ping` is trigger-based, `say` and `whois` are usage-based.

use anyhow::{bail, Result};
use async_trait::async_trait;

use palisade_types::InvocationContext;

use crate::plugin::{CommandInput, HandlerSpec, Plugin, Trigger};

/// Replies "Pong!". Useful to see whether the bot is responding.
pub struct PingPlugin;

#[async_trait]
impl Plugin for PingPlugin {
    fn name(&self) -> &str {
        "ping"
    }

    fn synopsis(&self) -> &str {
        "Say \"Pong!\"."
    }

    fn description(&self) -> &str {
        "This command only replies back with a message. It can be used to see if \
         the bot is responding."
    }

    fn handler(&self) -> HandlerSpec {
        HandlerSpec::Trigger(Trigger::Word("ping".into()))
    }

    async fn run(
        &self,
        _input: CommandInput,
        _ctx: &InvocationContext,
    ) -> Result<Option<String>> {
        Ok(Some("Pong!".to_string()))
    }
}

/// Posts the trailing text back as the bot's own message.
pub struct SayPlugin;

#[async_trait]
impl Plugin for SayPlugin {
    fn name(&self) -> &str {
        "say"
    }

    fn synopsis(&self) -> &str {
        "Post some specified text."
    }

    fn description(&self) -> &str {
        "Anything after the command word (minus the first space) is interpreted as \
         the content of a message to be posted by the bot."
    }

    fn handler(&self) -> HandlerSpec {
        HandlerSpec::Usages(vec!["...content".into()])
    }

    async fn run(&self, input: CommandInput, _ctx: &InvocationContext) -> Result<Option<String>> {
        let Some(args) = input.args() else {
            bail!("say is usage-based");
        };
        let content = args.get("content").and_then(|v| v.as_text()).unwrap_or_default();
        Ok(Some(content.to_string()))
    }
}

/// Shows a member's display name and user id.
pub struct WhoisPlugin;

#[async_trait]
impl Plugin for WhoisPlugin {
    fn name(&self) -> &str {
        "whois"
    }

    fn synopsis(&self) -> &str {
        "Look up a member of this server."
    }

    fn description(&self) -> &str {
        "Given a member, by mention or user id, replies with their display name and \
         user id."
    }

    fn handler(&self) -> HandlerSpec {
        HandlerSpec::Usages(vec!["who:member".into()])
    }

    async fn run(&self, input: CommandInput, _ctx: &InvocationContext) -> Result<Option<String>> {
        let Some(member) = input.args().and_then(|args| args.get("who")?.as_member()) else {
            bail!("whois is usage-based with a member argument");
        };
        Ok(Some(format!("{} ({})", member.display_name, member.user_id)))
    }
}
