//! The dispatcher: per-message pipeline from raw content to plugin run.
//!
//! For each incoming command message: strip the command prefix, find
//! the plugin, check permissions, resolve arguments, run the plugin.
//! Soft failures (no plugin, no matching usage, permission denial) are
//! ordinary [`DispatchOutcome`]s, never errors; a plugin `run` that
//! fails is caught here, logged, and reported as an internal error.

use palisade_args::{match_arguments, MatchResult, TypeRegistry};
use palisade_policy::PermissionEngine;
use palisade_types::InvocationContext;

use crate::plugin::{CommandHandler, CommandInput, Trigger};
use crate::registry::{render_usage, PluginRegistry, RegisteredPlugin};

/// The result of dispatching one message.
///
/// Replies and notices are returned as text for the platform layer to
/// deliver; this core does not send anything itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a command, or no plugin recognized it. Nothing to do.
    Ignored,
    /// The plugin ran; `reply` is its optional response text.
    Completed { reply: Option<String> },
    /// The author's roles do not permit this command.
    Denied { notice: String },
    /// No usage matched the arguments; `help` renders every usage form.
    UsageHelp { help: String },
    /// The plugin's `run` failed; already logged, reported to the user.
    Failed { notice: String },
}

/// Owns the compiled plugin registry, permission engine, and type
/// registry for the lifetime of the process. All three are built once
/// at startup; the dispatcher itself is stateless per invocation.
pub struct Dispatcher {
    plugins: PluginRegistry,
    permissions: PermissionEngine,
    types: TypeRegistry,
    command_prefix: String,
}

impl Dispatcher {
    pub fn new(
        plugins: PluginRegistry,
        permissions: PermissionEngine,
        types: TypeRegistry,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            plugins,
            permissions,
            types,
            command_prefix: command_prefix.into(),
        }
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn permissions(&self) -> &PermissionEngine {
        &self.permissions
    }

    /// Dispatch one incoming message.
    pub async fn dispatch(&self, content: &str, ctx: &InvocationContext) -> DispatchOutcome {
        let Some(command_line) = content.strip_prefix(&self.command_prefix) else {
            return DispatchOutcome::Ignored;
        };

        let Some((entry, trailing)) = find_plugin(&self.plugins, command_line) else {
            tracing::debug!(command = %command_line, "no plugin recognized command");
            return DispatchOutcome::Ignored;
        };
        let name = entry.name();

        if !self
            .permissions
            .is_allowed_in(&ctx.author.roles, name, Some(&ctx.channel.id))
        {
            tracing::info!(
                command = %name,
                author = %ctx.author.user_id,
                "permission denied"
            );
            return DispatchOutcome::Denied {
                notice: "You have insufficient permission to run that command.".to_string(),
            };
        }

        let input = match &entry.handler {
            CommandHandler::UsageBased { usages } => {
                match match_arguments(&trailing, usages, &self.types, ctx).await {
                    MatchResult::Matched(args) => CommandInput::Usage(args),
                    MatchResult::NoMatch => {
                        return DispatchOutcome::UsageHelp {
                            help: render_usage(entry, &self.command_prefix),
                        }
                    }
                }
            }
            CommandHandler::TriggerBased { .. } => CommandInput::Trigger { rest: trailing },
        };

        match entry.plugin.run(input, ctx).await {
            Ok(reply) => DispatchOutcome::Completed { reply },
            Err(error) => {
                tracing::error!(
                    command = %name,
                    error = %format!("{error:#}"),
                    "plugin run failed"
                );
                DispatchOutcome::Failed {
                    notice: "An unhandled error was encountered while running that command. \
                             Details have been logged for a maintainer to see."
                        .to_string(),
                }
            }
        }
    }
}

/// Find the plugin that recognizes this command line, together with the
/// trailing text its handler should parse.
///
/// Usage-based plugins match on their name as the leading word.
/// Trigger-based plugins match their word (also on a word boundary) or
/// their pattern; a pattern-triggered plugin receives the whole command
/// line as trailing text. Plugins are tried in name order, matching the
/// registry's sorted listing.
fn find_plugin<'a>(
    plugins: &'a PluginRegistry,
    command_line: &str,
) -> Option<(&'a RegisteredPlugin, String)> {
    for entry in plugins.list() {
        match &entry.handler {
            CommandHandler::UsageBased { .. } => {
                if let Some(rest) = strip_word(command_line, entry.name()) {
                    return Some((entry, rest.to_string()));
                }
            }
            CommandHandler::TriggerBased { trigger } => match trigger {
                Trigger::Word(word) => {
                    if let Some(rest) = strip_word(command_line, word) {
                        return Some((entry, rest.to_string()));
                    }
                }
                Trigger::Pattern(pattern) => {
                    if pattern.is_match(command_line) {
                        return Some((entry, command_line.to_string()));
                    }
                }
            },
        }
    }
    None
}

/// If `line` begins with `word` on a word boundary, return the trailing
/// text with the single separating space removed.
fn strip_word<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(' ')
    }
}
