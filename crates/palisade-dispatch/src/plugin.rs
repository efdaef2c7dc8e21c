//! The plugin contract.
//!
//! A plugin declares how it is invoked through [`HandlerSpec`]: either a
//! list of usage strings (compiled through the grammar at registration),
//! or a bare trigger (a leading word or a regular expression) for
//! plugins that do their own parsing. The two shapes existed side by
//! side in historical plugins; resolving them into the
//! [`CommandHandler`] tagged variant happens once at registration, never
//! per invocation.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use palisade_args::{CompiledUsage, ResolvedArgs};
use palisade_types::InvocationContext;

/// How a trigger-based plugin recognizes its invocations.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// The command line starts with this word.
    Word(String),
    /// The command line matches this pattern.
    Pattern(Regex),
}

/// The handler shape a plugin declares.
#[derive(Debug, Clone)]
pub enum HandlerSpec {
    /// Usage strings, tried in declaration order (first listed wins).
    Usages(Vec<String>),
    /// A raw trigger; the plugin parses the command line itself.
    Trigger(Trigger),
}

/// A handler after registration-time compilation.
#[derive(Debug, Clone)]
pub enum CommandHandler {
    UsageBased { usages: Vec<CompiledUsage> },
    TriggerBased { trigger: Trigger },
}

/// What a plugin's action receives.
#[derive(Debug, Clone)]
pub enum CommandInput {
    /// Resolved arguments from a matched usage.
    Usage(ResolvedArgs),
    /// The trailing text after a matched trigger (for [`Trigger::Word`],
    /// the command line minus the word and one separating space; for
    /// [`Trigger::Pattern`], the whole command line).
    Trigger { rest: String },
}

impl CommandInput {
    /// The resolved arguments, if this invocation came through a usage.
    pub fn args(&self) -> Option<&ResolvedArgs> {
        match self {
            CommandInput::Usage(args) => Some(args),
            CommandInput::Trigger { .. } => None,
        }
    }
}

/// A command plugin.
///
/// The dispatcher owns lookup, authorization, and argument resolution;
/// `run` receives ready-to-use input and returns an optional reply for
/// the platform layer to deliver. Errors from `run` are caught at the
/// dispatch boundary, logged, and reported to the user as an internal
/// error.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// The command name, also the permission-engine command key.
    fn name(&self) -> &str;

    /// One-line summary for the help listing.
    fn synopsis(&self) -> &str;

    /// Longer help text shown for `help <name>`.
    fn description(&self) -> &str {
        ""
    }

    /// How invocations of this plugin are recognized and parsed.
    fn handler(&self) -> HandlerSpec;

    /// Execute one invocation. Returns the reply to post, if any.
    async fn run(&self, input: CommandInput, ctx: &InvocationContext) -> Result<Option<String>>;
}
