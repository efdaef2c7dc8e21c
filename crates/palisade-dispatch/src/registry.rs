//! The plugin registry.
//!
//! Registration compiles each plugin's usage strings against the type
//! registry; a grammar error there is fatal and must abort startup, so
//! a plugin with a broken usage string never serves traffic. The
//! registry also renders the help listing, filtered to what the asking
//! member is actually allowed to run.

use std::fmt::Write as _;
use std::sync::Arc;

use palisade_args::{compile_usage, TypeRegistry};
use palisade_policy::CommandGrant;
use palisade_types::PalisadeError;

use crate::plugin::{CommandHandler, HandlerSpec, Plugin};

/// A plugin with its registration-time compiled handler.
#[derive(Clone)]
pub struct RegisteredPlugin {
    pub plugin: Arc<dyn Plugin>,
    pub handler: CommandHandler,
}

impl RegisteredPlugin {
    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    /// Whether this plugin takes a compiled usage (and thus shows up in
    /// the command section of the help listing).
    pub fn is_usage_based(&self) -> bool {
        matches!(self.handler, CommandHandler::UsageBased { .. })
    }
}

/// Registered plugins, sorted by name.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<RegisteredPlugin>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin, compiling its usages. Rejects duplicate names
    /// and propagates usage grammar errors as fatal registration errors.
    pub fn register(
        &mut self,
        plugin: Arc<dyn Plugin>,
        types: &TypeRegistry,
    ) -> Result<(), PalisadeError> {
        let name = plugin.name().to_string();
        if self.get(&name).is_some() {
            return Err(PalisadeError::Registration(format!(
                "plugin already registered: {name}"
            )));
        }

        let handler = match plugin.handler() {
            HandlerSpec::Usages(usages) => {
                let compiled = usages
                    .iter()
                    .map(|usage| {
                        compile_usage(usage, types).map_err(|e| {
                            PalisadeError::Registration(format!(
                                "plugin \"{name}\": invalid usage \"{usage}\": {e}"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                CommandHandler::UsageBased { usages: compiled }
            }
            HandlerSpec::Trigger(trigger) => CommandHandler::TriggerBased { trigger },
        };

        self.plugins.push(RegisteredPlugin { plugin, handler });
        self.plugins.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(())
    }

    /// Look up a plugin by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// All registered plugins, sorted by name.
    pub fn list(&self) -> &[RegisteredPlugin] {
        &self.plugins
    }

    /// Render the overall help listing, restricted to the commands the
    /// given grant covers. Trigger-based plugins are listed separately
    /// since they have no usage to show.
    pub fn render_help(&self, grant: &CommandGrant, prefix: &str) -> String {
        let mut commands = String::new();
        let mut others = String::new();

        for entry in &self.plugins {
            if !grant.covers(entry.name()) {
                continue;
            }
            let section = if entry.is_usage_based() {
                &mut commands
            } else {
                &mut others
            };
            let _ = writeln!(section, "**{}** - {}", entry.name(), entry.plugin.synopsis());
        }

        let none = "(None)\n";
        format!(
            "The following plugins are enabled{}. Run `{prefix}help help` for more \
             information.\n\n__Command Plugins__\n{}\n__Other Plugins__\n{}",
            if matches!(grant, CommandGrant::All) {
                ""
            } else {
                " and usable by you"
            },
            if commands.is_empty() { none } else { &commands },
            if others.is_empty() { none } else { &others },
        )
    }

    /// Render per-plugin help: synopsis, usage lines, description.
    pub fn render_topic_help(&self, name: &str, prefix: &str) -> Option<String> {
        let entry = self.get(name)?;
        let mut text = format!("**{}** - {}\n", entry.name(), entry.plugin.synopsis());
        text.push_str(&render_usage(entry, prefix));
        let description = entry.plugin.description();
        if !description.is_empty() {
            text.push('\n');
            text.push_str(description);
        }
        Some(text)
    }
}

/// Render the `Usage:` block for a plugin: one line per usage form,
/// prefixed with the command invocation.
pub fn render_usage(entry: &RegisteredPlugin, prefix: &str) -> String {
    match &entry.handler {
        CommandHandler::UsageBased { usages } => {
            let mut text = String::from("Usage:\n");
            for usage in usages {
                if usage.raw.is_empty() {
                    let _ = writeln!(text, "{prefix}{}", entry.name());
                } else {
                    let _ = writeln!(text, "{prefix}{} {}", entry.name(), usage.raw);
                }
            }
            text
        }
        CommandHandler::TriggerBased { .. } => {
            format!("Usage: {prefix}{}\n", entry.name())
        }
    }
}
