//! Alias expansion: declarative rules to concrete per-role rules.
//!
//! A configured rule names role and channel *alias groups*; expansion
//! replaces each alias with its concrete ids and takes the cross
//! product, yielding individually addressable `(role, command, channel)`
//! rules. Wildcards survive expansion as explicit patterns, distinct
//! from any enumerated set.

use palisade_types::{ChannelId, PalisadeError, PermissionConfig, RoleId, Scope};

/// The command field of a concrete rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPattern {
    /// Matches any command.
    Any,
    /// Matches exactly this command name.
    Name(String),
}

/// The channel field of a concrete rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPattern {
    /// Matches any channel, including an unscoped (channel-less) check.
    Any,
    /// Matches exactly this channel id.
    Id(ChannelId),
}

/// One concrete rule after alias expansion. Roles are always concrete;
/// wildcards are only meaningful for commands and channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRule {
    pub role: RoleId,
    pub command: CommandPattern,
    pub channel: ChannelPattern,
}

impl PermissionRule {
    /// Whether this rule applies to the given role, command, and
    /// (optional) channel. An absent channel matches only rules whose
    /// channel field is the wildcard.
    pub fn matches(&self, role: &RoleId, command: &str, channel: Option<&ChannelId>) -> bool {
        if &self.role != role {
            return false;
        }
        if let CommandPattern::Name(name) = &self.command {
            if name != command {
                return false;
            }
        }
        match (&self.channel, channel) {
            (ChannelPattern::Any, _) => true,
            (ChannelPattern::Id(_), None) => false,
            (ChannelPattern::Id(id), Some(ch)) => id == ch,
        }
    }
}

/// Expand every configured rule into concrete [`PermissionRule`]s.
///
/// An alias that is not defined in the enclosing config is a fatal
/// configuration error, as is a `"*"` in a rule's role list.
pub fn expand_rules(config: &PermissionConfig) -> Result<Vec<PermissionRule>, PalisadeError> {
    let mut rules = Vec::new();

    for (rule_index, rule) in config.allowed.iter().enumerate() {
        let mut roles: Vec<RoleId> = Vec::new();
        for alias in &rule.roles {
            if alias == "*" {
                return Err(PalisadeError::Permission(format!(
                    "rule {rule_index}: \"*\" is not valid for roles; list role aliases explicitly"
                )));
            }
            let ids = config.roles.get(alias).ok_or_else(|| {
                PalisadeError::Permission(format!(
                    "rule {rule_index}: unknown role alias \"{alias}\""
                ))
            })?;
            roles.extend(ids.iter().cloned());
        }

        let commands: Vec<CommandPattern> = match &rule.commands {
            Scope::Any => vec![CommandPattern::Any],
            Scope::List(names) => names
                .iter()
                .map(|name| CommandPattern::Name(name.clone()))
                .collect(),
        };

        let channels: Vec<ChannelPattern> = match &rule.channels {
            Scope::Any => vec![ChannelPattern::Any],
            Scope::List(aliases) => {
                let mut ids = Vec::new();
                for alias in aliases {
                    let group = config.channels.get(alias).ok_or_else(|| {
                        PalisadeError::Permission(format!(
                            "rule {rule_index}: unknown channel alias \"{alias}\""
                        ))
                    })?;
                    ids.extend(group.iter().cloned().map(ChannelPattern::Id));
                }
                ids
            }
        };

        for role in &roles {
            for command in &commands {
                for channel in &channels {
                    rules.push(PermissionRule {
                        role: role.clone(),
                        command: command.clone(),
                        channel: channel.clone(),
                    });
                }
            }
        }
    }

    Ok(rules)
}
