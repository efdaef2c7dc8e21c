//! The permission engine: compiled rules plus a role-keyed index.
//!
//! [`PermissionEngine::compile`] expands the declarative configuration
//! once at startup and derives a read-only index from role id to the
//! commands that role may invoke. Per-invocation checks then cost one
//! map lookup per held role instead of a scan over every rule.

use std::collections::{HashMap, HashSet};

use palisade_types::{ChannelId, PalisadeError, PermissionConfig, RoleId};

use crate::rules::{expand_rules, ChannelPattern, CommandPattern, PermissionRule};

/// The set of commands granted to a role (or a whole role set).
///
/// `All` is absorbing: once a role is granted the wildcard, merging
/// further explicit grants changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandGrant {
    /// Every command.
    All,
    /// Exactly these commands.
    Only(HashSet<String>),
}

impl CommandGrant {
    /// Whether this grant covers the given command.
    pub fn covers(&self, command: &str) -> bool {
        match self {
            CommandGrant::All => true,
            CommandGrant::Only(names) => names.contains(command),
        }
    }

    fn absorb(&mut self, other: &CommandPattern) {
        match (&mut *self, other) {
            (CommandGrant::All, _) => {}
            (_, CommandPattern::Any) => *self = CommandGrant::All,
            (CommandGrant::Only(names), CommandPattern::Name(name)) => {
                names.insert(name.clone());
            }
        }
    }

    fn union_into(&self, target: &mut CommandGrant) {
        match (self, &mut *target) {
            (_, CommandGrant::All) => {}
            (CommandGrant::All, _) => *target = CommandGrant::All,
            (CommandGrant::Only(names), CommandGrant::Only(into)) => {
                into.extend(names.iter().cloned());
            }
        }
    }
}

/// Compiled permission rules with a derived per-role index.
///
/// Built once from static configuration and never mutated at runtime;
/// configuration changes require a restart.
#[derive(Debug)]
pub struct PermissionEngine {
    rules: Vec<PermissionRule>,
    index: HashMap<RoleId, CommandGrant>,
}

impl PermissionEngine {
    /// Expand the configuration and build the index.
    pub fn compile(config: &PermissionConfig) -> Result<Self, PalisadeError> {
        let rules = expand_rules(config)?;

        let mut index: HashMap<RoleId, CommandGrant> = HashMap::new();
        for rule in &rules {
            index
                .entry(rule.role.clone())
                .or_insert_with(|| CommandGrant::Only(HashSet::new()))
                .absorb(&rule.command);
        }

        tracing::debug!(
            rules = rules.len(),
            roles = index.len(),
            "compiled permission rules"
        );

        Ok(Self { rules, index })
    }

    /// May a holder of any of `roles` invoke `command`?
    ///
    /// This is the server-wide (channel-agnostic) check backed by the
    /// index; it short-circuits on the first role with a covering grant.
    pub fn is_allowed(&self, roles: &[RoleId], command: &str) -> bool {
        roles.iter().any(|role| {
            self.index
                .get(role)
                .is_some_and(|grant| grant.covers(command))
        })
    }

    /// The effective command set for a role set: the union of every
    /// held role's grant. Wildcard anywhere makes the result wildcard.
    pub fn allowed_commands(&self, roles: &[RoleId]) -> CommandGrant {
        let mut result = CommandGrant::Only(HashSet::new());
        for role in roles {
            if let Some(grant) = self.index.get(role) {
                grant.union_into(&mut result);
            }
            if result == CommandGrant::All {
                break;
            }
        }
        result
    }

    /// Channel-scoped check over the concrete rule list. With
    /// `channel: None`, only rules whose channel field is the wildcard
    /// apply.
    pub fn is_allowed_in(
        &self,
        roles: &[RoleId],
        command: &str,
        channel: Option<&ChannelId>,
    ) -> bool {
        roles.iter().any(|role| {
            self.rules
                .iter()
                .any(|rule| rule.matches(role, command, channel))
        })
    }

    /// The concrete rules this engine was compiled from.
    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    /// Whether any rule scopes itself to a specific channel. Callers
    /// that only ever see `false` can use the indexed checks alone.
    pub fn has_channel_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule.channel, ChannelPattern::Id(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(json: &str) -> PermissionEngine {
        PermissionEngine::compile(&serde_json::from_str(json).unwrap()).unwrap()
    }

    fn roles(ids: &[&str]) -> Vec<RoleId> {
        ids.iter().map(|id| RoleId::new(*id)).collect()
    }

    #[test]
    fn wildcard_rule_allows_any_command() {
        let engine = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {},
                "allowed": [{"roles": ["staff"], "commands": "*", "channels": "*"}]}"#,
        );
        assert!(engine.is_allowed(&roles(&["R1"]), "anything"));
        assert!(!engine.is_allowed(&roles(&["R2"]), "anything"));
    }

    #[test]
    fn explicit_grant_covers_only_listed_commands() {
        let engine = engine(
            r#"{"roles": {"helpers": ["R3"]}, "channels": {},
                "allowed": [{"roles": ["helpers"], "commands": ["pin", "say"], "channels": "*"}]}"#,
        );
        assert!(engine.is_allowed(&roles(&["R3"]), "pin"));
        assert!(engine.is_allowed(&roles(&["R3"]), "say"));
        assert!(!engine.is_allowed(&roles(&["R3"]), "ban"));
    }

    #[test]
    fn any_held_role_suffices() {
        let engine = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {},
                "allowed": [{"roles": ["staff"], "commands": ["ban"], "channels": "*"}]}"#,
        );
        assert!(engine.is_allowed(&roles(&["R9", "R1", "R8"]), "ban"));
        assert!(!engine.is_allowed(&roles(&["R9", "R8"]), "ban"));
        assert!(!engine.is_allowed(&[], "ban"));
    }

    #[test]
    fn wildcard_absorbs_regardless_of_merge_order() {
        // Wildcard first, explicit second.
        let engine_a = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {},
                "allowed": [
                    {"roles": ["staff"], "commands": "*", "channels": "*"},
                    {"roles": ["staff"], "commands": ["pin"], "channels": "*"}
                ]}"#,
        );
        // Explicit first, wildcard second.
        let engine_b = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {},
                "allowed": [
                    {"roles": ["staff"], "commands": ["pin"], "channels": "*"},
                    {"roles": ["staff"], "commands": "*", "channels": "*"}
                ]}"#,
        );
        for engine in [engine_a, engine_b] {
            assert_eq!(engine.allowed_commands(&roles(&["R1"])), CommandGrant::All);
            assert!(engine.is_allowed(&roles(&["R1"]), "whatever"));
        }
    }

    #[test]
    fn allowed_commands_unions_across_roles() {
        let engine = engine(
            r#"{"roles": {"a": ["R1"], "b": ["R2"]}, "channels": {},
                "allowed": [
                    {"roles": ["a"], "commands": ["pin"], "channels": "*"},
                    {"roles": ["b"], "commands": ["ban"], "channels": "*"}
                ]}"#,
        );
        let grant = engine.allowed_commands(&roles(&["R1", "R2"]));
        let CommandGrant::Only(names) = grant else {
            panic!("expected explicit set");
        };
        assert_eq!(names.len(), 2);
        assert!(names.contains("pin") && names.contains("ban"));

        assert_eq!(
            engine.allowed_commands(&roles(&["R9"])),
            CommandGrant::Only(HashSet::new())
        );
    }

    #[test]
    fn allowed_commands_wildcard_dominates_union() {
        let engine = engine(
            r#"{"roles": {"a": ["R1"], "b": ["R2"]}, "channels": {},
                "allowed": [
                    {"roles": ["a"], "commands": ["pin"], "channels": "*"},
                    {"roles": ["b"], "commands": "*", "channels": "*"}
                ]}"#,
        );
        assert_eq!(
            engine.allowed_commands(&roles(&["R1", "R2"])),
            CommandGrant::All
        );
    }

    #[test]
    fn channel_scoped_rules_only_apply_in_channel() {
        let engine = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {"mod": ["C1"]},
                "allowed": [{"roles": ["staff"], "commands": ["purge"], "channels": ["mod"]}]}"#,
        );
        let staff = roles(&["R1"]);
        let c1 = ChannelId::new("C1");
        let c2 = ChannelId::new("C2");

        assert!(engine.is_allowed_in(&staff, "purge", Some(&c1)));
        assert!(!engine.is_allowed_in(&staff, "purge", Some(&c2)));
        // An unscoped check does not satisfy a channel-scoped rule.
        assert!(!engine.is_allowed_in(&staff, "purge", None));
        assert!(engine.has_channel_rules());
    }

    #[test]
    fn wildcard_channel_rules_apply_everywhere() {
        let engine = engine(
            r#"{"roles": {"staff": ["R1"]}, "channels": {},
                "allowed": [{"roles": ["staff"], "commands": ["say"], "channels": "*"}]}"#,
        );
        let staff = roles(&["R1"]);
        assert!(engine.is_allowed_in(&staff, "say", Some(&ChannelId::new("C77"))));
        assert!(engine.is_allowed_in(&staff, "say", None));
        assert!(!engine.has_channel_rules());
    }

    #[test]
    fn empty_config_denies_everything() {
        let engine = engine(r#"{"roles": {}, "channels": {}, "allowed": []}"#);
        assert!(!engine.is_allowed(&roles(&["R1"]), "help"));
        assert_eq!(
            engine.allowed_commands(&roles(&["R1"])),
            CommandGrant::Only(HashSet::new())
        );
    }
}
