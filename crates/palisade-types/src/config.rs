//! Configuration types for the bot and its permission rules.
//!
//! Both files are JSON. [`BotConfig`] is the top-level bot configuration
//! (token, command prefix, staff role); [`PermissionConfig`] is the
//! declarative allow-list the permission engine compiles. Loading merges
//! a shipped default file with an optional local override file, so a
//! fresh checkout runs with defaults and a missing local file is not an
//! error.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{ChannelId, RoleId};
use crate::PalisadeError;

/// Top-level bot configuration, loaded from `config.json`.
///
/// Unknown fields are preserved in `extra` so that plugin-owned settings
/// survive a load/save round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Platform authentication token. Required before serving traffic.
    pub token: Option<String>,
    /// Prefix that marks a message as a command invocation.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Role whose holders may trigger commands at all. Required.
    pub staff_role: Option<RoleId>,
    /// Settings owned by individual plugins, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_prefix() -> String {
    "!".to_string()
}

impl BotConfig {
    /// Check that the fields required before serving traffic are set.
    pub fn validate(&self) -> Result<(), PalisadeError> {
        if self.token.is_none() {
            return Err(PalisadeError::Config(
                "no token configured; set the \"token\" field in config.json so the bot \
                 can authenticate with the platform"
                    .into(),
            ));
        }
        if self.staff_role.is_none() {
            return Err(PalisadeError::Config(
                "no staff role configured; set the \"staffRole\" field in config.json, \
                 since only staff are authorized to trigger commands"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Load the bot configuration by merging `default_path` with an optional
/// override file at `path`.
///
/// The default file must exist and parse. The override file may be
/// absent; if present, its top-level fields replace the defaults
/// field-by-field.
pub fn load_config(path: &Path, default_path: &Path) -> Result<BotConfig, PalisadeError> {
    let defaults = read_json_object(default_path)?;

    let merged = match std::fs::read_to_string(path) {
        Ok(text) => {
            let overrides: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&text).map_err(|e| {
                    PalisadeError::Config(format!("failed to parse {}: {e}", path.display()))
                })?;
            let mut merged = defaults;
            for (key, value) in overrides {
                merged.insert(key, value);
            }
            merged
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => defaults,
        Err(e) => {
            return Err(PalisadeError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    serde_json::from_value(serde_json::Value::Object(merged))
        .map_err(|e| PalisadeError::Config(format!("invalid configuration: {e}")))
}

/// Write the configuration back to disk, pretty-printed.
pub fn save_config(path: &Path, config: &BotConfig) -> Result<(), PalisadeError> {
    let text = serde_json::to_string_pretty(config)
        .map_err(|e| PalisadeError::Config(format!("failed to serialize config: {e}")))?;
    std::fs::write(path, text).map_err(|e| {
        PalisadeError::Config(format!("failed to write {}: {e}", path.display()))
    })
}

fn read_json_object(
    path: &Path,
) -> Result<serde_json::Map<String, serde_json::Value>, PalisadeError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PalisadeError::Config(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| PalisadeError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// A rule field that is either the wildcard `"*"` or an explicit list.
///
/// Serialized exactly as the original format: the JSON string `"*"` or a
/// JSON array of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Matches anything in this field.
    Any,
    /// Matches only the listed names.
    List(Vec<String>),
}

impl Scope {
    pub fn is_any(&self) -> bool {
        matches!(self, Scope::Any)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Any => f.write_str("*"),
            Scope::List(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scope::Any => serializer.serialize_str("*"),
            Scope::List(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<String>),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) if s == "*" => Ok(Scope::Any),
            Raw::Text(s) => Err(D::Error::custom(format!(
                "expected \"*\" or a list of names, got \"{s}\""
            ))),
            Raw::List(names) => Ok(Scope::List(names)),
        }
    }
}

/// One declarative allow rule, prior to alias expansion.
///
/// `roles` and `channels` name alias groups defined in the enclosing
/// [`PermissionConfig`]; `commands` names commands directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionRuleConfig {
    /// Role alias group names. The wildcard is not valid for roles.
    pub roles: Vec<String>,
    /// Command names, or `"*"` for all commands.
    pub commands: Scope,
    /// Channel alias group names, or `"*"` for all channels.
    pub channels: Scope,
}

/// The full declarative permission configuration:
/// `{roles: {alias: [id]}, channels: {alias: [id]}, allowed: [rule]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Role alias groups: alias name to concrete role ids.
    #[serde(default)]
    pub roles: HashMap<String, Vec<RoleId>>,
    /// Channel alias groups: alias name to concrete channel ids.
    #[serde(default)]
    pub channels: HashMap<String, Vec<ChannelId>>,
    /// The allow rules themselves.
    #[serde(default)]
    pub allowed: Vec<PermissionRuleConfig>,
}
