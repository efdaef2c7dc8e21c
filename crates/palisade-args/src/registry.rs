//! The type registry: named token coercions.
//!
//! Each [`ArgumentType`] turns one whitespace-delimited token into a
//! typed [`ArgValue`], or signals that the token is not of that type.
//! Basic types (`integer`, `wholeNumber`, `string`) are pure functions
//! of the token; platform types (`channel`, `member`, `user`,
//! `message`) resolve an entity through the invocation's
//! [`EntityResolver`] and may fault if the platform is unreachable.
//!
//! The registry is populated once at startup and never mutated after.

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{bail, Result};
use async_trait::async_trait;
use regex::Regex;

use palisade_types::{
    ChannelId, ChannelRef, InvocationContext, MemberRef, MessageId, MessageRef, UserId, UserRef,
};

/// A value produced by a successful coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Text(String),
    /// Bound by literal keyword specs; always `true` when present.
    Flag(bool),
    Channel(ChannelRef),
    Member(MemberRef),
    User(UserRef),
    Message(MessageRef),
}

impl ArgValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&ChannelRef> {
        match self {
            ArgValue::Channel(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&MemberRef> {
        match self {
            ArgValue::Member(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageRef> {
        match self {
            ArgValue::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserRef> {
        match self {
            ArgValue::User(u) => Some(u),
            _ => None,
        }
    }
}

/// The outcome of a coercion attempt that did not fault.
///
/// `NoMatch` means "syntactically plausible but not this type" and is
/// ordinary control flow: the matcher abandons the current usage and
/// tries the next one. A faulted lookup is the `Err` channel of
/// [`ArgumentType::coerce`] and is treated the same way, but logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Value(ArgValue),
    NoMatch,
}

/// A named argument type: a token coercion plus help-text description.
#[async_trait]
pub trait ArgumentType: Send + Sync {
    /// The name usage strings refer to this type by.
    fn name(&self) -> &str;

    /// Human-readable description for generated help text.
    fn description(&self) -> &str;

    /// Attempt to coerce one token. Must not leave side effects when the
    /// token does not match.
    async fn coerce(&self, token: &str, ctx: &InvocationContext) -> Result<Coercion>;
}

/// Registry of argument types, keyed by name.
///
/// Built once at startup ([`TypeRegistry::with_builtin_types`]) and
/// treated as immutable thereafter.
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, Box<dyn ArgumentType>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in types.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for ty in builtin_types() {
            registry
                .register(ty)
                .expect("builtin type names are unique");
        }
        registry
    }

    /// Register a type. Rejects duplicates by name.
    pub fn register(&mut self, ty: Box<dyn ArgumentType>) -> Result<()> {
        let name = ty.name().to_string();
        if self.types.contains_key(&name) {
            bail!("argument type already registered: {name}");
        }
        self.types.insert(name, ty);
        Ok(())
    }

    /// Look up a type by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn ArgumentType> {
        self.types.get(name).map(|t| t.as_ref())
    }

    /// List `(name, description)` pairs for help text, sorted by name.
    pub fn descriptions(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .types
            .values()
            .map(|t| (t.name(), t.description()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }
}

fn builtin_types() -> Vec<Box<dyn ArgumentType>> {
    vec![
        Box::new(IntegerType),
        Box::new(WholeNumberType),
        Box::new(StringType),
        Box::new(ChannelType),
        Box::new(MemberType),
        Box::new(UserType),
        Box::new(MessageType),
    ]
}

static CHANNEL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://discord\.com/channels/(?P<guild>\d+)/(?P<channel>\d+)$").unwrap()
});

static MESSAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://discord\.com/channels/(?P<guild>\d+)/(?P<channel>\d+)/(?P<message>\d+)$")
        .unwrap()
});

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@!?(?P<id>\d+)>$").unwrap());

/// Base-10 signed integer.
struct IntegerType;

#[async_trait]
impl ArgumentType for IntegerType {
    fn name(&self) -> &str {
        "integer"
    }

    fn description(&self) -> &str {
        "a base-10 integer, possibly negative"
    }

    async fn coerce(&self, token: &str, _ctx: &InvocationContext) -> Result<Coercion> {
        Ok(match token.parse::<i64>() {
            Ok(n) => Coercion::Value(ArgValue::Int(n)),
            Err(_) => Coercion::NoMatch,
        })
    }
}

/// Non-negative base-10 integer.
struct WholeNumberType;

#[async_trait]
impl ArgumentType for WholeNumberType {
    fn name(&self) -> &str {
        "wholeNumber"
    }

    fn description(&self) -> &str {
        "a base-10 integer of at least zero"
    }

    async fn coerce(&self, token: &str, _ctx: &InvocationContext) -> Result<Coercion> {
        Ok(match token.parse::<i64>() {
            Ok(n) if n >= 0 => Coercion::Value(ArgValue::Int(n)),
            _ => Coercion::NoMatch,
        })
    }
}

/// Any single token, verbatim.
struct StringType;

#[async_trait]
impl ArgumentType for StringType {
    fn name(&self) -> &str {
        "string"
    }

    fn description(&self) -> &str {
        "a single word of text"
    }

    async fn coerce(&self, token: &str, _ctx: &InvocationContext) -> Result<Coercion> {
        Ok(Coercion::Value(ArgValue::Text(token.to_string())))
    }
}

/// A guild channel: `here`, a channel URL, or a raw channel id.
struct ChannelType;

#[async_trait]
impl ArgumentType for ChannelType {
    fn name(&self) -> &str {
        "channel"
    }

    fn description(&self) -> &str {
        "a channel: `here`, a channel link, or a channel id"
    }

    async fn coerce(&self, token: &str, ctx: &InvocationContext) -> Result<Coercion> {
        if token == "here" {
            return Ok(Coercion::Value(ArgValue::Channel(ctx.channel.clone())));
        }

        let id = match CHANNEL_URL.captures(token) {
            Some(caps) => ChannelId::new(&caps["channel"]),
            None => ChannelId::new(token),
        };

        Ok(match ctx.resolver.channel(&id).await? {
            Some(channel) => Coercion::Value(ArgValue::Channel(channel)),
            None => Coercion::NoMatch,
        })
    }
}

/// A guild member, by mention markup or raw user id.
struct MemberType;

#[async_trait]
impl ArgumentType for MemberType {
    fn name(&self) -> &str {
        "member"
    }

    fn description(&self) -> &str {
        "a member of this server, by mention or user id"
    }

    async fn coerce(&self, token: &str, ctx: &InvocationContext) -> Result<Coercion> {
        let id = user_id_from_token(token);
        Ok(match ctx.resolver.member(&id).await? {
            Some(member) => Coercion::Value(ArgValue::Member(member)),
            None => Coercion::NoMatch,
        })
    }
}

/// Any platform user, by mention markup or raw user id.
struct UserType;

#[async_trait]
impl ArgumentType for UserType {
    fn name(&self) -> &str {
        "user"
    }

    fn description(&self) -> &str {
        "any user, by mention or user id"
    }

    async fn coerce(&self, token: &str, ctx: &InvocationContext) -> Result<Coercion> {
        let id = user_id_from_token(token);
        Ok(match ctx.resolver.user(&id).await? {
            Some(user) => Coercion::Value(ArgValue::User(user)),
            None => Coercion::NoMatch,
        })
    }
}

/// A message: a message URL, or a message id in the current channel.
struct MessageType;

#[async_trait]
impl ArgumentType for MessageType {
    fn name(&self) -> &str {
        "message"
    }

    fn description(&self) -> &str {
        "a message: a message link, or a message id in this channel"
    }

    async fn coerce(&self, token: &str, ctx: &InvocationContext) -> Result<Coercion> {
        let (channel_id, message_id) = match MESSAGE_URL.captures(token) {
            Some(caps) => (
                ChannelId::new(&caps["channel"]),
                MessageId::new(&caps["message"]),
            ),
            None => (ctx.channel.id.clone(), MessageId::new(token)),
        };

        Ok(match ctx.resolver.message(&channel_id, &message_id).await? {
            Some(message) => Coercion::Value(ArgValue::Message(message)),
            None => Coercion::NoMatch,
        })
    }
}

fn user_id_from_token(token: &str) -> UserId {
    match USER_MENTION.captures(token) {
        Some(caps) => UserId::new(&caps["id"]),
        None => UserId::new(token),
    }
}
