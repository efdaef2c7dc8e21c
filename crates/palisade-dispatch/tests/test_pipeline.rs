//! End-to-end tests of the invocation pipeline: prefix stripping, plugin
//! lookup, permission check, argument matching, plugin run, and the
//! user-visible replies for each failure mode.

mod common;

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use palisade_args::TypeRegistry;
use palisade_dispatch::builtin::{PingPlugin, SayPlugin, WhoisPlugin};
use palisade_dispatch::{
    CommandInput, DispatchOutcome, Dispatcher, HandlerSpec, Plugin, PluginRegistry, Trigger,
};
use palisade_policy::PermissionEngine;
use palisade_types::InvocationContext;

use common::context_with_roles;

/// A plugin whose `run` always fails, for the internal-error path.
struct ExplodePlugin;

#[async_trait]
impl Plugin for ExplodePlugin {
    fn name(&self) -> &str {
        "explode"
    }

    fn synopsis(&self) -> &str {
        "Always fails."
    }

    fn handler(&self) -> HandlerSpec {
        HandlerSpec::Usages(vec![String::new()])
    }

    async fn run(
        &self,
        _input: CommandInput,
        _ctx: &InvocationContext,
    ) -> Result<Option<String>> {
        bail!("deliberate failure");
    }
}

/// A pattern-triggered plugin, like the historical regex-trigger shape.
/// Echoes the whole command line it matched.
struct ShoutPlugin;

#[async_trait]
impl Plugin for ShoutPlugin {
    fn name(&self) -> &str {
        "shout"
    }

    fn synopsis(&self) -> &str {
        "Shout the command back."
    }

    fn handler(&self) -> HandlerSpec {
        HandlerSpec::Trigger(Trigger::Pattern(
            regex::Regex::new(r"^shout\b").unwrap(),
        ))
    }

    async fn run(&self, input: CommandInput, _ctx: &InvocationContext) -> Result<Option<String>> {
        let CommandInput::Trigger { rest } = input else {
            bail!("shout is trigger-based");
        };
        Ok(Some(rest.to_uppercase()))
    }
}

/// Staff (role 900) may run everything; helpers (role 901) only `ping`.
fn dispatcher() -> Dispatcher {
    let types = TypeRegistry::with_builtin_types();

    let mut plugins = PluginRegistry::new();
    plugins.register(Arc::new(PingPlugin), &types).unwrap();
    plugins.register(Arc::new(SayPlugin), &types).unwrap();
    plugins.register(Arc::new(WhoisPlugin), &types).unwrap();
    plugins.register(Arc::new(ExplodePlugin), &types).unwrap();
    plugins.register(Arc::new(ShoutPlugin), &types).unwrap();

    let permissions = PermissionEngine::compile(
        &serde_json::from_str(
            r#"{
                "roles": {"staff": ["900"], "helpers": ["901"]},
                "channels": {},
                "allowed": [
                    {"roles": ["staff"], "commands": "*", "channels": "*"},
                    {"roles": ["helpers"], "commands": ["ping"], "channels": "*"}
                ]
            }"#,
        )
        .unwrap(),
    )
    .unwrap();

    Dispatcher::new(plugins, permissions, types, "!")
}

#[tokio::test]
async fn usage_based_command_runs_with_resolved_args() {
    let outcome = dispatcher()
        .dispatch("!say hello there world", &context_with_roles(&["900"]))
        .await;
    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            reply: Some("hello there world".into())
        }
    );
}

#[tokio::test]
async fn trigger_based_command_runs() {
    let outcome = dispatcher()
        .dispatch("!ping", &context_with_roles(&["900"]))
        .await;
    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            reply: Some("Pong!".into())
        }
    );
}

#[tokio::test]
async fn async_coercion_resolves_through_pipeline() {
    let outcome = dispatcher()
        .dispatch("!whois 501", &context_with_roles(&["900"]))
        .await;
    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            reply: Some("alice (501)".into())
        }
    );
}

#[tokio::test]
async fn non_command_messages_are_ignored() {
    let ctx = context_with_roles(&["900"]);
    let dispatcher = dispatcher();
    assert_eq!(
        dispatcher.dispatch("just chatting", &ctx).await,
        DispatchOutcome::Ignored
    );
    assert_eq!(
        dispatcher.dispatch("!unknowncommand", &ctx).await,
        DispatchOutcome::Ignored
    );
}

#[tokio::test]
async fn denied_roles_get_a_notice_and_no_run() {
    let dispatcher = dispatcher();

    // No roles at all.
    let outcome = dispatcher
        .dispatch("!say anything", &context_with_roles(&[]))
        .await;
    assert!(matches!(outcome, DispatchOutcome::Denied { .. }));

    // Helpers may ping but not say.
    let helpers = context_with_roles(&["901"]);
    assert!(matches!(
        dispatcher.dispatch("!say anything", &helpers).await,
        DispatchOutcome::Denied { .. }
    ));
    assert_eq!(
        dispatcher.dispatch("!ping", &helpers).await,
        DispatchOutcome::Completed {
            reply: Some("Pong!".into())
        }
    );
}

#[tokio::test]
async fn unmatched_arguments_render_usage_help() {
    // "notamember" does not resolve, so whois's only usage fails.
    let outcome = dispatcher()
        .dispatch("!whois notamember", &context_with_roles(&["900"]))
        .await;
    let DispatchOutcome::UsageHelp { help } = outcome else {
        panic!("expected usage help, got {outcome:?}");
    };
    assert!(help.contains("!whois who:member"), "got: {help}");
}

#[tokio::test]
async fn plugin_failure_is_caught_and_reported() {
    let outcome = dispatcher()
        .dispatch("!explode", &context_with_roles(&["900"]))
        .await;
    let DispatchOutcome::Failed { notice } = outcome else {
        panic!("expected failure notice, got {outcome:?}");
    };
    assert!(notice.contains("unhandled error"), "got: {notice}");
}

#[tokio::test]
async fn pattern_trigger_receives_the_whole_command_line() {
    let outcome = dispatcher()
        .dispatch("!shout quietly please", &context_with_roles(&["900"]))
        .await;
    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            reply: Some("SHOUT QUIETLY PLEASE".into())
        }
    );
}

#[tokio::test]
async fn extra_arguments_to_no_argument_usage_are_help() {
    // explode's single usage is empty; trailing text must not match it.
    let outcome = dispatcher()
        .dispatch("!explode now", &context_with_roles(&["900"]))
        .await;
    assert!(matches!(outcome, DispatchOutcome::UsageHelp { .. }));
}
