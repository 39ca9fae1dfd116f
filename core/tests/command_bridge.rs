mod common;

use async_trait::async_trait;
use common::{init_logging, names};
use random_connector::{
    command::{parse_profile_list, CommandBridge, CommandExecutor, HostCommand},
    error::{ConnectorError, ConnectorResult},
    host::{ProfileActivator, ProfileRegistry},
};
use std::cell::RefCell;
use std::collections::HashMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Slash-command host with canned replies keyed by command line.
#[derive(Default)]
struct ScriptedHost {
    commands: Vec<&'static str>,
    replies:  HashMap<String, String>,
    executed: RefCell<Vec<String>>,
}

impl ScriptedHost {
    fn with_commands(commands: &[&'static str]) -> Self {
        Self { commands: commands.to_vec(), ..Self::default() }
    }

    fn reply(mut self, line: &str, result: &str) -> Self {
        self.replies.insert(line.to_string(), result.to_string());
        self
    }
}

#[async_trait(?Send)]
impl CommandExecutor for ScriptedHost {
    fn has_command(&self, name: &str) -> bool {
        self.commands.contains(&name)
    }

    async fn execute(&self, command_line: &str) -> ConnectorResult<String> {
        self.executed.borrow_mut().push(command_line.to_string());
        self.replies
            .get(command_line)
            .cloned()
            .ok_or_else(|| ConnectorError::collaborator(format!("no reply for {command_line}")))
    }
}

// ── Command rendering ────────────────────────────────────────────────────────

#[test]
fn renders_command_lines() {
    assert_eq!(HostCommand::ProfileList.to_command_line(), "/profile-list");
    let apply = HostCommand::Profile { name: "My Profile".into(), await_completion: true };
    assert_eq!(apply.to_command_line(), "/profile \"My Profile\" await=true");
    let queued = HostCommand::Profile { name: "x".into(), await_completion: false };
    assert_eq!(queued.to_command_line(), "/profile \"x\"");
}

#[test]
fn escapes_quotes_in_names() {
    let cmd = HostCommand::Profile { name: r#"say "hi" \o/"#.into(), await_completion: true };
    assert_eq!(cmd.to_command_line(), r#"/profile "say \"hi\" \\o/" await=true"#);
}

// ── Profile list decoding ────────────────────────────────────────────────────

#[test]
fn parses_profile_list_payloads() {
    assert_eq!(parse_profile_list(r#"["a","b c"]"#).unwrap(), names(&["a", "b c"]));
    assert_eq!(parse_profile_list(r#"["a", 3, null, "b"]"#).unwrap(), names(&["a", "b"]));
    assert!(parse_profile_list(r#"{"a": 1}"#).unwrap().is_empty());
    assert!(parse_profile_list("\"a\"").unwrap().is_empty());
    assert!(matches!(parse_profile_list("not json"), Err(ConnectorError::Serialization(_))));
}

#[tokio::test]
async fn lists_profiles_via_command() {
    init_logging();
    let host = ScriptedHost::with_commands(&["profile-list"]).reply("/profile-list", r#"["alpha","beta"]"#);
    let bridge = CommandBridge::new(host);

    assert_eq!(bridge.list_profiles().await.unwrap(), names(&["alpha", "beta"]));
}

#[tokio::test]
async fn empty_list_result_means_no_profiles() {
    let host = ScriptedHost::with_commands(&["profile-list"]).reply("/profile-list", "");
    let bridge = CommandBridge::new(host);

    assert!(bridge.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_list_command_is_unavailable() {
    let bridge = CommandBridge::new(ScriptedHost::with_commands(&["profile"]));

    let err = bridge.list_profiles().await.unwrap_err();

    assert!(err.is_unavailable());
    assert!(bridge.executor().executed.borrow().is_empty(), "Missing command must not be executed");
}

// ── Activation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn activation_sends_awaiting_command() {
    let host = ScriptedHost::with_commands(&["profile"])
        .reply("/profile \"alpha\" await=true", "alpha");
    let bridge = CommandBridge::new(host);

    let applied = bridge.activate_profile("alpha", true).await.unwrap();

    assert_eq!(applied, "alpha");
    assert_eq!(
        *bridge.executor().executed.borrow(),
        vec!["/profile \"alpha\" await=true".to_string()]
    );
}

#[tokio::test]
async fn non_waiting_activation_omits_await_flag() {
    let host = ScriptedHost::with_commands(&["profile"]).reply("/profile \"alpha\"", "alpha");
    let bridge = CommandBridge::new(host);

    bridge.activate_profile("alpha", false).await.unwrap();

    assert_eq!(*bridge.executor().executed.borrow(), vec!["/profile \"alpha\"".to_string()]);
}

/// Quotes inside a profile name stay inside the quoted argument.
#[tokio::test]
async fn quoted_name_reaches_host_escaped() {
    let line = r#"/profile "Claude \"fast\"" await=true"#;
    let host = ScriptedHost::with_commands(&["profile"]).reply(line, r#"Claude "fast""#);
    let bridge = CommandBridge::new(host);

    let applied = bridge.activate_profile(r#"Claude "fast""#, true).await.unwrap();

    assert_eq!(applied, r#"Claude "fast""#);
    assert_eq!(*bridge.executor().executed.borrow(), vec![line.to_string()]);
}

#[tokio::test]
async fn missing_activation_command_is_unavailable() {
    let bridge = CommandBridge::new(ScriptedHost::with_commands(&["profile-list"]));

    let err = bridge.activate_profile("alpha", true).await.unwrap_err();

    assert!(matches!(err, ConnectorError::CommandUnavailable { ref command } if command == "profile"));
}
