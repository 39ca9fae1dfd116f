//! Slash-command bridge to the host's connection manager.
//!
//! The host exposes profile operations as string commands whose results
//! come back as strings. CommandBridge turns them into the typed
//! ProfileRegistry / ProfileActivator contracts so nothing else in the
//! crate builds or parses command text.

use crate::{
    error::{ConnectorError, ConnectorResult},
    host::{ProfileActivator, ProfileRegistry},
    types::ProfileName,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Host commands the extension issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    ProfileList,
    Profile {
        name:             ProfileName,
        await_completion: bool,
    },
}

impl HostCommand {
    /// Command name as registered with the host, without the slash.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProfileList  => "profile-list",
            Self::Profile { .. } => "profile",
        }
    }

    /// Full command line, e.g. `/profile "My Profile" await=true`.
    pub fn to_command_line(&self) -> String {
        match self {
            Self::ProfileList => "/profile-list".to_string(),
            Self::Profile { name, await_completion } => {
                let mut line = format!("/profile \"{}\"", quote_escape(name));
                if *await_completion {
                    line.push_str(" await=true");
                }
                line
            }
        }
    }
}

/// Names may contain spaces and quotes; the quoted argument must survive.
fn quote_escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The host's slash-command executor.
#[async_trait(?Send)]
pub trait CommandExecutor {
    /// Whether a command with this name is registered.
    fn has_command(&self, name: &str) -> bool;

    /// Run a full command line and return its string result.
    async fn execute(&self, command_line: &str) -> ConnectorResult<String>;
}

pub struct CommandBridge<E> {
    executor: E,
}

impl<E: CommandExecutor> CommandBridge<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn run(&self, command: &HostCommand) -> ConnectorResult<String> {
        if !self.executor.has_command(command.name()) {
            return Err(ConnectorError::unavailable(command.name()));
        }
        let line = command.to_command_line();
        log::debug!("random-connector: executing command: {line}");
        self.executor.execute(&line).await
    }
}

/// Decode a `/profile-list` result. A JSON value that is not an array
/// lists nothing; array items that are not strings are skipped.
pub fn parse_profile_list(raw: &str) -> ConnectorResult<Vec<ProfileName>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let names = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        other => {
            log::warn!("random-connector: '/profile-list' returned a non-array result: {other}");
            Vec::new()
        }
    };
    Ok(names)
}

#[async_trait(?Send)]
impl<E: CommandExecutor> ProfileRegistry for CommandBridge<E> {
    async fn list_profiles(&self) -> ConnectorResult<Vec<ProfileName>> {
        let raw = self.run(&HostCommand::ProfileList).await?;
        if raw.trim().is_empty() {
            log::warn!("random-connector: '/profile-list' command returned empty result");
            return Ok(Vec::new());
        }
        parse_profile_list(&raw)
    }
}

#[async_trait(?Send)]
impl<E: CommandExecutor> ProfileActivator for CommandBridge<E> {
    async fn activate_profile(&self, name: &str, wait_for_completion: bool) -> ConnectorResult<String> {
        let command = HostCommand::Profile {
            name:             name.to_string(),
            await_completion: wait_for_completion,
        };
        self.run(&command).await
    }
}
