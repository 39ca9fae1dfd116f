//! Fakes for the host collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use random_connector::{
    error::{ConnectorError, ConnectorResult},
    host::{ProfileActivator, ProfileRegistry},
};
use std::cell::{Cell, RefCell};

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── Registry ─────────────────────────────────────────────────────────────────

pub enum RegistryBehavior {
    Profiles(Vec<String>),
    Unavailable,
    Fails,
    Panics,
}

/// Profile registry with scripted behavior and a call counter.
pub struct FakeRegistry {
    behavior:  RegistryBehavior,
    pub calls: Cell<usize>,
    /// Yield to the executor once before answering.
    yields:    bool,
}

impl FakeRegistry {
    pub fn new(behavior: RegistryBehavior) -> Self {
        Self { behavior, calls: Cell::new(0), yields: false }
    }

    pub fn with_profiles(profiles: &[&str]) -> Self {
        Self::new(RegistryBehavior::Profiles(names(profiles)))
    }

    pub fn yielding(mut self) -> Self {
        self.yields = true;
        self
    }
}

#[async_trait(?Send)]
impl ProfileRegistry for FakeRegistry {
    async fn list_profiles(&self) -> ConnectorResult<Vec<String>> {
        self.calls.set(self.calls.get() + 1);
        if self.yields {
            tokio::task::yield_now().await;
        }
        match &self.behavior {
            RegistryBehavior::Profiles(p) => Ok(p.clone()),
            RegistryBehavior::Unavailable => Err(ConnectorError::unavailable("profile-list")),
            RegistryBehavior::Fails       => Err(ConnectorError::collaborator("registry exploded")),
            RegistryBehavior::Panics      => panic!("registry panicked"),
        }
    }
}

// ── Activator ────────────────────────────────────────────────────────────────

pub enum ActivatorBehavior {
    /// Return the requested name.
    Echo,
    /// Return this fixed string regardless of the request.
    Returns(String),
    Unavailable,
    Fails,
}

/// Profile activator that records every request it receives.
pub struct FakeActivator {
    behavior:     ActivatorBehavior,
    pub requests: RefCell<Vec<(String, bool)>>,
}

impl FakeActivator {
    pub fn new(behavior: ActivatorBehavior) -> Self {
        Self { behavior, requests: RefCell::new(Vec::new()) }
    }

    pub fn echo() -> Self {
        Self::new(ActivatorBehavior::Echo)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl ProfileActivator for FakeActivator {
    async fn activate_profile(&self, name: &str, wait_for_completion: bool) -> ConnectorResult<String> {
        self.requests.borrow_mut().push((name.to_string(), wait_for_completion));
        match &self.behavior {
            ActivatorBehavior::Echo        => Ok(name.to_string()),
            ActivatorBehavior::Returns(s)  => Ok(s.clone()),
            ActivatorBehavior::Unavailable => Err(ConnectorError::unavailable("profile")),
            ActivatorBehavior::Fails       => Err(ConnectorError::collaborator("activation exploded")),
        }
    }
}
