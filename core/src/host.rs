//! Host collaborator contracts for connection profiles.
//!
//! RULE: The extension never reaches into host internals. Listing and
//! applying profiles go through these two traits only.

use crate::{error::ConnectorResult, types::ProfileName};
use async_trait::async_trait;
use std::cell::RefCell;

/// Lists the profiles the host currently knows about.
#[async_trait(?Send)]
pub trait ProfileRegistry {
    /// Current profile names in host order.
    async fn list_profiles(&self) -> ConnectorResult<Vec<ProfileName>>;
}

/// Makes a profile the host's current one.
#[async_trait(?Send)]
pub trait ProfileActivator {
    /// With `wait_for_completion` the call resolves only once the switch has
    /// fully completed. Returns the name of the profile that ended up applied.
    /// Anything other than `name` (including an empty string) means the
    /// switch did not happen.
    async fn activate_profile(&self, name: &str, wait_for_completion: bool) -> ConnectorResult<String>;
}

/// In-memory profile registry and activator.
///
/// Stands in for the host's connection manager in the headless runner.
/// Activating an unknown profile returns an empty string, the same answer
/// the host gives for a failed switch.
#[derive(Debug, Default)]
pub struct StaticConnectionManager {
    profiles:    RefCell<Vec<ProfileName>>,
    active:      RefCell<Option<ProfileName>>,
    activations: RefCell<Vec<ProfileName>>,
}

impl StaticConnectionManager {
    pub fn new<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProfileName>,
    {
        Self {
            profiles: RefCell::new(profiles.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn set_profiles(&self, profiles: Vec<ProfileName>) {
        *self.profiles.borrow_mut() = profiles;
    }

    pub fn active(&self) -> Option<ProfileName> {
        self.active.borrow().clone()
    }

    /// Every successfully applied profile, oldest first.
    pub fn activations(&self) -> Vec<ProfileName> {
        self.activations.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ProfileRegistry for StaticConnectionManager {
    async fn list_profiles(&self) -> ConnectorResult<Vec<ProfileName>> {
        Ok(self.profiles.borrow().clone())
    }
}

#[async_trait(?Send)]
impl ProfileActivator for StaticConnectionManager {
    async fn activate_profile(&self, name: &str, _wait_for_completion: bool) -> ConnectorResult<String> {
        if !self.profiles.borrow().iter().any(|p| p == name) {
            return Ok(String::new());
        }
        *self.active.borrow_mut() = Some(name.to_string());
        self.activations.borrow_mut().push(name.to_string());
        Ok(name.to_string())
    }
}
