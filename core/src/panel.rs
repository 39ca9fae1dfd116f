//! Settings panel view model.
//!
//! The host renders the actual checkboxes; this module only decides what
//! they show.

use crate::{settings::Settings, types::ProfileName};
use serde::Serialize;

pub const EMPTY_PANEL_MESSAGE: &str =
    "No connection profiles found. Please create some in the Connection Manager extension first.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCheckbox {
    pub element_id: String,
    pub name:       ProfileName,
    pub checked:    bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsPanel {
    pub enabled:  bool,
    pub profiles: Vec<ProfileCheckbox>,
    pub message:  Option<String>,
}

impl SettingsPanel {
    /// One checkbox per available profile, in host order. Included profiles
    /// the host no longer lists get no checkbox but stay in the settings.
    pub fn build(settings: &Settings, available: &[ProfileName]) -> Self {
        let profiles: Vec<ProfileCheckbox> = available
            .iter()
            .map(|name| ProfileCheckbox {
                element_id: checkbox_id(name),
                name:       name.clone(),
                checked:    settings.is_included(name),
            })
            .collect();
        let message = profiles
            .is_empty()
            .then(|| EMPTY_PANEL_MESSAGE.to_string());
        Self {
            enabled: settings.enabled,
            profiles,
            message,
        }
    }

    pub fn checkbox(&self, name: &str) -> Option<&ProfileCheckbox> {
        self.profiles.iter().find(|c| c.name == name)
    }
}

/// `rc-profile-` plus the name with anything outside [A-Za-z0-9] as `_`.
pub fn checkbox_id(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("rc-profile-{sanitized}")
}
