//! Extension settings and their owning store.
//!
//! RULE: Settings live in exactly one SettingsStore. The selector only ever
//! sees a borrowed snapshot; it never mutates settings.
//!
//! Mutations are in-memory until save() is called explicitly.

use crate::{
    notify::{Notification, Notifier},
    persistence::SettingsPersistence,
    types::ProfileName,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Whether random selection runs at all.
    pub enabled: bool,
    /// Profiles the user opted into the random pool. May name profiles the
    /// host no longer has; those are filtered at selection time, not pruned.
    pub included_profiles: Vec<ProfileName>,
}

impl Settings {
    /// Include or exclude `name`. Including twice keeps a single entry;
    /// excluding drops every occurrence.
    pub fn toggle_profile(&mut self, name: &str, included: bool) {
        if included {
            if !self.is_included(name) {
                self.included_profiles.push(name.to_string());
            }
        } else {
            self.included_profiles.retain(|p| p != name);
        }
    }

    pub fn set_enabled(&mut self, flag: bool) {
        self.enabled = flag;
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.included_profiles.iter().any(|p| p == name)
    }

    /// True when a turn could possibly trigger a switch.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.included_profiles.is_empty()
    }
}

pub struct SettingsStore {
    key:         String,
    settings:    Settings,
    persistence: Box<dyn SettingsPersistence>,
    notifier:    Rc<dyn Notifier>,
}

impl SettingsStore {
    /// A store holding default settings until load() is called.
    pub fn new(
        key: impl Into<String>,
        persistence: Box<dyn SettingsPersistence>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            key: key.into(),
            settings: Settings::default(),
            persistence,
            notifier,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load the persisted copy. Fails open: a missing copy or an unavailable
    /// backend both yield the defaults.
    pub async fn load(&mut self) -> Settings {
        self.settings = match self.persistence.load(&self.key).await {
            Ok(Some(settings)) => {
                log::info!(
                    "random-connector: settings loaded (enabled={}, included={:?})",
                    settings.enabled,
                    settings.included_profiles
                );
                settings
            }
            Ok(None) => {
                log::info!("random-connector: no saved settings under '{}', using defaults", self.key);
                Settings::default()
            }
            Err(e) => {
                log::error!("random-connector: settings load failed, using defaults: {e}");
                Settings::default()
            }
        };
        self.settings.clone()
    }

    pub fn toggle_profile(&mut self, name: &str, included: bool) -> &Settings {
        self.settings.toggle_profile(name, included);
        log::debug!(
            "random-connector: included profiles updated: {:?}",
            self.settings.included_profiles
        );
        &self.settings
    }

    pub fn set_enabled(&mut self, flag: bool) {
        self.settings.set_enabled(flag);
        log::debug!(
            "random-connector: {}. Save settings to persist.",
            if flag { "enabled" } else { "disabled" }
        );
    }

    /// Write the current settings. Failures are reported to the user and
    /// logged, never raised. Returns whether the write went through.
    pub async fn save(&self) -> bool {
        match self.persistence.save(&self.key, &self.settings).await {
            Ok(()) => {
                log::info!("random-connector: settings saved: {:?}", self.settings);
                self.notifier
                    .notify(Notification::success("Random Connector settings saved."));
                true
            }
            Err(e) => {
                log::error!("random-connector: settings save failed: {e}");
                self.notifier
                    .notify(Notification::error("Random Connector failed to save settings."));
                false
            }
        }
    }
}
