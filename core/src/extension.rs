//! The extension façade the host talks to.
//!
//! LIFECYCLE:
//!   1. register()            : subscribe to host events at startup
//!   2. on_extension_loaded() : load settings, build the settings panel
//!   3. on_turn_ended()       : once per completed generation
//!
//! RULES:
//!   - RandomConnector owns the one Settings value (inside SettingsStore).
//!   - Host-facing entry points never return errors and never panic outward.
//!   - Settings changes stay in memory until save_settings().

use crate::{
    config::ConnectorConfig,
    event::{EventHandler, EventSource, HostEvent, HostEventType},
    host::{ProfileActivator, ProfileRegistry},
    notify::{Notification, Notifier},
    panel::SettingsPanel,
    persistence::SettingsPersistence,
    rng::SelectionRng,
    selector::{ProfileSelector, TurnOutcome},
    settings::{Settings, SettingsStore},
};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

const SUBSCRIPTIONS: &[HostEventType] = &[
    HostEventType::ExtensionLoaded,
    HostEventType::GenerationEnded,
];

pub struct RandomConnector {
    config:   ConnectorConfig,
    settings: SettingsStore,
    selector: ProfileSelector,
    notifier: Rc<dyn Notifier>,
    panel:    SettingsPanel,
}

impl RandomConnector {
    pub fn new(
        config: ConnectorConfig,
        persistence: Box<dyn SettingsPersistence>,
        registry: Rc<dyn ProfileRegistry>,
        activator: Rc<dyn ProfileActivator>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let settings = SettingsStore::new(config.settings_key.clone(), persistence, notifier.clone());
        let selector = ProfileSelector::new(
            registry,
            activator,
            notifier.clone(),
            SelectionRng::from_config(config.seed),
        )
        .with_busy_guard(config.busy_guard)
        .with_info_timeout(config.info_timeout_ms);

        Self {
            config,
            settings,
            selector,
            notifier,
            panel: SettingsPanel::default(),
        }
    }

    /// Event types this extension listens to.
    pub fn subscriptions() -> &'static [HostEventType] {
        SUBSCRIPTIONS
    }

    /// Explicit startup registration with the host's event source.
    pub fn register(&self, source: &mut EventSource) {
        for event_type in Self::subscriptions() {
            source.on(*event_type);
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn panel(&self) -> &SettingsPanel {
        &self.panel
    }

    /// Load settings and build the settings panel. Failures leave the
    /// defaults in place and tell the user.
    pub async fn on_extension_loaded(&mut self) -> &SettingsPanel {
        let loaded = AssertUnwindSafe(async {
            self.settings.load().await;
            self.refresh_panel().await;
        })
        .catch_unwind()
        .await;

        match loaded {
            Ok(()) => log::info!("random-connector: extension loaded and initialized"),
            Err(_) => {
                log::error!("random-connector: error during extension loading");
                self.notifier
                    .notify(Notification::error("Random Connector failed to load properly."));
            }
        }
        &self.panel
    }

    /// Rebuild the panel from a fresh profile list.
    pub async fn refresh_panel(&mut self) -> &SettingsPanel {
        let available = self.selector.fetch_available().await;
        self.panel = SettingsPanel::build(self.settings.settings(), &available);
        &self.panel
    }

    /// Pick and apply the next profile. Never fails.
    pub async fn on_turn_ended(&self) -> TurnOutcome {
        let snapshot = self.settings.settings().clone();
        self.selector.on_turn_ended(&snapshot).await
    }

    /// A checkbox changed. Kept in memory until save_settings().
    pub fn toggle_profile(&mut self, name: &str, included: bool) -> &Settings {
        self.settings.toggle_profile(name, included);
        if let Some(checkbox) = self.panel.profiles.iter_mut().find(|c| c.name == name) {
            checkbox.checked = included;
        }
        self.settings.settings()
    }

    /// The enable toggle changed. Kept in memory until save_settings().
    pub fn set_enabled(&mut self, flag: bool) {
        self.settings.set_enabled(flag);
        self.panel.enabled = flag;
    }

    pub async fn save_settings(&self) -> bool {
        self.settings.save().await
    }
}

#[async_trait(?Send)]
impl EventHandler for RandomConnector {
    async fn handle(&mut self, event: &HostEvent) {
        match event {
            HostEvent::ExtensionLoaded => {
                self.on_extension_loaded().await;
            }
            HostEvent::GenerationEnded { .. } => {
                let outcome = self.on_turn_ended().await;
                log::debug!("random-connector: turn outcome {outcome:?}");
            }
        }
    }
}
