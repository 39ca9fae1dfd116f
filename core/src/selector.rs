//! The turn-ended decision procedure.
//!
//! ORDER (fixed):
//!   1. Guard on the settings snapshot. No host calls when inactive.
//!   2. Fetch the live profile list. Failure means an empty list.
//!   3. Intersect included profiles with the live list.
//!   4. Stop with a warning when nothing is eligible.
//!   5. Draw one eligible profile uniformly.
//!   6. Activate it, waiting for the switch to complete.
//!   7. Compare the applied name with the requested one.
//!
//! RULES:
//!   - The registry call always completes before activation starts.
//!   - Every failure ends as a log line plus a notification. Nothing
//!     propagates back to the host's event dispatcher.
//!   - No memory across turns: each draw is independent.

use crate::{
    error::ConnectorError,
    host::{ProfileActivator, ProfileRegistry},
    notify::{Notification, Notifier},
    rng::SelectionRng,
    settings::Settings,
    types::{ProfileName, DISPLAY_NAME},
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

pub const DEFAULT_INFO_TIMEOUT_MS: u64 = 2500;

/// What a single turn-ended invocation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    Disabled,
    NothingIncluded,
    /// Another invocation was still running.
    Busy,
    NoEligibleProfiles,
    Applied { profile: ProfileName },
    Mismatch { requested: ProfileName, returned: String },
    ActivationFailed { profile: ProfileName },
    /// An unexpected failure stopped the turn.
    Aborted,
}

impl TurnOutcome {
    pub fn applied_profile(&self) -> Option<&str> {
        match self {
            Self::Applied { profile } => Some(profile),
            _ => None,
        }
    }
}

/// Profiles that are both included and currently available, in
/// `included` order, each at most once.
pub fn eligible_profiles(included: &[ProfileName], available: &[ProfileName]) -> Vec<ProfileName> {
    let available: HashSet<&str> = available.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut eligible = Vec::new();
    for name in included {
        if available.contains(name.as_str()) && seen.insert(name.as_str()) {
            eligible.push(name.clone());
        }
    }
    eligible
}

pub struct ProfileSelector {
    registry:        Rc<dyn ProfileRegistry>,
    activator:       Rc<dyn ProfileActivator>,
    notifier:        Rc<dyn Notifier>,
    rng:             RefCell<SelectionRng>,
    busy:            Cell<bool>,
    busy_guard:      bool,
    info_timeout_ms: u64,
}

/// Clears the busy flag when the invocation ends, including by unwinding.
struct BusyGuard<'a>(&'a Cell<bool>);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ProfileSelector {
    pub fn new(
        registry: Rc<dyn ProfileRegistry>,
        activator: Rc<dyn ProfileActivator>,
        notifier: Rc<dyn Notifier>,
        rng: SelectionRng,
    ) -> Self {
        Self {
            registry,
            activator,
            notifier,
            rng: RefCell::new(rng),
            busy: Cell::new(false),
            busy_guard: true,
            info_timeout_ms: DEFAULT_INFO_TIMEOUT_MS,
        }
    }

    /// Turn the overlapping-invocation guard on or off.
    pub fn with_busy_guard(mut self, enabled: bool) -> Self {
        self.busy_guard = enabled;
        self
    }

    pub fn with_info_timeout(mut self, timeout_ms: u64) -> Self {
        self.info_timeout_ms = timeout_ms;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Handle one turn-ended notification. Never fails.
    pub async fn on_turn_ended(&self, settings: &Settings) -> TurnOutcome {
        log::debug!("random-connector: generation ended event received");

        // Fast path, checked before anything touches the host.
        if !settings.enabled {
            log::debug!("random-connector: disabled, skipping");
            return TurnOutcome::Disabled;
        }
        if settings.included_profiles.is_empty() {
            log::debug!("random-connector: no profiles included, skipping");
            return TurnOutcome::NothingIncluded;
        }

        if self.busy_guard && self.busy.get() {
            log::warn!("random-connector: previous selection still running, skipping this turn");
            return TurnOutcome::Busy;
        }
        self.busy.set(true);
        let _guard = BusyGuard(&self.busy);

        let turn = AssertUnwindSafe(self.select_and_apply(settings)).catch_unwind().await;
        turn.unwrap_or_else(|_| {
            log::error!("random-connector: profile selection/loading failed unexpectedly");
            self.notifier.notify(Notification::error(
                "Random Connector: Failed to set next profile due to an error.",
            ));
            TurnOutcome::Aborted
        })
    }

    async fn select_and_apply(&self, settings: &Settings) -> TurnOutcome {
        log::debug!("random-connector: preparing to select next connection profile");

        let available = self.fetch_available().await;
        let eligible = eligible_profiles(&settings.included_profiles, &available);

        let Some(index) = self.rng.borrow_mut().pick_index(eligible.len()) else {
            log::warn!(
                "random-connector: no valid profiles available for random selection among included ones \
                 (included={:?}, available={:?})",
                settings.included_profiles,
                available
            );
            return TurnOutcome::NoEligibleProfiles;
        };
        let selected = &eligible[index];
        log::info!("random-connector: randomly selected \"{selected}\" for the next turn");

        self.apply(selected).await
    }

    /// The live profile list. Failures are reported and read as empty.
    pub async fn fetch_available(&self) -> Vec<ProfileName> {
        match self.registry.list_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                self.report_registry_failure(&e);
                Vec::new()
            }
        }
    }

    fn report_registry_failure(&self, e: &ConnectorError) {
        if e.is_unavailable() {
            log::error!("random-connector: '/profile-list' command not found. Is Connection Manager enabled?");
            self.notifier.notify(Notification::error(
                "Connection Manager extension not found or '/profile-list' command is unavailable.",
            ));
        } else {
            log::error!("random-connector: error fetching profile list: {e}");
            self.notifier
                .notify(Notification::error("Failed to get profile list from Connection Manager."));
        }
    }

    async fn apply(&self, selected: &str) -> TurnOutcome {
        let returned = match self.activator.activate_profile(selected, true).await {
            Ok(returned) => returned,
            Err(e) if e.is_unavailable() => {
                log::error!("random-connector: '/profile' command not found. Is Connection Manager enabled?");
                self.notifier.notify(Notification::error(
                    "Connection Manager extension not found or '/profile' command is unavailable.",
                ));
                return TurnOutcome::ActivationFailed { profile: selected.to_string() };
            }
            Err(e) => {
                log::error!("random-connector: error applying profile \"{selected}\": {e}");
                self.notifier.notify(Notification::error(format!(
                    "Failed to apply profile \"{selected}\" due to an error."
                )));
                return TurnOutcome::ActivationFailed { profile: selected.to_string() };
            }
        };

        // Exact match only. A host that answers with anything else is
        // treated as not having switched.
        if returned != selected {
            log::error!(
                "random-connector: applying \"{selected}\" returned unexpected result {returned:?}"
            );
            self.notifier.notify(Notification::error(format!(
                "Failed to apply profile \"{selected}\" via command."
            )));
            return TurnOutcome::Mismatch {
                requested: selected.to_string(),
                returned,
            };
        }

        log::info!("random-connector: profile \"{selected}\" applied");
        self.notifier.notify(
            Notification::info(format!("Next connector set to: {selected}"))
                .with_title(DISPLAY_NAME)
                .with_timeout(self.info_timeout_ms),
        );
        TurnOutcome::Applied { profile: selected.to_string() }
    }
}
