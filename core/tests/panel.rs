mod common;

use common::names;
use random_connector::{
    panel::{checkbox_id, SettingsPanel, EMPTY_PANEL_MESSAGE},
    settings::Settings,
};

#[test]
fn checkbox_ids_replace_non_alphanumerics() {
    assert_eq!(checkbox_id("alpha"), "rc-profile-alpha");
    assert_eq!(checkbox_id("GPT 4o / fast"), "rc-profile-GPT_4o___fast");
    assert_eq!(checkbox_id("한국어"), "rc-profile-___");
}

#[test]
fn one_checkbox_per_available_profile() {
    let settings = Settings {
        enabled: true,
        included_profiles: names(&["beta", "stale"]),
    };

    let panel = SettingsPanel::build(&settings, &names(&["alpha", "beta"]));

    assert!(panel.enabled);
    assert!(panel.message.is_none());
    assert_eq!(panel.profiles.len(), 2);
    assert_eq!(panel.profiles[0].name, "alpha");
    assert!(!panel.profiles[0].checked);
    assert!(panel.checkbox("beta").unwrap().checked);
    assert!(panel.checkbox("stale").is_none(), "Unavailable profiles get no checkbox");
}

#[test]
fn empty_registry_shows_message() {
    let panel = SettingsPanel::build(&Settings::default(), &[]);

    assert!(panel.profiles.is_empty());
    assert_eq!(panel.message.as_deref(), Some(EMPTY_PANEL_MESSAGE));
}
