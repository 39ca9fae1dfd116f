//! Shared primitive types used across the extension.

/// A connection profile name as known to the host.
pub type ProfileName = String;

/// The extension's stable name. Doubles as the default settings key.
pub const EXTENSION_NAME: &str = "random-connector";

/// Title shown on the extension's user-visible notifications.
pub const DISPLAY_NAME: &str = "Random Connector";
