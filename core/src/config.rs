use crate::{selector::DEFAULT_INFO_TIMEOUT_MS, types::EXTENSION_NAME};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Key the settings object is persisted under.
    pub settings_key:    String,
    /// How long the "next connector" toast stays up.
    pub info_timeout_ms: u64,
    /// Skip a turn while the previous one is still switching profiles.
    pub busy_guard:      bool,
    /// Fixed RNG seed. None seeds from OS entropy.
    pub seed:            Option<u64>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            settings_key:    EXTENSION_NAME.to_string(),
            info_timeout_ms: DEFAULT_INFO_TIMEOUT_MS,
            busy_guard:      true,
            seed:            None,
        }
    }
}

impl ConnectorConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.settings_key.trim().is_empty() {
            anyhow::bail!("settings_key must not be empty");
        }
        Ok(config)
    }

    /// Defaults with a fixed seed, for reproducible tests.
    pub fn default_test(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
