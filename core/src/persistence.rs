//! Settings persistence contract.
//!
//! The host owns durable storage. The extension only asks it to load or
//! save one settings object under a key.

use crate::{error::ConnectorResult, settings::Settings};
use async_trait::async_trait;
use std::rc::Rc;

#[async_trait(?Send)]
pub trait SettingsPersistence {
    /// The stored settings under `key`, or None if nothing was ever saved.
    /// Fields absent from the stored copy take their default values.
    async fn load(&self, key: &str) -> ConnectorResult<Option<Settings>>;

    /// Durably replace whatever is stored under `key`.
    async fn save(&self, key: &str, settings: &Settings) -> ConnectorResult<()>;
}

/// Lets several owners share one backend, e.g. a store and a tool that
/// inspects what was written.
#[async_trait(?Send)]
impl<P: SettingsPersistence + ?Sized> SettingsPersistence for Rc<P> {
    async fn load(&self, key: &str) -> ConnectorResult<Option<Settings>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, settings: &Settings) -> ConnectorResult<()> {
        (**self).save(key, settings).await
    }
}
