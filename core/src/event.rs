//! Host events and the explicit subscription table.
//!
//! RULE: The extension reacts ONLY to events it registered for at startup.
//! Registration is an ordinary call; there is no hidden global dispatch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Events the host fires that the extension may care about.
/// Variants are added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Fired once, after the host finished loading extensions.
    ExtensionLoaded,
    /// Fired after each generation completes. The payload is whatever the
    /// host attached to the event; the extension does not read it.
    GenerationEnded {
        #[serde(default)]
        payload: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEventType {
    ExtensionLoaded,
    GenerationEnded,
}

impl HostEvent {
    pub fn event_type(&self) -> HostEventType {
        match self {
            Self::ExtensionLoaded          => HostEventType::ExtensionLoaded,
            Self::GenerationEnded { .. }   => HostEventType::GenerationEnded,
        }
    }

    pub fn generation_ended() -> Self {
        Self::GenerationEnded { payload: serde_json::Value::Null }
    }
}

/// Something that reacts to host events.
#[async_trait(?Send)]
pub trait EventHandler {
    async fn handle(&mut self, event: &HostEvent);
}

/// The host side of the subscription: which event types have a listener.
#[derive(Debug, Default)]
pub struct EventSource {
    listeners: Vec<HostEventType>,
}

impl EventSource {
    pub fn new() -> Self { Self::default() }

    /// Register a listener for `event_type`. Registering twice is a no-op.
    pub fn on(&mut self, event_type: HostEventType) {
        if !self.listeners.contains(&event_type) {
            self.listeners.push(event_type);
        }
    }

    pub fn is_subscribed(&self, event_type: HostEventType) -> bool {
        self.listeners.contains(&event_type)
    }

    /// Deliver `event` to `handler` if its type was registered.
    /// Returns whether the event was delivered.
    pub async fn emit<H>(&self, handler: &mut H, event: &HostEvent) -> bool
    where
        H: EventHandler + ?Sized,
    {
        if !self.is_subscribed(event.event_type()) {
            log::debug!("event source: no listener for {:?}", event.event_type());
            return false;
        }
        handler.handle(event).await;
        true
    }
}
