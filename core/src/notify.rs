//! User-visible notification channel (the host's toast popups).
//!
//! Notifications are fire-and-forget. A notifier never fails and never
//! returns anything to the caller.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level:      NotificationLevel,
    pub message:    String,
    pub title:      Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            title: None,
            timeout_ms: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self { Self::new(NotificationLevel::Success, message) }
    pub fn info(message: impl Into<String>)    -> Self { Self::new(NotificationLevel::Info, message) }
    pub fn error(message: impl Into<String>)   -> Self { Self::new(NotificationLevel::Error, message) }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used when no host UI is attached.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error   => log::error!("[toast] {}", n.message),
            NotificationLevel::Warning => log::warn!("[toast] {}", n.message),
            _                          => log::info!("[toast] {}", n.message),
        }
    }
}

/// Logs like LogNotifier and keeps every notification it received.
/// The headless host reports these back to its caller.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.entries.borrow().iter().filter(|n| n.level == level).count()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.entries.borrow_mut().drain(..).collect()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        self.entries.borrow_mut().push(notification);
    }
}
