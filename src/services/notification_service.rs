//! Servicio de notificaciones (toasts)
//!
//! Las vistas avisan del resultado de cada mutación a través de un
//! `Notifier`. `MemoryNotifier` las acumula para que la CLI las imprima
//! al final de cada comando.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Nivel de una notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => f.write_str("✅"),
            NotificationLevel::Error => f.write_str("❌"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Notificaciones acumuladas en memoria hasta que alguien las consume
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Vaciar y devolver las notificaciones pendientes
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|n| n.message.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        debug!("Notificación pendiente: {} {}", level, message);
        self.lock().push(Notification {
            level,
            message: message.to_string(),
            created_at: Utc::now(),
        });
    }
}
