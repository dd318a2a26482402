//! User-facing notifications: toasts for submit outcomes and a blocking
//! alert for load failures.

use std::sync::{Mutex, PoisonError};

/// Toast shown after a successful create or update.
pub const SUCCESS_MESSAGE: &str = "Solicitação processada com sucesso!";
/// Toast shown after a failed create or update.
pub const ERROR_MESSAGE: &str = "Ocorreu um erro ao processar sua solicitação!";
/// Alert raised when a record cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Ocorreu um erro no servidor, tente mais tarde.";
/// Inline message used for every submit failure that is not a 422.
pub const CONNECTION_FAILURE_MESSAGE: &str =
    "Falha na comunicação com o servidor. Por favor, tente mais tarde.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Notification capability injected into form controllers.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    /// Blocking alert; distinct from the error toast.
    fn alert(&self, message: &str);
}

/// Keeps every notification in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, kind: NotificationKind, message: &str) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                kind,
                message: message.to_string(),
            });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationKind::Error, message);
    }

    fn alert(&self, message: &str) {
        self.push(NotificationKind::Alert, message);
    }
}
