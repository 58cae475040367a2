use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// How long a toast stays up unless dismissed.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Short-lived notices for the visitor.
///
/// Cloning yields another handle to the same list. Expiry timers run on
/// the tokio runtime, so `show` must be called from inside one. `shutdown`
/// cancels every pending timer and clears the list.
#[derive(Clone)]
pub struct ToastCenter {
    inner: Arc<ToastInner>,
}

struct ToastInner {
    toasts: Mutex<Vec<Toast>>,
    next_id: AtomicU64,
    ttl: Duration,
    cancel: CancellationToken,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::with_ttl(TOAST_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ToastInner {
                toasts: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                ttl,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Show a toast and schedule its removal. Returns its id.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        if self.inner.cancel.is_cancelled() {
            return id;
        }

        self.inner.list().push(Toast {
            id,
            message: message.into(),
            severity,
        });

        let inner = self.inner.clone();
        let cancel = self.inner.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.ttl) => {
                    inner.list().retain(|t| t.id != id);
                }
            }
        });

        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Info)
    }

    /// Remove a toast before it expires. Returns `false` if it was gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut list = self.inner.list();
        let before = list.len();
        list.retain(|t| t.id != id);
        list.len() != before
    }

    /// Toasts currently on screen, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.inner.list().clone()
    }

    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.list().clear();
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastInner {
    fn list(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
