//! Transient notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a toast, which picks its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

/// Toasts currently on screen, oldest first
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    lifetime: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_TOAST_DURATION_MS))
    }
}

impl ToastQueue {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, created: Instant) {
        let message = message.into();
        tracing::debug!(?kind, %message, "toast");
        self.toasts.push_back(Toast {
            kind,
            message,
            created,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    /// Drop toasts that have outlived their lifetime as of `now`
    pub fn prune_at(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < lifetime);
    }

    pub fn prune(&mut self) {
        self.prune_at(Instant::now());
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Message of the newest toast
    #[cfg(test)]
    pub fn latest(&self) -> Option<(ToastKind, &str)> {
        self.toasts.back().map(|t| (t.kind, t.message.as_str()))
    }
}
