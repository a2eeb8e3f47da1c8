use std::time::Duration;

use crate::ToastId;

/// How long a non-sticky toast stays visible.
pub const TOAST_AUTO_DISMISS: Duration = Duration::from_millis(4200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    /// Sticky toasts are never scheduled for auto-dismiss.
    pub sticky: bool,
}

/// Transient user-facing messages. Ids are strictly increasing for the
/// lifetime of the store and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationStore {
    last_id: ToastId,
    toasts: Vec<Toast>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.insert(kind, message.into(), false)
    }

    pub fn push_sticky(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.insert(kind, message.into(), true)
    }

    fn insert(&mut self, kind: ToastKind, message: String, sticky: bool) -> ToastId {
        self.last_id += 1;
        let id = self.last_id;
        self.toasts.push(Toast {
            id,
            kind,
            message,
            sticky,
        });
        id
    }

    /// Removes a toast. Returns false when it was already gone.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn last_id(&self) -> ToastId {
        self.last_id
    }
}
