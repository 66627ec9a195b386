//! Diagnostic side channel for catalog operations.
//!
//! The service reports what it is doing through a `Notifier` handed to it at
//! construction. Nothing it emits affects a response.

use std::sync::Mutex;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Debug,
    Info,
    Error,
}

/// One human-readable message about an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub operation: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            operation,
            message: message.into(),
        }
    }

    pub fn debug(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Debug,
            operation,
            message: message.into(),
        }
    }

    pub fn error(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            operation,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let operation = notice.operation;
        match notice.level {
            NoticeLevel::Debug => tracing::debug!(operation, "{}", notice.message),
            NoticeLevel::Info => tracing::info!(operation, "{}", notice.message),
            NoticeLevel::Error => tracing::error!(operation, "{}", notice.message),
        }
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    inner: Mutex<Vec<Notice>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notice> {
        self.inner.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn for_operation(&self, operation: &str) -> Vec<Notice> {
        self.all()
            .into_iter()
            .filter(|n| n.operation == operation)
            .collect()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.push(notice);
        }
    }
}
