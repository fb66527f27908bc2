/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// What a mutation asked of the host.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// State changed and should be saved now.
    PersistRequested,
    /// State changed; saving can wait.
    ChangeMarked,
    Unchanged,
}

/// Outbound side-effect sink supplied by the host. Every method defaults to
/// a no-op; `notify_persist` falls back to `mark_changed` when the host has
/// no auto-save.
pub trait EventSink: Send + Sync {
    fn notify_persist(&self) {
        self.mark_changed();
    }

    fn mark_changed(&self) {}

    fn notify_user(&self, _message: &str, _severity: Severity) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {}
