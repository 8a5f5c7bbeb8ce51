// Console - Injected capture sink for browser console messages
//
// One ConsoleCapture per test, handed to the driver and to the diagnostic
// helpers that read it. Append-only from the page's side; nothing in the
// interaction layer depends on its contents.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Console message severity, as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    Log,
    Debug,
    Info,
    Warning,
    Error,
    #[serde(untagged)]
    Other(String),
}

impl ConsoleKind {
    /// Maps a browser message type ("log", "error", "warning", ...) to a kind.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "log" => ConsoleKind::Log,
            "debug" => ConsoleKind::Debug,
            "info" => ConsoleKind::Info,
            "warning" | "warn" => ConsoleKind::Warning,
            "error" => ConsoleKind::Error,
            other => ConsoleKind::Other(other.to_string()),
        }
    }
}

/// One captured console message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleEntry {
    pub kind: ConsoleKind,
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// Cloneable handle to a shared, append-only console log.
#[derive(Debug, Clone, Default)]
pub struct ConsoleCapture {
    entries: Arc<Mutex<Vec<ConsoleEntry>>>,
}

impl ConsoleCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and mirrors it to tracing.
    pub fn record(&self, kind: ConsoleKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "browser_console", kind = ?kind, "{}", message);

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.entries.lock().push(ConsoleEntry {
            kind,
            message,
            timestamp_ms,
        });
    }

    /// Snapshot of everything captured so far.
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn by_kind(&self, kind: &ConsoleKind) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| &entry.kind == kind)
            .cloned()
            .collect()
    }

    pub fn errors(&self) -> Vec<ConsoleEntry> {
        self.by_kind(&ConsoleKind::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|entry| entry.kind == ConsoleKind::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_filters_by_kind() {
        let capture = ConsoleCapture::new();
        capture.record(ConsoleKind::Log, "hydrated");
        capture.record(ConsoleKind::parse("error"), "Failed to load odds");
        capture.record(ConsoleKind::parse("warn"), "deprecated API");

        assert_eq!(capture.len(), 3);
        assert!(capture.has_errors());
        assert_eq!(capture.errors()[0].message, "Failed to load odds");
        assert_eq!(capture.by_kind(&ConsoleKind::Warning).len(), 1);
    }

    #[test]
    fn test_clones_share_the_buffer() {
        let capture = ConsoleCapture::new();
        let handle = capture.clone();
        handle.record(ConsoleKind::Info, "from the page");
        assert_eq!(capture.entries().len(), 1);

        capture.clear();
        assert!(handle.is_empty());
        assert!(!handle.has_errors());
    }

    #[test]
    fn test_kind_serialization() {
        let entry = ConsoleEntry {
            kind: ConsoleKind::Other("trace".to_string()),
            message: "x".to_string(),
            timestamp_ms: 1,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "trace");

        let json = serde_json::to_value(ConsoleKind::Warning).unwrap();
        assert_eq!(json, "warning");
    }
}
