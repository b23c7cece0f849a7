//! Single-slot status message sink.
//!
//! The UI thread and the file operation workers both post here; only the most recent message is
//! kept. The UI reads it every frame and expires it after a timeout.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    kind: StatusKind,
    posted: Instant,
}

impl StatusMessage {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    #[inline]
    pub fn posted(&self) -> Instant {
        self.posted
    }
}

/// Cloneable handle to the shared status slot.
#[derive(Debug, Clone, Default)]
pub struct StatusSink {
    slot: Arc<Mutex<Option<StatusMessage>>>,
}

impl StatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<StatusMessage>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn post(&self, kind: StatusKind, text: impl Into<String>) {
        *self.lock() = Some(StatusMessage {
            text: text.into(),
            kind,
            posted: Instant::now(),
        });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.post(StatusKind::Info, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.post(StatusKind::Error, text);
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Clears the message if it is older than `ttl`. Returns true if something was cleared.
    pub fn clear_expired(&self, ttl: Duration) -> bool {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|m| m.posted.elapsed() >= ttl) {
            *slot = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_latest_message() {
        let sink = StatusSink::new();
        sink.info("Yank!");
        sink.error("Copy failed");

        let msg = sink.current().expect("message posted");
        assert_eq!(msg.text(), "Copy failed");
        assert_eq!(msg.kind(), StatusKind::Error);
    }

    #[test]
    fn clones_share_the_slot() {
        let sink = StatusSink::new();
        let worker_side = sink.clone();
        worker_side.info("Deleted");
        assert_eq!(sink.current().map(|m| m.text().to_string()), Some("Deleted".into()));
    }

    #[test]
    fn clear_expired_respects_ttl() {
        let sink = StatusSink::new();
        sink.info("Paste!");
        assert!(!sink.clear_expired(Duration::from_secs(60)));
        assert!(sink.current().is_some());
        assert!(sink.clear_expired(Duration::ZERO));
        assert!(sink.current().is_none());
    }
}
