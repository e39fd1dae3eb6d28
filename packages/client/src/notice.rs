//! User-facing notices: the short messages a frontend flashes after an action.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

/// Most notices kept before the oldest are dropped.
const MAX_NOTICES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// `HH:MM:SS`, the label shown next to the message.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Shared, append-only notice feed. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    entries: Arc<Mutex<Vec<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let mut entries = self.lock();
        entries.push(Notice {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
        if entries.len() > MAX_NOTICES {
            let excess = entries.len() - MAX_NOTICES;
            entries.drain(..excess);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn entries(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let notices = Notices::new();
        let other = notices.clone();
        notices.success("Review posted");
        other.error("Could not add favorite");

        let entries = notices.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, NoticeLevel::Success);
        assert_eq!(notices.latest().unwrap().message, "Could not add favorite");
        assert_eq!(entries[0].time_label().len(), 8);
    }

    #[test]
    fn test_feed_is_bounded() {
        let notices = Notices::new();
        for i in 0..(MAX_NOTICES + 5) {
            notices.info(format!("n{i}"));
        }
        let entries = notices.entries();
        assert_eq!(entries.len(), MAX_NOTICES);
        assert_eq!(entries[0].message, "n5");
    }
}
