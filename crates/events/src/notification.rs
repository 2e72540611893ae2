//! Patron-facing notifications and the append-only log that keeps them.
//!
//! The core only records notifications; delivering or rendering them is the
//! caller's business. The log is never truncated, but readers only look at the
//! most recent entries.

use serde::{Deserialize, Serialize};

use libris_core::CalendarDate;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    NewAcquisition,
    Borrow,
    Available,
    Overdue,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::NewAcquisition => "new_acquisition",
            NotificationCategory::Borrow => "borrow",
            NotificationCategory::Available => "available",
            NotificationCategory::Overdue => "overdue",
        }
    }
}

impl core::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification (no identity; value semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub date: CalendarDate,
    pub category: NotificationCategory,
}

impl Notification {
    pub fn new(category: NotificationCategory, message: impl Into<String>, date: CalendarDate) -> Self {
        Self {
            message: message.into(),
            date,
            category,
        }
    }
}

impl core::fmt::Display for Notification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}: {}", self.date, self.category, self.message)
    }
}

/// Destination for notifications emitted by lending operations.
pub trait NotificationSink {
    fn publish(&mut self, notification: Notification);
}

/// In-memory append-only notification log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last `limit` notifications, oldest first.
    pub fn recent(&self, limit: usize) -> &[Notification] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// Every notification ever recorded, oldest first.
    pub fn all(&self) -> &[Notification] {
        &self.entries
    }
}

impl NotificationSink for NotificationLog {
    fn publish(&mut self, notification: Notification) {
        tracing::debug!(
            category = notification.category.as_str(),
            message = %notification.message,
            "notification recorded"
        );
        self.entries.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> CalendarDate {
        CalendarDate::new(d, 1, 2024)
    }

    fn log_with(count: u32) -> NotificationLog {
        let mut log = NotificationLog::new();
        for i in 1..=count {
            log.publish(Notification::new(
                NotificationCategory::Borrow,
                format!("message {i}"),
                day(i),
            ));
        }
        log
    }

    #[test]
    fn recent_returns_tail_in_chronological_order() {
        let log = log_with(5);
        let recent = log.recent(3);
        let messages: Vec<&str> = recent.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["message 3", "message 4", "message 5"]);
    }

    #[test]
    fn recent_with_large_limit_returns_everything() {
        let log = log_with(2);
        assert_eq!(log.recent(10).len(), 2);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn log_is_append_only() {
        let log = log_with(12);
        assert_eq!(log.all().len(), 12);
        assert_eq!(log.recent(10).len(), 10);
        assert_eq!(log.all()[0].message, "message 1");
    }

    #[test]
    fn display_includes_date_and_category() {
        let n = Notification::new(NotificationCategory::Overdue, "Overdue item for Ada", day(3));
        assert_eq!(n.to_string(), "[3/1/2024] overdue: Overdue item for Ada");
    }

    #[test]
    fn category_serializes_as_snake_case_tag() {
        let json = serde_json::to_string(&NotificationCategory::NewAcquisition).unwrap();
        assert_eq!(json, "\"new_acquisition\"");
    }
}
