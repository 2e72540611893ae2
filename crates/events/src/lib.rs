//! Domain events and the notification log fed by them.

pub mod event;
pub mod notification;

pub use event::Event;
pub use notification::{Notification, NotificationCategory, NotificationLog, NotificationSink};
