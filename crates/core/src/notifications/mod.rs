//! Notifications: transactional emails and the periodic reminder pass

pub mod ports;
pub mod service;
pub mod templates;

pub use service::{NotificationService, ReminderService};
