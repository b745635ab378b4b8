//! Domain constants

/// Default interval between reminder passes, in seconds.
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 300;

/// Reminder look-ahead window, in minutes.
pub const DEFAULT_REMINDER_WINDOW_MINUTES: i64 = 15;

/// Session lifetime, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// Number of approval log entries shown in the admin detail view.
pub const APPROVAL_HISTORY_LIMIT: usize = 10;
