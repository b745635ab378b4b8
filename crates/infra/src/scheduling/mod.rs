//! Scheduling infrastructure for background jobs
//!
//! One scheduler runs here: the periodic reminder pass. It follows the
//! house runtime rules: explicit start/stop lifecycle, a join handle for
//! the spawned task, cancellation token support, structured tracing.

pub mod error;
pub mod reminder_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reminder_scheduler::{ReminderScheduler, ReminderSchedulerConfig};
