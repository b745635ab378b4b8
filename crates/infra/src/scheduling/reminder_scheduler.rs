//! Reminder scheduler
//!
//! Runs the reminder pass on a fixed interval (every 5 minutes by
//! default). Each pass scans approved appointments inside the look-ahead
//! window; per-record failures are handled inside the pass itself, so one
//! bad record never stops the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use medibook_core::ReminderService;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use super::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the reminder scheduler
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// Interval between reminder passes
    pub interval: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(300) }
    }
}

/// Periodic reminder scheduler
pub struct ReminderScheduler {
    service: Arc<ReminderService>,
    config: ReminderSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl ReminderScheduler {
    /// Create a new reminder scheduler
    pub fn new(service: Arc<ReminderService>, config: ReminderSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs the reminder pass periodically.
    ///
    /// # Errors
    ///
    /// Returns error if the scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval = ?self.config.interval, "Starting reminder scheduler");

        // New token so the scheduler can restart after a stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::reminder_loop(service, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// # Errors
    ///
    /// Returns error if the scheduler is not running
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping reminder scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::StopTimeout(join_timeout))??;
        }

        info!("Reminder scheduler stopped");
        Ok(())
    }

    /// Check if the scheduler is running
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Background reminder loop
    async fn reminder_loop(
        service: Arc<ReminderService>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Reminder loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    match service.run_once(Utc::now().timestamp()).await {
                        Ok(0) => debug!("Reminder pass found nothing to send"),
                        Ok(count) => info!(count, "Reminder pass completed"),
                        Err(e) => error!(error = %e, "Reminder pass failed"),
                    }
                }
            }
        }
    }
}

/// Ensure the scheduler is stopped when dropped
impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        // Best-effort cleanup; the task handle cannot be awaited here
        if !self.cancellation_token.is_cancelled() {
            self.cancellation_token.cancel();
        }
    }
}
