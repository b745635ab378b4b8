//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use medibook_core::accounts::ports::{CredentialStore, PhotoStore, SessionStore, UserRepository};
use medibook_core::appointments::ports::AppointmentRepository;
use medibook_core::doctors::ports::{ApprovalLogRepository, DoctorRepository};
use medibook_core::notifications::ports::{DecisionHook, Mailer};
use medibook_core::{
    AccountService, BookingService, DoctorService, NotificationService, ReminderService,
};
use medibook_domain::{Config, Result};
use medibook_infra::{
    DbManager, DecisionWebhook, FsPhotoStore, HttpMailer, LogMailer, ReminderScheduler,
    ReminderSchedulerConfig, SqliteAppointmentRepository, SqliteApprovalLogRepository,
    SqliteCredentialStore, SqliteDoctorRepository, SqliteSessionStore, SqliteUserRepository,
};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub credentials: Arc<dyn CredentialStore>,
    pub accounts: Arc<AccountService>,
    pub doctors: Arc<DoctorService>,
    pub booking: Arc<BookingService>,
    pub reminders: Arc<ReminderService>,
}

impl AppContext {
    /// Wire up the full dependency graph from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let users: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(Arc::clone(&db)));
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(SqliteCredentialStore::new(Arc::clone(&db)));
        let sessions: Arc<dyn SessionStore> =
            Arc::new(SqliteSessionStore::new(Arc::clone(&db)));
        let doctors_repo: Arc<dyn DoctorRepository> =
            Arc::new(SqliteDoctorRepository::new(Arc::clone(&db)));
        let approvals: Arc<dyn ApprovalLogRepository> =
            Arc::new(SqliteApprovalLogRepository::new(Arc::clone(&db)));
        let appointments: Arc<dyn AppointmentRepository> =
            Arc::new(SqliteAppointmentRepository::new(Arc::clone(&db)));
        let photos: Arc<dyn PhotoStore> =
            Arc::new(FsPhotoStore::new(config.storage.photo_dir.clone()));

        let mailer: Arc<dyn Mailer> = match &config.email.api_url {
            Some(url) => Arc::new(HttpMailer::new(url.clone(), config.email.api_key.clone())?),
            None => Arc::new(LogMailer),
        };
        let hook: Option<Arc<dyn DecisionHook>> = match &config.email.webhook_url {
            Some(url) => Some(Arc::new(DecisionWebhook::new(url.clone())?)),
            None => None,
        };
        let notifier = Arc::new(NotificationService::new(
            mailer,
            config.email.from_address(),
            hook,
        ));

        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::clone(&credentials),
            sessions,
            photos,
            Arc::clone(&doctors_repo),
        ));
        let doctors = Arc::new(DoctorService::new(
            Arc::clone(&doctors_repo),
            approvals,
            Arc::clone(&users),
            Arc::clone(&notifier),
        ));
        let booking = Arc::new(BookingService::new(
            Arc::clone(&appointments),
            Arc::clone(&doctors_repo),
            Arc::clone(&users),
            Arc::clone(&notifier),
        ));
        let reminders = Arc::new(ReminderService::new(
            appointments,
            users,
            doctors_repo,
            notifier,
            config.reminders.window_minutes,
        ));

        Ok(Self { config, db, credentials, accounts, doctors, booking, reminders })
    }

    /// Build the reminder scheduler for this context. The caller owns its
    /// lifecycle.
    pub fn reminder_scheduler(&self) -> ReminderScheduler {
        ReminderScheduler::new(
            Arc::clone(&self.reminders),
            ReminderSchedulerConfig {
                interval: Duration::from_secs(self.config.reminders.interval_seconds),
            },
        )
    }
}
