//! # MediBook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Application services (accounts, admissions, booking, notifications)
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `medibook-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod accounts;
pub mod appointments;
pub mod doctors;
pub mod notifications;

// Re-export specific items to avoid ambiguity
pub use accounts::ports::{CredentialStore, PhotoStore, SessionStore, UserRepository};
pub use accounts::{AccountService, RegisterRequest, RegisterRole};
pub use appointments::ports::AppointmentRepository;
pub use appointments::BookingService;
pub use doctors::ports::{ApprovalLogRepository, DoctorRepository};
pub use doctors::DoctorService;
pub use notifications::ports::{DecisionHook, EmailMessage, Mailer};
pub use notifications::{NotificationService, ReminderService};
