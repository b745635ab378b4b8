//! SQLite persistence layer

pub mod appointment_repository;
pub mod auth_repository;
pub mod doctor_repository;
pub mod manager;
pub mod user_repository;

pub use appointment_repository::SqliteAppointmentRepository;
pub use auth_repository::{SqliteCredentialStore, SqliteSessionStore};
pub use doctor_repository::{SqliteApprovalLogRepository, SqliteDoctorRepository};
pub use manager::{DbConnection, DbManager};
pub use user_repository::SqliteUserRepository;
