//! Domain types and models

pub mod appointment;
pub mod doctor;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus, AppointmentView, BookingRequest};
pub use doctor::{
    ApprovalDecision, ApprovalEntry, DoctorDetails, DoctorRecord, DoctorStatus,
};
pub use user::{SessionRecord, UserRecord, UserRole};
