//! Accounts: registration, sessions, profile and photo management

pub mod ports;
pub mod service;

pub use service::{AccountService, RegisterRequest, RegisterRole};
