//! # MediBook API
//!
//! HTTP layer: the dependency-injection context and the axum routes.

pub mod context;
pub mod routes;

pub use context::AppContext;
