//! # Dashboard Module
//!
//! The member dashboard view state: the signed-in member, their borrow
//! info, and loading and error flags, kept current as the session changes.

pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use models::{UserData, LOAD_FAILED_MESSAGE};
pub use services::DashboardService;
