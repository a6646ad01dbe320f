//! # Auth Module
//!
//! This module handles member sessions and account recovery:
//! - Email and password login against the member registry
//! - The observable signed-in member and borrow info cells
//! - Session persistence under `currentUser`
//! - The secret-question password recovery flow

pub mod models;
pub mod recovery;
pub mod services;


pub use models::{AuthUser, LoginRequest, SessionUpdate};
pub use recovery::{PasswordRecovery, RecoveryError, RecoveryStage};
pub use services::AuthService;
