// Error types shared by the membership services

use thiserror::Error;

use super::validation::ValidationResult;

/// Service-level failures.
///
/// The `Display` text of the user-facing variants is the exact message the
/// forms show, so callers can render `err.to_string()` directly.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Email already registered.")]
    EmailTaken,

    #[error("Mobile number already registered.")]
    MobileTaken,

    #[error("User not found.")]
    MemberNotFound,

    /// Password reset for an email with no account
    #[error("User not found")]
    AccountNotFound,

    #[error("Failed to update profile. User not found.")]
    ProfileNotFound,

    #[error("No account found with this email address. Please register first.")]
    UnknownEmail,

    #[error("Invalid password. Please check your credentials and try again.")]
    InvalidPassword,

    #[error("Current password is incorrect.")]
    IncorrectCurrentPassword,

    #[error("New password and confirm password do not match.")]
    PasswordConfirmationMismatch,

    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
