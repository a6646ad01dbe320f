//! Forgotten-password flow: email, then secret answer, then a new password.

use thiserror::Error;
use tracing::{info, warn};

use crate::common::{normalize_email, rules, safe_email_log, LibraryError};
use crate::members::{Member, MemberService};

pub const MIN_RESET_PASSWORD_LENGTH: usize = 6;
pub const NO_SECRET_QUESTION: &str = "No secret question set.";
pub const RESET_SUCCESS_MESSAGE: &str = "Password successfully reset. You may now log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    Email,
    Answer,
    Reset,
    Completed,
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Please enter a valid email.")]
    InvalidEmail,

    #[error("No account found with this email.")]
    NoAccount,

    #[error("Please enter the answer.")]
    MissingAnswer,

    #[error("Incorrect answer. Please try again.")]
    IncorrectAnswer,

    #[error("Please enter a valid new password.")]
    MissingPassword,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    #[error("Password recovery is at the {actual:?} step, not {expected:?}.")]
    OutOfOrder {
        expected: RecoveryStage,
        actual: RecoveryStage,
    },

    #[error("Failed to reset password. Please try again.")]
    Store(#[from] LibraryError),
}

/// One run of the recovery flow. Each step only succeeds at its own stage;
/// a failed step leaves the stage unchanged so it can be retried.
pub struct PasswordRecovery {
    members: MemberService,
    stage: RecoveryStage,
    member: Option<Member>,
}

impl PasswordRecovery {
    pub fn new(members: MemberService) -> Self {
        Self {
            members,
            stage: RecoveryStage::Email,
            member: None,
        }
    }

    pub fn stage(&self) -> RecoveryStage {
        self.stage
    }

    /// Question shown at the answer step
    pub fn secret_question(&self) -> Option<&str> {
        self.member.as_ref().map(|m| {
            if m.secret_question.is_empty() {
                NO_SECRET_QUESTION
            } else {
                m.secret_question.as_str()
            }
        })
    }

    fn expect_stage(&self, expected: RecoveryStage) -> Result<(), RecoveryError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(RecoveryError::OutOfOrder {
                expected,
                actual: self.stage,
            })
        }
    }

    /// Look up the account and return its secret question
    pub fn submit_email(&mut self, email: &str) -> Result<&str, RecoveryError> {
        self.expect_stage(RecoveryStage::Email)?;

        let email = normalize_email(email);
        if rules::required(&email).is_err() || rules::strict_email(&email).is_err() {
            return Err(RecoveryError::InvalidEmail);
        }

        let member = self.members.find_user_by_email(&email)?.ok_or_else(|| {
            warn!(email = %safe_email_log(&email), "Password recovery for unknown email");
            RecoveryError::NoAccount
        })?;

        self.member = Some(member);
        self.stage = RecoveryStage::Answer;
        Ok(self.secret_question().unwrap_or(NO_SECRET_QUESTION))
    }

    /// Answers compare trimmed and case-insensitively
    pub fn submit_answer(&mut self, answer: &str) -> Result<(), RecoveryError> {
        self.expect_stage(RecoveryStage::Answer)?;

        let answer = answer.trim().to_lowercase();
        if answer.is_empty() {
            return Err(RecoveryError::MissingAnswer);
        }

        let expected = self
            .member
            .as_ref()
            .map(|m| m.secret_answer.trim().to_lowercase())
            .unwrap_or_default();
        if answer != expected {
            return Err(RecoveryError::IncorrectAnswer);
        }

        self.stage = RecoveryStage::Reset;
        Ok(())
    }

    pub fn reset_password(&mut self, new_password: &str) -> Result<&'static str, RecoveryError> {
        self.expect_stage(RecoveryStage::Reset)?;

        if new_password.is_empty() {
            return Err(RecoveryError::MissingPassword);
        }
        if new_password.chars().count() < MIN_RESET_PASSWORD_LENGTH {
            return Err(RecoveryError::PasswordTooShort);
        }

        let email = self
            .member
            .as_ref()
            .map(|m| m.email.clone())
            .unwrap_or_default();
        self.members.update_user_password(&email, new_password)?;

        info!(email = %safe_email_log(&email), "Password recovered");
        self.stage = RecoveryStage::Completed;
        Ok(RESET_SUCCESS_MESSAGE)
    }

    /// Start over from the email step
    pub fn restart(&mut self) {
        self.stage = RecoveryStage::Email;
        self.member = None;
    }
}
