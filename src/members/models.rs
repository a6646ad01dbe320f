// src/members/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::dates::lenient_timestamp;

// ============================================================================
// Member Models
// ============================================================================

/// A registered library member, as stored under `registered_users`.
///
/// Passwords and secret answers are kept in plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    pub id: String,
    pub member_name: String,
    pub email: String,
    pub password: String,
    pub country_code: String,
    pub mobile_number: String,
    pub address: String,
    pub date_of_birth: String,
    pub secret_question: String,
    pub secret_answer: String,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Member data safe to show on a profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: String,
    pub member_name: String,
    pub email: String,
    pub country_code: String,
    pub mobile_number: String,
    pub address: String,
    pub date_of_birth: String,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Member> for MemberProfile {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            member_name: member.member_name.clone(),
            email: member.email.clone(),
            country_code: member.country_code.clone(),
            mobile_number: member.mobile_number.clone(),
            address: member.address.clone(),
            date_of_birth: member.date_of_birth.clone(),
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryCode {
    pub code: &'static str,
    pub name: &'static str,
    pub dial_code: &'static str,
}

pub const COUNTRY_CODES: [CountryCode; 5] = [
    CountryCode {
        code: "IN",
        name: "India",
        dial_code: "+91",
    },
    CountryCode {
        code: "US",
        name: "United States",
        dial_code: "+1",
    },
    CountryCode {
        code: "GB",
        name: "United Kingdom",
        dial_code: "+44",
    },
    CountryCode {
        code: "CA",
        name: "Canada",
        dial_code: "+1",
    },
    CountryCode {
        code: "AU",
        name: "Australia",
        dial_code: "+61",
    },
];

/// Dial code preselected on the registration form
pub const DEFAULT_DIAL_CODE: &str = "+91";

pub const SECRET_QUESTIONS: [&str; 6] = [
    "What is your birth place?",
    "What is your pet's name?",
    "What is your mother's maiden name?",
    "What was your first school name?",
    "What is your favorite book?",
    "What is your childhood nickname?",
];

// ============================================================================
// Request / Response Models
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    pub member_name: String,
    pub email: String,
    pub country_code: String,
    pub mobile_number: String,
    pub address: String,
    pub date_of_birth: String,
    pub password: String,
    pub confirm_password: String,
    pub secret_question: String,
    pub secret_answer: String,
}

impl RegistrationRequest {
    /// Empty form with the default dial code preselected
    pub fn blank() -> Self {
        Self {
            country_code: DEFAULT_DIAL_CODE.to_string(),
            ..Self::default()
        }
    }

    /// Trimmed copy as submitted: name, address and answer trimmed, email
    /// trimmed and lowercased. Passwords are left untouched.
    pub fn normalized(&self) -> Self {
        Self {
            member_name: self.member_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            address: self.address.trim().to_string(),
            secret_answer: self.secret_answer.trim().to_string(),
            ..self.clone()
        }
    }
}

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub member_id: String,
    pub member_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub member_name: String,
    pub email: String,
    pub country_code: String,
    pub mobile_number: String,
    pub address: String,
}

pub const PROFILE_UPDATED_MESSAGE: &str = "Your profile has been updated successfully.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResponse {
    pub success: bool,
    pub message: String,
    pub profile: MemberProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub const PASSWORD_CHANGED_MESSAGE: &str = "Password changed successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeResponse {
    pub success: bool,
    pub message: String,
}
