// Common validation types and traits

use serde::Serialize;
use std::fmt;

/// Form fields that carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    MemberName,
    Email,
    CountryCode,
    MobileNumber,
    Address,
    DateOfBirth,
    Password,
    ConfirmPassword,
    SecretQuestion,
    SecretAnswer,
    CurrentPassword,
    NewPassword,
}

impl Field {
    /// Name shown to the member in error messages
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Field::MemberName => "Name",
            Field::Email => "Email",
            Field::CountryCode => "Country Code",
            Field::MobileNumber => "Mobile Number",
            Field::Address => "Address",
            Field::DateOfBirth => "Date of Birth",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
            Field::SecretQuestion => "Security Question",
            Field::SecretAnswer => "Security Answer",
            Field::CurrentPassword => "Current Password",
            Field::NewPassword => "New Password",
        }
    }
}

/// Closed set of validation failures a rule can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorTag {
    Required,
    InvalidEmail,
    EmailTaken,
    InvalidName,
    Pattern,
    AgeTooLow { min_age: u32 },
    WeakPassword,
    PasswordsMismatch,
    MobileTaken,
    MinLength { required: usize },
    MaxLength { required: usize },
    InvalidMobilePattern,
}

impl ErrorTag {
    /// Lower ranks win when a field carries several tags.
    pub fn priority(&self) -> u8 {
        match self {
            ErrorTag::Required => 0,
            ErrorTag::InvalidEmail => 1,
            ErrorTag::EmailTaken => 2,
            ErrorTag::InvalidName => 3,
            ErrorTag::Pattern => 4,
            ErrorTag::AgeTooLow { .. } => 5,
            ErrorTag::WeakPassword => 6,
            ErrorTag::PasswordsMismatch => 7,
            ErrorTag::MobileTaken => 8,
            ErrorTag::MinLength { .. } => 9,
            ErrorTag::MaxLength { .. } => 10,
            ErrorTag::InvalidMobilePattern => 11,
        }
    }

    /// User-facing message for this tag on `field`
    pub fn message(&self, field: Field) -> String {
        let name = field.friendly_name();
        match self {
            ErrorTag::Required => format!("{} is required.", name),
            ErrorTag::InvalidEmail => "Please enter a valid email address.".to_string(),
            ErrorTag::EmailTaken => "Email is already registered.".to_string(),
            ErrorTag::InvalidName => {
                "Name must contain at least 3 letters and only alphabets/spaces.".to_string()
            }
            ErrorTag::Pattern => format!("Invalid format for {}.", name),
            ErrorTag::AgeTooLow { min_age } => {
                format!("You must be at least {} years old.", min_age)
            }
            ErrorTag::WeakPassword => {
                "Password is weak. Must have uppercase, lowercase, number, and special character."
                    .to_string()
            }
            ErrorTag::PasswordsMismatch => "Passwords do not match.".to_string(),
            ErrorTag::MobileTaken => "Mobile number is already registered.".to_string(),
            ErrorTag::MinLength { .. } => format!("{} is too short.", name),
            ErrorTag::MaxLength { .. } => format!("{} is too long.", name),
            ErrorTag::InvalidMobilePattern => format!("Invalid {}.", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: Field,
    pub tag: ErrorTag,
}

impl ValidationError {
    pub fn message(&self) -> String {
        self.tag.message(self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: Field, tag: ErrorTag) {
        self.is_valid = false;
        self.errors.push(ValidationError { field, tag });
    }

    /// Records the outcome of a single rule against `field`
    pub fn check(&mut self, field: Field, outcome: Result<(), ErrorTag>) {
        if let Err(tag) = outcome {
            self.add_error(field, tag);
        }
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    pub fn has_error(&self, field: Field, tag: ErrorTag) -> bool {
        self.errors.iter().any(|e| e.field == field && e.tag == tag)
    }

    pub fn tags_for(&self, field: Field) -> Vec<ErrorTag> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.tag)
            .collect()
    }

    /// The message a form shows under `field`, if it has any error.
    /// When several tags apply the highest-priority one wins.
    pub fn message_for(&self, field: Field) -> Option<String> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .min_by_key(|e| e.tag.priority())
            .map(ValidationError::message)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ValidationError::message).collect();
        write!(f, "{}", messages.join(" "))
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}
