// src/members/validators.rs

use chrono::NaiveDate;

use super::models::*;
use crate::common::helpers::emails_match;
use crate::common::rules::{self, DEFAULT_MIN_AGE};
use crate::common::{ErrorTag, Field, ValidationResult, Validator};

// ============================================================================
// Registration Validator
// ============================================================================

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_ADDRESS_LENGTH: usize = 200;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_SECRET_ANSWER_LENGTH: usize = 3;
pub const MAX_SECRET_ANSWER_LENGTH: usize = 100;

/// Validates the registration form.
///
/// With `existing_members` set it also reports `EmailTaken` and
/// `MobileTaken`, which is what the form shows while the member types.
pub struct RegistrationValidator<'a> {
    pub today: NaiveDate,
    pub min_age: u32,
    pub existing_members: &'a [Member],
}

impl<'a> RegistrationValidator<'a> {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            min_age: DEFAULT_MIN_AGE,
            existing_members: &[],
        }
    }

    pub fn with_min_age(mut self, min_age: u32) -> Self {
        self.min_age = min_age;
        self
    }

    pub fn with_existing(mut self, members: &'a [Member]) -> Self {
        self.existing_members = members;
        self
    }
}

impl Validator<RegistrationRequest> for RegistrationValidator<'_> {
    fn validate(&self, data: &RegistrationRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate member name
        result.check(Field::MemberName, rules::required(&data.member_name));
        result.check(
            Field::MemberName,
            rules::max_length(&data.member_name, MAX_NAME_LENGTH),
        );
        result.check(Field::MemberName, rules::name(&data.member_name));

        // Validate email
        result.check(Field::Email, rules::required(&data.email));
        result.check(Field::Email, rules::strict_email(&data.email));
        if !data.email.is_empty() && email_taken(self.existing_members, &data.email, None) {
            result.add_error(Field::Email, ErrorTag::EmailTaken);
        }

        result.check(Field::CountryCode, rules::required(&data.country_code));

        // Validate mobile number
        result.check(Field::MobileNumber, rules::required(&data.mobile_number));
        result.check(Field::MobileNumber, rules::mobile(&data.mobile_number));
        if !data.mobile_number.is_empty()
            && mobile_taken(
                self.existing_members,
                &data.country_code,
                &data.mobile_number,
                None,
            )
        {
            result.add_error(Field::MobileNumber, ErrorTag::MobileTaken);
        }

        // Validate address
        result.check(Field::Address, rules::required(&data.address));
        result.check(
            Field::Address,
            rules::max_length(&data.address, MAX_ADDRESS_LENGTH),
        );

        // Validate date of birth
        result.check(Field::DateOfBirth, rules::required(&data.date_of_birth));
        result.check(
            Field::DateOfBirth,
            rules::age(&data.date_of_birth, self.min_age, self.today),
        );

        // Validate password and confirmation
        result.check(Field::Password, rules::required(&data.password));
        result.check(
            Field::Password,
            rules::min_length(&data.password, MIN_PASSWORD_LENGTH),
        );
        result.check(Field::Password, rules::password_strength(&data.password));
        result.check(Field::ConfirmPassword, rules::required(&data.confirm_password));
        result.check(
            Field::ConfirmPassword,
            rules::passwords_match(&data.password, &data.confirm_password),
        );

        // Validate secret question and answer
        result.check(Field::SecretQuestion, rules::required(&data.secret_question));
        result.check(Field::SecretAnswer, rules::required(&data.secret_answer));
        result.check(
            Field::SecretAnswer,
            rules::min_length(&data.secret_answer, MIN_SECRET_ANSWER_LENGTH),
        );
        result.check(
            Field::SecretAnswer,
            rules::max_length(&data.secret_answer, MAX_SECRET_ANSWER_LENGTH),
        );

        result
    }
}

// ============================================================================
// Profile Validators
// ============================================================================

pub const MIN_PROFILE_NAME_LENGTH: usize = 2;
pub const MAX_PROFILE_ADDRESS_LENGTH: usize = 100;

pub struct ProfileValidator;

impl Validator<ProfileUpdate> for ProfileValidator {
    fn validate(&self, data: &ProfileUpdate) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check(Field::MemberName, rules::required(&data.member_name));
        result.check(
            Field::MemberName,
            rules::min_length(&data.member_name, MIN_PROFILE_NAME_LENGTH),
        );
        result.check(
            Field::MemberName,
            rules::max_length(&data.member_name, MAX_NAME_LENGTH),
        );
        result.check(Field::MemberName, rules::profile_name(&data.member_name));

        result.check(Field::Email, rules::required(&data.email));
        result.check(Field::Email, rules::strict_email(&data.email));

        result.check(Field::CountryCode, rules::required(&data.country_code));

        result.check(Field::MobileNumber, rules::required(&data.mobile_number));
        result.check(
            Field::MobileNumber,
            rules::ten_digit_mobile(&data.mobile_number),
        );

        // Address is optional on the profile page
        result.check(
            Field::Address,
            rules::max_length(&data.address, MAX_PROFILE_ADDRESS_LENGTH),
        );

        result
    }
}

pub const MIN_CHANGED_PASSWORD_LENGTH: usize = 6;

pub struct PasswordChangeValidator;

impl Validator<PasswordChangeRequest> for PasswordChangeValidator {
    fn validate(&self, data: &PasswordChangeRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check(Field::CurrentPassword, rules::required(&data.current_password));
        result.check(
            Field::CurrentPassword,
            rules::min_length(&data.current_password, MIN_CHANGED_PASSWORD_LENGTH),
        );

        result.check(Field::NewPassword, rules::required(&data.new_password));
        result.check(
            Field::NewPassword,
            rules::min_length(&data.new_password, MIN_CHANGED_PASSWORD_LENGTH),
        );
        result.check(Field::NewPassword, rules::profile_password(&data.new_password));

        result.check(Field::ConfirmPassword, rules::required(&data.confirm_password));
        result.check(
            Field::ConfirmPassword,
            rules::passwords_match(&data.new_password, &data.confirm_password),
        );

        result
    }
}

// ============================================================================
// Uniqueness Helpers
// ============================================================================

/// True when another member (other than `except_id`) holds `email`,
/// compared case-insensitively
pub fn email_taken(members: &[Member], email: &str, except_id: Option<&str>) -> bool {
    members
        .iter()
        .filter(|m| Some(m.id.as_str()) != except_id)
        .any(|m| emails_match(&m.email, email))
}

/// True when another member holds the same mobile number under the same
/// country code
pub fn mobile_taken(
    members: &[Member],
    country_code: &str,
    mobile_number: &str,
    except_id: Option<&str>,
) -> bool {
    members
        .iter()
        .filter(|m| Some(m.id.as_str()) != except_id)
        .any(|m| m.country_code == country_code && m.mobile_number == mobile_number)
}
