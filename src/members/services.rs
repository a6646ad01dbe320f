// src/members/services.rs
//! Member registry backed by the `registered_users` collection.
//!
//! Every operation loads the whole collection, works on it and writes it
//! back, the same way the browser copy is handled.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::*;
use super::validators::{
    email_taken, mobile_taken, PasswordChangeValidator, ProfileValidator, RegistrationValidator,
};
use crate::common::rules::DEFAULT_MIN_AGE;
use crate::common::{
    emails_match, generate_member_id, generate_random_member_id, normalize_email,
    safe_email_log, Clock, LibraryError, LibraryResult, ValidationResult, Validator,
};
use crate::storage::{load_collection, save_json, KeyValueStore, REGISTERED_USERS_KEY};

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    min_age: u32,
}

impl MemberService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            min_age: DEFAULT_MIN_AGE,
        }
    }

    pub fn with_min_age(mut self, min_age: u32) -> Self {
        self.min_age = min_age;
        self
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn registered_users(&self) -> LibraryResult<Vec<Member>> {
        load_collection(self.store.as_ref(), REGISTERED_USERS_KEY)
    }

    fn save_users(&self, users: &[Member]) -> LibraryResult<()> {
        save_json(self.store.as_ref(), REGISTERED_USERS_KEY, users)
    }

    /// Case-insensitive lookup, ignoring surrounding whitespace
    pub fn find_user_by_email(&self, email: &str) -> LibraryResult<Option<Member>> {
        let users = self.registered_users()?;
        Ok(users.into_iter().find(|u| emails_match(&u.email, email)))
    }

    pub fn find_user_by_id(&self, member_id: &str) -> LibraryResult<Option<Member>> {
        let users = self.registered_users()?;
        Ok(users.into_iter().find(|u| u.id == member_id))
    }

    /// Plain-text comparison; an unknown email is simply invalid
    pub fn validate_credentials(&self, email: &str, password: &str) -> LibraryResult<bool> {
        Ok(self
            .find_user_by_email(email)?
            .map(|user| user.password == password)
            .unwrap_or(false))
    }

    pub fn exists_by_email(&self, email: &str) -> LibraryResult<bool> {
        Ok(email_taken(&self.registered_users()?, email, None))
    }

    /// Any member with this number, whatever the country code
    pub fn exists_by_mobile(&self, mobile_number: &str) -> LibraryResult<bool> {
        let users = self.registered_users()?;
        Ok(users.iter().any(|u| u.mobile_number == mobile_number))
    }

    pub fn exists_by_country_mobile(
        &self,
        country_code: &str,
        mobile_number: &str,
    ) -> LibraryResult<bool> {
        Ok(mobile_taken(
            &self.registered_users()?,
            country_code,
            mobile_number,
            None,
        ))
    }

    pub fn country_codes() -> &'static [CountryCode] {
        &COUNTRY_CODES
    }

    pub fn secret_questions() -> &'static [&'static str] {
        &SECRET_QUESTIONS
    }

    pub fn profile(&self, member_id: &str) -> LibraryResult<Option<MemberProfile>> {
        Ok(self
            .find_user_by_id(member_id)?
            .as_ref()
            .map(MemberProfile::from))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Live form validation, including the taken-email and taken-mobile checks
    pub fn validate_registration(
        &self,
        request: &RegistrationRequest,
    ) -> LibraryResult<ValidationResult> {
        let users = self.registered_users()?;
        let validator = RegistrationValidator::new(self.clock.today())
            .with_min_age(self.min_age)
            .with_existing(&users);
        Ok(validator.validate(&request.normalized()))
    }

    pub fn register(&self, request: &RegistrationRequest) -> LibraryResult<RegistrationResponse> {
        let request = request.normalized();
        let now = self.clock.now();

        let form = RegistrationValidator::new(now.date_naive())
            .with_min_age(self.min_age)
            .validate(&request);
        if !form.is_valid {
            debug!(errors = form.errors.len(), "Registration form rejected");
            return Err(LibraryError::Validation(form));
        }

        let mut users = self.registered_users()?;

        if email_taken(&users, &request.email, None) {
            warn!(email = %safe_email_log(&request.email), "Registration with existing email");
            return Err(LibraryError::EmailTaken);
        }
        if mobile_taken(&users, &request.country_code, &request.mobile_number, None) {
            warn!(
                country_code = %request.country_code,
                "Registration with existing mobile number"
            );
            return Err(LibraryError::MobileTaken);
        }

        let mut member_id = generate_member_id(now);
        while users.iter().any(|u| u.id == member_id) {
            member_id = generate_random_member_id();
        }

        let member = Member {
            id: member_id.clone(),
            member_name: request.member_name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
            country_code: request.country_code.clone(),
            mobile_number: request.mobile_number.clone(),
            address: request.address.clone(),
            date_of_birth: request.date_of_birth.clone(),
            secret_question: request.secret_question.clone(),
            secret_answer: request.secret_answer.clone(),
            created_at: Some(now),
            updated_at: None,
        };
        users.push(member);
        self.save_users(&users)?;

        info!(
            member_id = %member_id,
            email = %safe_email_log(&request.email),
            "Member registered"
        );

        Ok(RegistrationResponse {
            success: true,
            message: REGISTRATION_SUCCESS_MESSAGE.to_string(),
            member_id,
            member_name: request.member_name,
            email: request.email,
        })
    }

    // ========================================================================
    // Profile and Password Updates
    // ========================================================================

    /// Apply a profile edit. Email and mobile stay unique across members.
    pub fn update_profile(
        &self,
        member_id: &str,
        update: &ProfileUpdate,
    ) -> LibraryResult<ProfileUpdateResponse> {
        let update = ProfileUpdate {
            member_name: update.member_name.trim().to_string(),
            email: normalize_email(&update.email),
            country_code: update.country_code.clone(),
            mobile_number: update.mobile_number.trim().to_string(),
            address: update.address.trim().to_string(),
        };

        let form = ProfileValidator.validate(&update);
        if !form.is_valid {
            return Err(LibraryError::Validation(form));
        }

        let mut users = self.registered_users()?;
        let index = users
            .iter()
            .position(|u| u.id == member_id)
            .ok_or(LibraryError::ProfileNotFound)?;

        if email_taken(&users, &update.email, Some(member_id)) {
            return Err(LibraryError::EmailTaken);
        }
        if mobile_taken(
            &users,
            &update.country_code,
            &update.mobile_number,
            Some(member_id),
        ) {
            return Err(LibraryError::MobileTaken);
        }

        let member = &mut users[index];
        member.member_name = update.member_name;
        member.email = update.email;
        member.country_code = update.country_code;
        member.mobile_number = update.mobile_number;
        member.address = update.address;
        member.updated_at = Some(self.clock.now());
        let profile = MemberProfile::from(&*member);

        self.save_users(&users)?;
        info!(member_id = %member_id, "Member profile updated");
        Ok(ProfileUpdateResponse {
            success: true,
            message: PROFILE_UPDATED_MESSAGE.to_string(),
            profile,
        })
    }

    /// Change a password from the profile page
    pub fn change_password(
        &self,
        member_id: &str,
        request: &PasswordChangeRequest,
    ) -> LibraryResult<PasswordChangeResponse> {
        let mut users = self.registered_users()?;
        let index = users
            .iter()
            .position(|u| u.id == member_id)
            .ok_or(LibraryError::MemberNotFound)?;

        if users[index].password != request.current_password {
            warn!(member_id = %member_id, "Password change with wrong current password");
            return Err(LibraryError::IncorrectCurrentPassword);
        }
        if request.new_password != request.confirm_password {
            return Err(LibraryError::PasswordConfirmationMismatch);
        }

        let form = PasswordChangeValidator.validate(request);
        if !form.is_valid {
            return Err(LibraryError::Validation(form));
        }

        users[index].password = request.new_password.clone();
        users[index].updated_at = Some(self.clock.now());
        self.save_users(&users)?;

        info!(member_id = %member_id, "Member password changed");
        Ok(PasswordChangeResponse {
            success: true,
            message: PASSWORD_CHANGED_MESSAGE.to_string(),
        })
    }

    /// Overwrite the password of the member holding `email`, used by the
    /// recovery flow once the secret answer checked out
    pub fn update_user_password(&self, email: &str, new_password: &str) -> LibraryResult<()> {
        let mut users = self.registered_users()?;
        let user = users
            .iter_mut()
            .find(|u| emails_match(&u.email, email))
            .ok_or(LibraryError::AccountNotFound)?;

        user.password = new_password.to_string();
        user.updated_at = Some(self.clock.now());
        self.save_users(&users)?;

        info!(email = %safe_email_log(email), "Member password reset");
        Ok(())
    }

    pub fn clear_all_users(&self) -> LibraryResult<()> {
        warn!("Clearing all registered members");
        self.store.remove_item(REGISTERED_USERS_KEY)
    }
}
