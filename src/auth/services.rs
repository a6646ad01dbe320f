//! Session handling for library members
//!
//! The signed-in member and their borrow info live in two observable cells.
//! The member is mirrored to the `currentUser` key so a new `AuthService`
//! over the same store picks the session back up.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{AuthUser, LoginRequest, SessionUpdate};
use crate::borrowing::BorrowInfo;
use crate::common::{
    generate_session_token, safe_email_log, Clock, LibraryError, LibraryResult, Subject,
};
use crate::members::MemberService;
use crate::storage::{load_json, save_json, KeyValueStore, CURRENT_USER_KEY};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    members: MemberService,
    clock: Arc<dyn Clock>,
    current_user: Subject<Option<AuthUser>>,
    borrow_info: Subject<Option<BorrowInfo>>,
}

impl AuthService {
    /// Create the service, restoring any session saved in `store`
    pub fn new(store: Arc<dyn KeyValueStore>, members: MemberService, clock: Arc<dyn Clock>) -> Self {
        let restored = match load_json::<AuthUser>(store.as_ref(), CURRENT_USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored session");
                None
            }
        };
        if let Some(user) = &restored {
            info!(member_id = %user.member_id, "Restored stored session");
        }

        Self {
            store,
            members,
            clock,
            current_user: Subject::new(restored),
            borrow_info: Subject::new(None),
        }
    }

    // ========================================================================
    // Login / Logout
    // ========================================================================

    pub fn login(&self, request: &LoginRequest) -> LibraryResult<AuthUser> {
        let member = match self.members.find_user_by_email(&request.email)? {
            Some(member) => member,
            None => {
                warn!(email = %safe_email_log(&request.email), "Login for unknown email");
                return Err(LibraryError::UnknownEmail);
            }
        };

        if member.password != request.password {
            warn!(member_id = %member.id, "Login with invalid password");
            return Err(LibraryError::InvalidPassword);
        }

        let now = self.clock.now();
        let user = AuthUser {
            member_id: member.id,
            member_name: member.member_name,
            email: member.email,
            token: generate_session_token(now),
            login_time: now,
        };
        self.set_current_user(user.clone())?;

        info!(
            member_id = %user.member_id,
            email = %safe_email_log(&user.email),
            "Member logged in"
        );
        Ok(user)
    }

    pub fn logout(&self) -> LibraryResult<()> {
        let member_id = self.current_user().map(|u| u.member_id);
        self.store.remove_item(CURRENT_USER_KEY)?;
        self.current_user.next(None);
        self.borrow_info.next(None);
        info!(member_id = ?member_id, "Member logged out");
        Ok(())
    }

    /// Persist `user` as the session and publish it
    pub fn set_current_user(&self, user: AuthUser) -> LibraryResult<()> {
        save_json(self.store.as_ref(), CURRENT_USER_KEY, &user)?;
        self.current_user.next(Some(user));
        Ok(())
    }

    // ========================================================================
    // Session State
    // ========================================================================

    pub fn current_user(&self) -> Option<AuthUser> {
        self.current_user.value()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// Merge a profile edit into the session. Does nothing when signed out.
    pub fn update_user_profile(&self, update: &SessionUpdate) -> LibraryResult<()> {
        let Some(mut user) = self.current_user() else {
            debug!("Session update ignored, no member signed in");
            return Ok(());
        };
        if let Some(name) = &update.member_name {
            user.member_name = name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        self.set_current_user(user)
    }

    /// Republish the current member so subscribers reload their data
    pub fn refresh_user_data(&self) {
        if let Some(user) = self.current_user() {
            debug!(member_id = %user.member_id, "Refreshing session subscribers");
            self.current_user.next(Some(user));
        }
    }

    pub fn set_user_borrow_info(&self, info: Option<BorrowInfo>) {
        self.borrow_info.next(info);
    }

    pub fn user_borrow_info(&self) -> Option<BorrowInfo> {
        self.borrow_info.value()
    }

    /// Cell holding the signed-in member
    pub fn current_user_subject(&self) -> &Subject<Option<AuthUser>> {
        &self.current_user
    }

    /// Cell holding the signed-in member's borrow info
    pub fn borrow_info_subject(&self) -> &Subject<Option<BorrowInfo>> {
        &self.borrow_info
    }

    pub fn members(&self) -> &MemberService {
        &self.members
    }
}
