// src/dashboard/services.rs
//! Keeps the dashboard's `UserData` in step with the session.
//!
//! Signing in loads the member's borrow info, signing out clears it. The
//! loaded info is also published on the session's borrow-info cell.

use tracing::{debug, error, warn};

use super::models::{UserData, LOAD_FAILED_MESSAGE};
use crate::auth::{AuthService, AuthUser};
use crate::borrowing::{BorrowInfo, BorrowService};
use crate::common::{Subject, Subscription};

pub struct DashboardService {
    auth: AuthService,
    borrowing: BorrowService,
    user_data: Subject<UserData>,
    subscription: Subscription,
}

impl DashboardService {
    /// Subscribe to `auth`. A member already signed in is loaded right away.
    pub fn new(auth: AuthService, borrowing: BorrowService) -> Self {
        let user_data = Subject::new(UserData::default());

        let subscription = {
            let borrowing = borrowing.clone();
            let user_data = user_data.clone();
            let borrow_cell = auth.borrow_info_subject().clone();
            auth.current_user_subject().subscribe(move |user| match user {
                Some(user) => load_user_data(&borrowing, &user_data, &borrow_cell, user),
                None => user_data.next(UserData::default()),
            })
        };

        Self {
            auth,
            borrowing,
            user_data,
            subscription,
        }
    }

    pub fn user_data_subject(&self) -> &Subject<UserData> {
        &self.user_data
    }

    pub fn current_user_data(&self) -> UserData {
        self.user_data.value()
    }

    /// Reload borrow info for the signed-in member, if any
    pub fn refresh(&self) {
        match self.auth.current_user() {
            Some(user) => load_user_data(
                &self.borrowing,
                &self.user_data,
                self.auth.borrow_info_subject(),
                &user,
            ),
            None => debug!("Dashboard refresh skipped, no member signed in"),
        }
    }

    pub fn force_refresh(&self) {
        self.refresh();
    }

    /// Edit the loaded borrow info in place. Does nothing before a load.
    pub fn update_borrow_info<F>(&self, f: F)
    where
        F: FnOnce(&mut BorrowInfo),
    {
        let mut data = self.user_data.value();
        let Some(info) = data.borrow_info.as_mut() else {
            debug!("Borrow info update ignored, nothing loaded");
            return;
        };
        f(info);
        self.user_data.next(data);
    }
}

impl Drop for DashboardService {
    fn drop(&mut self) {
        self.auth
            .current_user_subject()
            .unsubscribe(self.subscription);
    }
}

fn load_user_data(
    borrowing: &BorrowService,
    user_data: &Subject<UserData>,
    borrow_cell: &Subject<Option<BorrowInfo>>,
    user: &AuthUser,
) {
    user_data.update(|data| {
        data.is_loading = true;
        data.error = None;
    });

    match borrowing.user_borrow_info(&user.member_id) {
        Ok(Some(info)) => {
            borrow_cell.next(Some(info.clone()));
            user_data.next(UserData {
                user: Some(user.clone()),
                borrow_info: Some(info),
                is_loading: false,
                error: None,
            });
        }
        Ok(None) => {
            warn!(member_id = %user.member_id, "Signed-in member has no registry entry");
            fail_load(user_data);
        }
        Err(e) => {
            error!(member_id = %user.member_id, error = %e, "Failed to load borrow info");
            fail_load(user_data);
        }
    }
}

fn fail_load(user_data: &Subject<UserData>) {
    user_data.update(|data| {
        data.is_loading = false;
        data.error = Some(LOAD_FAILED_MESSAGE.to_string());
    });
}
