//! Tests for dashboard module
//!
//! These tests verify the dashboard state transitions:
//! - Loading borrow info on sign-in
//! - Error state for members missing from the registry
//! - Reset on sign-out and manual refresh

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::{AuthService, AuthUser, LoginRequest};
    use crate::borrowing::{BorrowRecord, BorrowService, BorrowedBook};
    use crate::common::FixedClock;
    use crate::members::{MemberService, RegistrationRequest};
    use crate::storage::{save_json, KeyValueStore, MemoryStore, BORROW_RECORDS_KEY};
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    struct Fixture {
        store: Arc<MemoryStore>,
        auth: AuthService,
        borrowing: BorrowService,
        member_id: String,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0).unwrap()
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock(now()));
        let members = MemberService::new(store.clone(), clock.clone());
        let member_id = members
            .register(&RegistrationRequest {
                member_name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                country_code: "+91".to_string(),
                mobile_number: "9876543210".to_string(),
                address: "12 Park Street".to_string(),
                date_of_birth: "1995-04-12".to_string(),
                password: "Secret@123".to_string(),
                confirm_password: "Secret@123".to_string(),
                secret_question: "What is your pet's name?".to_string(),
                secret_answer: "Bruno".to_string(),
            })
            .unwrap()
            .member_id;

        let borrowing = BorrowService::new(store.clone(), members.clone(), clock.clone());
        let auth = AuthService::new(store.clone(), members, clock);
        Fixture {
            store,
            auth,
            borrowing,
            member_id,
        }
    }

    fn sign_in(auth: &AuthService) {
        auth.login(&LoginRequest {
            email: "asha@example.com".to_string(),
            password: "Secret@123".to_string(),
        })
        .unwrap();
    }

    #[test]
    fn test_starts_empty_when_signed_out() {
        let f = fixture();
        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());

        assert_eq!(dashboard.current_user_data(), UserData::default());
    }

    #[test]
    fn test_sign_in_loads_borrow_info() {
        let f = fixture();
        let overdue = BorrowRecord {
            id: "BR1".to_string(),
            member_id: f.member_id.clone(),
            books: Some(vec![BorrowedBook {
                book_id: Some("BK001".to_string()),
                due_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        save_json(f.store.as_ref(), BORROW_RECORDS_KEY, &[overdue]).unwrap();

        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());
        let states: Arc<Mutex<Vec<(bool, bool)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = states.clone();
        dashboard.user_data_subject().subscribe(move |data| {
            sink.lock()
                .unwrap()
                .push((data.is_loading, data.borrow_info.is_some()));
        });

        sign_in(&f.auth);

        let data = dashboard.current_user_data();
        let info = data.borrow_info.unwrap();
        assert_eq!(data.user.unwrap().member_id, f.member_id);
        assert!(!data.is_loading);
        assert_eq!(data.error, None);
        assert_eq!(info.fines, 15);
        assert_eq!(info.overdue_books, 1);
        assert_eq!(f.auth.user_borrow_info(), Some(info));

        assert_eq!(
            *states.lock().unwrap(),
            vec![(false, false), (true, false), (false, true)]
        );
    }

    #[test]
    fn test_existing_session_loaded_on_creation() {
        let f = fixture();
        sign_in(&f.auth);

        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());

        let data = dashboard.current_user_data();
        assert!(data.borrow_info.is_some());
        assert!(data.borrow_info.unwrap().is_eligible);
    }

    #[test]
    fn test_unknown_member_sets_error() {
        let f = fixture();
        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());

        f.auth
            .set_current_user(AuthUser {
                member_id: "LIB999999".to_string(),
                member_name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                token: "demo-token-0".to_string(),
                login_time: now(),
            })
            .unwrap();

        let data = dashboard.current_user_data();
        assert!(!data.is_loading);
        assert_eq!(data.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(data.borrow_info, None);
    }

    #[test]
    fn test_sign_out_resets_state() {
        let f = fixture();
        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());
        sign_in(&f.auth);

        f.auth.logout().unwrap();

        assert_eq!(dashboard.current_user_data(), UserData::default());
        assert_eq!(f.auth.user_borrow_info(), None);
    }

    #[test]
    fn test_refresh_picks_up_new_records() {
        let f = fixture();
        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());
        sign_in(&f.auth);
        assert_eq!(
            dashboard
                .current_user_data()
                .borrow_info
                .unwrap()
                .current_borrowed_count,
            0
        );

        let record = BorrowRecord {
            id: "BR2".to_string(),
            member_id: f.member_id.clone(),
            total_books: Some(2),
            ..Default::default()
        };
        f.store
            .set_item(
                BORROW_RECORDS_KEY,
                &serde_json::to_string(&[record]).unwrap(),
            )
            .unwrap();

        dashboard.refresh();
        assert_eq!(
            dashboard
                .current_user_data()
                .borrow_info
                .unwrap()
                .current_borrowed_count,
            2
        );
    }

    #[test]
    fn test_update_borrow_info_only_after_load() {
        let f = fixture();
        let dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());

        dashboard.update_borrow_info(|info| info.fines = 99);
        assert_eq!(dashboard.current_user_data().borrow_info, None);

        sign_in(&f.auth);
        dashboard.update_borrow_info(|info| info.current_borrowed_count += 1);
        dashboard.force_refresh();
        assert_eq!(
            dashboard
                .current_user_data()
                .borrow_info
                .unwrap()
                .current_borrowed_count,
            0,
            "a refresh recomputes from the stored records"
        );
    }

    #[test]
    fn test_drop_unsubscribes() {
        let f = fixture();
        let before = f.auth.current_user_subject().subscriber_count();
        {
            let _dashboard = DashboardService::new(f.auth.clone(), f.borrowing.clone());
            assert_eq!(f.auth.current_user_subject().subscriber_count(), before + 1);
        }
        assert_eq!(f.auth.current_user_subject().subscriber_count(), before);
    }
}
