//! Tests for borrowing module
//!
//! These tests verify the borrowing accounting including:
//! - Fine and overdue calculation
//! - Eligibility rules
//! - History ordering and default substitution
//! - Lenient reading of stored records

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::borrowing::accounting::{book_fine, book_status, days_late, defaults};
    use crate::common::{FixedClock, StoredDate};
    use crate::members::{Member, MemberService};
    use crate::storage::{save_json, KeyValueStore, MemoryStore, BORROW_RECORDS_KEY, REGISTERED_USERS_KEY};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn book(id: &str, borrowed: DateTime<Utc>, due: DateTime<Utc>) -> BorrowedBook {
        BorrowedBook {
            book_id: Some(id.to_string()),
            borrow_date: Some(borrowed),
            due_date: Some(due),
            notes: None,
        }
    }

    fn open_record(id: &str, member_id: &str, books: Vec<BorrowedBook>) -> BorrowRecord {
        BorrowRecord {
            id: id.to_string(),
            member_id: member_id.to_string(),
            books: Some(books),
            ..Default::default()
        }
    }

    fn member(id: &str) -> Member {
        Member {
            id: id.to_string(),
            member_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            ..Default::default()
        }
    }

    // ========================================================================
    // Fines
    // ========================================================================

    #[test]
    fn test_three_days_late_costs_fifteen() {
        let policy = BorrowPolicy::default();
        let records = vec![open_record(
            "BR1",
            "LIB000001",
            vec![book("BK001", at(2023, 12, 18), at(2024, 1, 1))],
        )];

        let standing = compute_borrow_standing("LIB000001", &records, at(2024, 1, 4), &policy);

        assert_eq!(standing.overdue_books, 1);
        assert_eq!(standing.fines, 15);
        assert!(!standing.is_eligible);
    }

    #[test]
    fn test_partial_day_counts_as_full_day() {
        let due = at(2024, 1, 1);
        assert_eq!(days_late(due, due), 0);
        assert_eq!(days_late(due, due + Duration::milliseconds(1)), 1);
        assert_eq!(days_late(due, due + Duration::hours(25)), 2);
        assert_eq!(days_late(due, due - Duration::days(3)), 0);
    }

    #[test]
    fn test_fine_capped_at_return_date() {
        let policy = BorrowPolicy::default();
        let due = at(2024, 1, 1);
        let now = at(2024, 2, 1);

        let returned = StoredDate::Valid;
        assert_eq!(book_fine(due, &returned(at(2023, 12, 30)), now, &policy), 0);
        assert_eq!(book_fine(due, &returned(due), now, &policy), 0);
        assert_eq!(book_fine(due, &returned(at(2024, 1, 3)), now, &policy), 10);
        assert_eq!(book_fine(due, &StoredDate::Absent, now, &policy), 31 * 5);
        assert_eq!(
            book_fine(due, &StoredDate::Unreadable("returned".to_string()), now, &policy),
            0
        );
    }

    #[test]
    fn test_fine_uses_policy_rate() {
        let policy = BorrowPolicy {
            max_books_allowed: 5,
            fine_per_day: 2,
        };
        assert_eq!(book_fine(at(2024, 1, 1), &StoredDate::Absent, at(2024, 1, 4), &policy), 6);
    }

    #[test]
    fn test_book_status_classification() {
        let due = at(2024, 1, 10);
        let later = at(2024, 2, 1);
        assert_eq!(
            book_status(due, &StoredDate::Valid(at(2024, 1, 20)), later),
            BookStatus::Returned
        );
        assert_eq!(
            book_status(due, &StoredDate::Unreadable("yes".to_string()), later),
            BookStatus::Returned
        );
        assert_eq!(book_status(due, &StoredDate::Absent, at(2024, 1, 11)), BookStatus::Overdue);
        assert_eq!(book_status(due, &StoredDate::Absent, due), BookStatus::Borrowed);
    }

    // ========================================================================
    // Standing and Eligibility
    // ========================================================================

    #[test]
    fn test_only_open_loans_of_member_count() {
        let policy = BorrowPolicy::default();
        let now = at(2024, 1, 5);
        let mut returned = open_record(
            "BR2",
            "LIB000001",
            vec![book("BK002", at(2023, 11, 1), at(2023, 11, 15))],
        );
        returned.return_date = StoredDate::Valid(at(2023, 11, 20));

        let records = vec![
            open_record("BR1", "LIB000001", vec![book("BK001", at(2024, 1, 1), at(2024, 1, 15))]),
            returned,
            open_record("BR3", "LIB000002", vec![book("BK003", at(2023, 1, 1), at(2023, 1, 2))]),
        ];

        let standing = compute_borrow_standing("LIB000001", &records, now, &policy);

        assert_eq!(standing.current_borrowed_count, 1);
        assert_eq!(standing.overdue_books, 0);
        assert_eq!(standing.fines, 0);
        assert!(standing.is_eligible);
    }

    #[test]
    fn test_total_books_overrides_book_list_length() {
        let policy = BorrowPolicy::default();
        let mut record = open_record(
            "BR1",
            "LIB000001",
            vec![book("BK001", at(2024, 1, 1), at(2024, 1, 15))],
        );
        record.total_books = Some(5);

        let standing = compute_borrow_standing("LIB000001", &[record], at(2024, 1, 2), &policy);

        assert_eq!(standing.current_borrowed_count, 5);
        assert_eq!(standing.max_books_allowed, 5);
        assert!(!standing.is_eligible, "member at the limit cannot borrow more");
    }

    #[test]
    fn test_ineligible_whenever_books_overdue() {
        let policy = BorrowPolicy::default();
        let now = at(2024, 6, 1);

        for overdue_count in 1..=4u32 {
            let books = (0..overdue_count)
                .map(|i| {
                    let due = now - Duration::hours(i64::from(i) * 7 + 1);
                    book(&format!("BK{:03}", i), due - Duration::days(14), due)
                })
                .collect();
            let records = vec![open_record("BR1", "LIB000001", books)];

            let standing = compute_borrow_standing("LIB000001", &records, now, &policy);

            assert_eq!(standing.overdue_books, overdue_count);
            assert!(standing.fines > 0);
            assert!(!standing.is_eligible);
        }
    }

    #[test]
    fn test_borrow_info_is_idempotent() {
        let policy = BorrowPolicy::default();
        let now = at(2024, 1, 4);
        let records = vec![
            open_record("BR1", "LIB000001", vec![book("BK001", at(2023, 12, 18), at(2024, 1, 1))]),
            open_record("BR2", "LIB000001", vec![book("BK002", at(2024, 1, 2), at(2024, 1, 16))]),
        ];
        let member = member("LIB000001");

        let first = compute_borrow_info(&member, &records, now, &policy);
        let second = compute_borrow_info(&member, &records, now, &policy);

        assert_eq!(first, second);
        assert_eq!(first.library_id, "LIB000001");
        assert_eq!(first.name, "Asha Rao");
        assert_eq!(first.current_borrowed_count, 2);
        assert_eq!(first.fines, 15);
    }

    #[test]
    fn test_no_records_is_eligible() {
        let standing =
            compute_borrow_standing("LIB000001", &[], at(2024, 1, 1), &BorrowPolicy::default());
        assert_eq!(standing.current_borrowed_count, 0);
        assert!(standing.is_eligible);
    }

    // ========================================================================
    // History
    // ========================================================================

    #[test]
    fn test_history_most_recent_first() {
        let policy = BorrowPolicy::default();
        let catalog = BookCatalog::default();
        let records = vec![
            open_record("BR1", "LIB000001", vec![book("BK001", at(2024, 1, 1), at(2024, 1, 15))]),
            open_record("BR2", "LIB000001", vec![book("BK002", at(2024, 3, 1), at(2024, 3, 15))]),
            open_record("BR3", "LIB000001", vec![book("BK003", at(2024, 2, 1), at(2024, 2, 15))]),
        ];

        let history =
            compute_borrow_history("LIB000001", &records, at(2024, 3, 2), &catalog, &policy);

        let dates: Vec<_> = history.iter().map(|e| e.borrow_date).collect();
        assert_eq!(dates, vec![at(2024, 3, 1), at(2024, 2, 1), at(2024, 1, 1)]);
    }

    #[test]
    fn test_history_ties_keep_record_order() {
        let policy = BorrowPolicy::default();
        let catalog = BookCatalog::default();
        let same_day = at(2024, 1, 1);
        let records = vec![open_record(
            "BR1",
            "LIB000001",
            vec![
                book("BK001", same_day, at(2024, 1, 15)),
                book("BK002", same_day, at(2024, 1, 15)),
                book("BK003", same_day, at(2024, 1, 15)),
            ],
        )];

        let history =
            compute_borrow_history("LIB000001", &records, at(2024, 1, 2), &catalog, &policy);

        let ids: Vec<_> = history.iter().map(|e| e.book_id.as_str()).collect();
        assert_eq!(ids, vec!["BK001", "BK002", "BK003"]);
    }

    #[test]
    fn test_history_includes_returned_loans() {
        let policy = BorrowPolicy::default();
        let catalog = BookCatalog::default();
        let mut returned = open_record(
            "BR1",
            "LIB000001",
            vec![book("BK001", at(2024, 1, 1), at(2024, 1, 15))],
        );
        returned.return_date = StoredDate::Valid(at(2024, 1, 17));

        let history =
            compute_borrow_history("LIB000001", &[returned], at(2024, 3, 1), &catalog, &policy);

        assert_eq!(history.len(), 1);
        let entry = &history[0];
        assert_eq!(entry.status, BookStatus::Returned);
        assert_eq!(entry.fine_amount, 10);
        assert!(!entry.fine_paid);
        assert_eq!(entry.title, "The Great Gatsby");
        assert_eq!(entry.author, "F. Scott Fitzgerald");
        assert_eq!(entry.returned_date, StoredDate::Valid(at(2024, 1, 17)));
    }

    #[test]
    fn test_history_defaults_for_missing_data() {
        let policy = BorrowPolicy::default();
        let catalog = BookCatalog::default();
        let now = at(2024, 5, 1);
        let record = BorrowRecord {
            id: "BR9".to_string(),
            member_id: "LIB000001".to_string(),
            books: Some(vec![BorrowedBook {
                notes: Some("spine torn".to_string()),
                ..Default::default()
            }]),
            borrow_date: Some(at(2024, 4, 20)),
            ..Default::default()
        };

        let history = compute_borrow_history("LIB000001", &[record], now, &catalog, &policy);

        let entry = &history[0];
        assert_eq!(entry.id, "BR9_0");
        assert_eq!(entry.book_id, "BOOK_0");
        assert_eq!(entry.title, defaults::UNKNOWN_TITLE);
        assert_eq!(entry.author, defaults::UNKNOWN_AUTHOR);
        assert_eq!(entry.category, defaults::DEFAULT_CATEGORY);
        assert_eq!(entry.isbn, "");
        assert_eq!(entry.borrow_date, at(2024, 4, 20));
        assert_eq!(entry.due_date, now);
        assert_eq!(entry.status, BookStatus::Borrowed);
        assert_eq!(entry.fine_amount, 0);
        assert_eq!(entry.notes, "spine torn");
    }

    #[test]
    fn test_record_notes_take_precedence() {
        let mut record = open_record(
            "BR1",
            "LIB000001",
            vec![BorrowedBook {
                notes: Some("book note".to_string()),
                ..Default::default()
            }],
        );
        record.notes = Some("record note".to_string());
        assert_eq!(defaults::notes(&record.books()[0], &record), "record note");

        record.notes = Some(String::new());
        assert_eq!(defaults::notes(&record.books()[0], &record), "book note");
    }

    // ========================================================================
    // Stored Records
    // ========================================================================

    #[test]
    fn test_malformed_fields_read_as_defaults() {
        let raw = r#"[
            {"id": "BR1", "memberId": "LIB000001",
             "books": [{"bookId": "BK001", "dueDate": "2024-01-01"}, 42]},
            {"id": "BR2", "memberId": "LIB000001", "books": "oops", "totalBooks": "two"}
        ]"#;
        let records: Vec<BorrowRecord> = serde_json::from_str(raw).unwrap();

        assert_eq!(records[0].books().len(), 2);
        assert_eq!(records[0].books()[1], BorrowedBook::default());
        assert!(records[1].books().is_empty());
        assert_eq!(records[1].total_books, None);
        assert_eq!(records[1].book_count(), 0);

        let standing = compute_borrow_standing(
            "LIB000001",
            &records,
            at(2024, 1, 4),
            &BorrowPolicy::default(),
        );
        assert_eq!(standing.current_borrowed_count, 2);
        assert_eq!(standing.overdue_books, 1);
        assert_eq!(standing.fines, 15);
    }

    #[test]
    fn test_numeric_book_id_keeps_its_due_date() {
        let raw = r#"[{"id": "BR1", "memberId": "LIB000001",
                       "books": [{"bookId": 101, "dueDate": "2024-01-01", "notes": false}]}]"#;
        let records: Vec<BorrowRecord> = serde_json::from_str(raw).unwrap();

        let book = &records[0].books()[0];
        assert_eq!(book.book_id.as_deref(), Some("101"));
        assert_eq!(book.due_date, Some(at(2024, 1, 1)));
        assert_eq!(book.notes, None);

        let standing = compute_borrow_standing(
            "LIB000001",
            &records,
            at(2024, 1, 4),
            &BorrowPolicy::default(),
        );
        assert_eq!(standing.overdue_books, 1);
        assert_eq!(standing.fines, 15);
        assert!(!standing.is_eligible);
    }

    #[test]
    fn test_numeric_record_ids_read_as_text() {
        let raw = r#"[{"id": 1700000000000, "memberId": 42,
                       "books": [{"bookId": "BK001", "dueDate": "2024-01-15"}]}]"#;
        let records: Vec<BorrowRecord> = serde_json::from_str(raw).unwrap();

        assert_eq!(records[0].id, "1700000000000");
        assert_eq!(records[0].member_id, "42");
        assert_eq!(
            compute_borrow_standing("42", &records, at(2024, 1, 2), &BorrowPolicy::default())
                .current_borrowed_count,
            1
        );
    }

    #[test]
    fn test_any_return_date_closes_the_loan() {
        let policy = BorrowPolicy::default();
        let now = at(2024, 1, 4);
        let raw = r#"[
            {"id": "BR1", "memberId": "LIB000001", "returnDate": "returned",
             "books": [{"bookId": "BK001", "dueDate": "2024-01-01"}]},
            {"id": "BR2", "memberId": "LIB000001", "returnDate": null,
             "books": [{"bookId": "BK002", "dueDate": "2024-01-10"}]}
        ]"#;
        let records: Vec<BorrowRecord> = serde_json::from_str(raw).unwrap();

        assert!(!records[0].is_open());
        assert_eq!(
            records[0].return_date,
            StoredDate::Unreadable("returned".to_string())
        );
        assert!(records[1].is_open());

        let standing = compute_borrow_standing("LIB000001", &records, now, &policy);
        assert_eq!(standing.current_borrowed_count, 1);
        assert_eq!(standing.overdue_books, 0);
        assert_eq!(standing.fines, 0);
        assert!(standing.is_eligible);

        let history =
            compute_borrow_history("LIB000001", &records, now, &BookCatalog::default(), &policy);
        let closed = history.iter().find(|e| e.book_id == "BK001").unwrap();
        assert_eq!(closed.status, BookStatus::Returned);
        assert_eq!(closed.fine_amount, 0);

        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["returnDate"], "returned");
    }

    #[test]
    fn test_history_entry_serializes_iso_dates() {
        let policy = BorrowPolicy::default();
        let records = vec![open_record(
            "BR1",
            "LIB000001",
            vec![book("BK003", at(2024, 1, 1), at(2024, 1, 15))],
        )];
        let history = compute_borrow_history(
            "LIB000001",
            &records,
            at(2024, 1, 2),
            &BookCatalog::default(),
            &policy,
        );

        let json = serde_json::to_value(&history[0]).unwrap();
        assert_eq!(json["borrowDate"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["dueDate"], "2024-01-15T00:00:00.000Z");
        assert_eq!(json["status"], "Borrowed");
        assert!(json.get("returnedDate").is_none());
    }

    // ========================================================================
    // Service
    // ========================================================================

    fn service_with(records: &[BorrowRecord], members: &[Member], now: DateTime<Utc>) -> BorrowService {
        let store = Arc::new(MemoryStore::new());
        save_json(store.as_ref(), BORROW_RECORDS_KEY, records).unwrap();
        save_json(store.as_ref(), REGISTERED_USERS_KEY, members).unwrap();
        let store: Arc<dyn KeyValueStore> = store;
        let clock = Arc::new(FixedClock(now));
        let members = MemberService::new(store.clone(), clock.clone());
        BorrowService::new(store, members, clock)
    }

    #[test]
    fn test_service_unknown_member_is_none() {
        let service = service_with(&[], &[member("LIB000001")], at(2024, 1, 1));
        assert_eq!(service.user_borrow_info("LIB999999").unwrap(), None);
    }

    #[test]
    fn test_service_computes_from_stored_records() {
        let records = vec![open_record(
            "BR1",
            "LIB000001",
            vec![book("BK001", at(2023, 12, 18), at(2024, 1, 1))],
        )];
        let service = service_with(&records, &[member("LIB000001")], at(2024, 1, 4));

        let info = service.user_borrow_info("LIB000001").unwrap().unwrap();
        assert_eq!(info.email, "asha@example.com");
        assert_eq!(info.fines, 15);
        assert!(!info.is_eligible);

        let history = service.user_borrow_history("LIB000001").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, BookStatus::Overdue);
        assert_eq!(service.standing("LIB000001").unwrap().overdue_books, 1);
    }

    #[test]
    fn test_service_skips_entries_that_are_not_records() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(
                BORROW_RECORDS_KEY,
                r#"[7, {"id": 1700000000000, "memberId": "LIB000001",
                        "books": [{"bookId": 101, "dueDate": "2024-01-01"}]}, "junk"]"#,
            )
            .unwrap();
        let store: Arc<dyn KeyValueStore> = store;
        let clock = Arc::new(FixedClock(at(2024, 1, 4)));
        let service = BorrowService::new(store.clone(), MemberService::new(store, clock.clone()), clock);

        let records = service.borrow_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1700000000000");

        let history = service.user_borrow_history("LIB000001").unwrap();
        assert_eq!(history[0].id, "1700000000000_0");
        assert_eq!(history[0].book_id, "101");
        assert_eq!(service.standing("LIB000001").unwrap().fines, 15);
    }

    #[test]
    fn test_demo_members_answer_when_unregistered() {
        let service = service_with(&[], &[member("LIB000001")], at(2024, 1, 1));
        assert_eq!(service.user_borrow_info("LIB789012").unwrap(), None);

        let service = service.with_demo_members();
        let john = service.user_borrow_info("LIB789012").unwrap().unwrap();
        assert_eq!(john.name, "John Doe");
        assert_eq!(john.email, "john@example.com");
        assert_eq!(john.current_borrowed_count, 4);
        assert_eq!(john.fines, 25);
        assert_eq!(john.overdue_books, 1);
        assert!(!john.is_eligible);

        let avadhi = service.user_borrow_info("LIB123456").unwrap().unwrap();
        assert_eq!(avadhi.name, "Avadhi Jain");
        assert_eq!(avadhi.current_borrowed_count, 2);
        assert_eq!(avadhi.max_books_allowed, 5);
        assert!(avadhi.is_eligible);

        assert_eq!(service.user_borrow_info("LIB999999").unwrap(), None);
        let registered = service.user_borrow_info("LIB000001").unwrap().unwrap();
        assert_eq!(registered.name, "Asha Rao");
    }

    #[test]
    fn test_service_without_records_key() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock(at(2024, 1, 1)));
        let service = BorrowService::new(store.clone(), MemberService::new(store, clock.clone()), clock);

        assert!(service.borrow_records().unwrap().is_empty());
        assert!(service.user_borrow_history("LIB000001").unwrap().is_empty());
    }
}
