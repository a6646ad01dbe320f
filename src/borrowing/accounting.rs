// src/borrowing/accounting.rs
//! Borrowing standing and fine accounting.
//!
//! Pure functions over a member id and the full list of borrow records.
//! Nothing is cached: every call recomputes from the records it is given,
//! so the result always matches the records at read time.
//!
//! A book is overdue once `now` is strictly after its due date. Its fine is
//! `ceil(days late) * fine_per_day`, where days late is measured up to the
//! return date for returned books and up to `now` otherwise. Any value in
//! a record's `returnDate` closes the loan, readable or not.
//!
//! These functions never fail. Missing or malformed optional data is
//! replaced by the defaults in [`defaults`].

use chrono::{DateTime, Utc};

use super::catalog::BookCatalog;
use super::models::*;
use crate::common::dates::StoredDate;
use crate::members::Member;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Substitutions for absent or malformed record data
pub mod defaults {
    use chrono::{DateTime, Utc};

    use crate::borrowing::models::{BorrowRecord, BorrowedBook};

    pub const UNKNOWN_TITLE: &str = "Unknown Book";
    pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
    pub const DEFAULT_CATEGORY: &str = "General";
    pub const DEFAULT_ISBN: &str = "";

    /// Missing or empty book id: `BOOK_<position in the record>`
    pub fn book_id(book: &BorrowedBook, index: usize) -> String {
        match book.book_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("BOOK_{}", index),
        }
    }

    /// The book's own borrow date, else the record's, else `now`
    pub fn borrow_date(
        book: &BorrowedBook,
        record: &BorrowRecord,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        book.borrow_date.or(record.borrow_date).unwrap_or(now)
    }

    /// Missing due date: due `now`, so the book is neither overdue nor fined
    pub fn due_date(book: &BorrowedBook, now: DateTime<Utc>) -> DateTime<Utc> {
        book.due_date.unwrap_or(now)
    }

    /// Record notes take precedence over book notes; empty notes count as absent
    pub fn notes(book: &BorrowedBook, record: &BorrowRecord) -> String {
        [record.notes.as_deref(), book.notes.as_deref()]
            .into_iter()
            .flatten()
            .find(|n| !n.is_empty())
            .unwrap_or("")
            .to_string()
    }
}

/// Whole days late, counting any started day as a full one
pub fn days_late(due: DateTime<Utc>, at: DateTime<Utc>) -> u64 {
    let late_ms = (at - due).num_milliseconds();
    if late_ms <= 0 {
        return 0;
    }
    // ceil for a positive numerator
    u64::try_from((late_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY).unwrap_or(0)
}

/// Fine for one book: zero when returned (or still held) by the due date.
/// A return whose date cannot be read is treated as on time.
pub fn book_fine(
    due: DateTime<Utc>,
    returned: &StoredDate,
    now: DateTime<Utc>,
    policy: &BorrowPolicy,
) -> u64 {
    let settled_at = match returned {
        StoredDate::Absent => now,
        StoredDate::Valid(at) => *at,
        StoredDate::Unreadable(_) => return 0,
    };
    days_late(due, settled_at).saturating_mul(policy.fine_per_day)
}

pub fn book_status(due: DateTime<Utc>, returned: &StoredDate, now: DateTime<Utc>) -> BookStatus {
    if returned.is_present() {
        BookStatus::Returned
    } else if now > due {
        BookStatus::Overdue
    } else {
        BookStatus::Borrowed
    }
}

/// Borrowing figures for `member_id` from its open loans
pub fn compute_borrow_standing(
    member_id: &str,
    records: &[BorrowRecord],
    now: DateTime<Utc>,
    policy: &BorrowPolicy,
) -> BorrowStanding {
    let mut current_borrowed_count: u32 = 0;
    let mut fines: u64 = 0;
    let mut overdue_books: u32 = 0;

    for record in records
        .iter()
        .filter(|r| r.member_id == member_id && r.is_open())
    {
        current_borrowed_count = current_borrowed_count.saturating_add(record.book_count());

        for book in record.books() {
            let due = defaults::due_date(book, now);
            if now > due {
                overdue_books = overdue_books.saturating_add(1);
                fines = fines.saturating_add(book_fine(due, &StoredDate::Absent, now, policy));
            }
        }
    }

    let is_eligible = fines == 0
        && overdue_books == 0
        && current_borrowed_count < policy.max_books_allowed;

    BorrowStanding {
        current_borrowed_count,
        max_books_allowed: policy.max_books_allowed,
        fines,
        overdue_books,
        is_eligible,
    }
}

/// Standing joined with the member's identity, as shown on the dashboard
pub fn compute_borrow_info(
    member: &Member,
    records: &[BorrowRecord],
    now: DateTime<Utc>,
    policy: &BorrowPolicy,
) -> BorrowInfo {
    let standing = compute_borrow_standing(&member.id, records, now, policy);
    BorrowInfo {
        library_id: member.id.clone(),
        name: member.member_name.clone(),
        email: member.email.clone(),
        current_borrowed_count: standing.current_borrowed_count,
        max_books_allowed: standing.max_books_allowed,
        fines: standing.fines,
        overdue_books: standing.overdue_books,
        is_eligible: standing.is_eligible,
    }
}

/// One entry per book across all of the member's records, open or
/// returned, most recently borrowed first. Entries borrowed at the same
/// instant keep their record order.
pub fn compute_borrow_history(
    member_id: &str,
    records: &[BorrowRecord],
    now: DateTime<Utc>,
    catalog: &BookCatalog,
    policy: &BorrowPolicy,
) -> Vec<HistoryEntry> {
    let mut history: Vec<HistoryEntry> = Vec::new();

    for record in records.iter().filter(|r| r.member_id == member_id) {
        for (index, book) in record.books().iter().enumerate() {
            let details = book.book_id.as_deref().and_then(|id| catalog.lookup(id));
            let due_date = defaults::due_date(book, now);

            history.push(HistoryEntry {
                id: format!("{}_{}", record.id, index),
                book_id: defaults::book_id(book, index),
                title: details
                    .map(|d| d.title.clone())
                    .unwrap_or_else(|| defaults::UNKNOWN_TITLE.to_string()),
                author: details
                    .map(|d| d.author.clone())
                    .unwrap_or_else(|| defaults::UNKNOWN_AUTHOR.to_string()),
                category: details
                    .and_then(|d| d.category.clone())
                    .unwrap_or_else(|| defaults::DEFAULT_CATEGORY.to_string()),
                isbn: details
                    .and_then(|d| d.isbn.clone())
                    .unwrap_or_else(|| defaults::DEFAULT_ISBN.to_string()),
                borrow_date: defaults::borrow_date(book, record, now),
                due_date,
                returned_date: record.return_date.clone(),
                fine_amount: book_fine(due_date, &record.return_date, now, policy),
                fine_paid: false,
                status: book_status(due_date, &record.return_date, now),
                notes: defaults::notes(book, record),
            });
        }
    }

    // sort_by is stable
    history.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date));
    history
}
