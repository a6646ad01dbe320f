// src/borrowing/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::dates::{iso_timestamp, lenient_timestamp, StoredDate};

// ============================================================================
// Stored Borrow Records
// ============================================================================

/// One book inside a borrow record. Every field may be missing, and each
/// one is read on its own: a field of the wrong type falls back to absent
/// without affecting its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorrowedBook {
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub book_id: Option<String>,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub borrow_date: Option<DateTime<Utc>>,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

/// A borrowing transaction, as stored under `borrow_records`.
///
/// Deserialization never rejects a record over its contents: numeric ids
/// read as text, a malformed timestamp reads as absent, a book entry that
/// is not an object reads as an empty book, and a `books` value that is not
/// a list reads as no books. `return_date` keeps unreadable values, since
/// any value there marks the loan as returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorrowRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_id")]
    pub member_id: String,
    #[serde(
        deserialize_with = "lenient_books",
        skip_serializing_if = "Option::is_none"
    )]
    pub books: Option<Vec<BorrowedBook>>,
    /// Overrides the length of `books` for the borrowed count when positive
    #[serde(
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_books: Option<u32>,
    #[serde(with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub borrow_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "StoredDate::is_absent")]
    pub return_date: StoredDate,
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl BorrowRecord {
    /// An open loan has nothing in `returnDate`
    pub fn is_open(&self) -> bool {
        self.return_date.is_absent()
    }

    pub fn books(&self) -> &[BorrowedBook] {
        self.books.as_deref().unwrap_or(&[])
    }

    /// Books this record counts toward the member's borrowed total
    pub fn book_count(&self) -> u32 {
        match self.total_books {
            Some(total) if total > 0 => total,
            _ => u32::try_from(self.books().len()).unwrap_or(u32::MAX),
        }
    }
}

/// Strings as-is, numbers as their decimal text, anything else absent
fn text_of(raw: serde_json::Value) -> Option<String> {
    match raw {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?.and_then(text_of))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_books<'de, D>(deserializer: D) -> Result<Option<Vec<BorrowedBook>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok()))
}

// ============================================================================
// Policy
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowPolicy {
    pub max_books_allowed: u32,
    /// Currency units charged per book per started day late
    pub fine_per_day: u64,
}

impl Default for BorrowPolicy {
    fn default() -> Self {
        Self {
            max_books_allowed: 5,
            fine_per_day: 5,
        }
    }
}

// ============================================================================
// Derived Views
// ============================================================================

/// A member's borrowing figures, before joining member details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowStanding {
    pub current_borrowed_count: u32,
    pub max_books_allowed: u32,
    pub fines: u64,
    pub overdue_books: u32,
    pub is_eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowInfo {
    pub library_id: String,
    pub name: String,
    pub email: String,
    pub current_borrowed_count: u32,
    pub max_books_allowed: u32,
    pub fines: u64,
    pub overdue_books: u32,
    pub is_eligible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    Borrowed,
    Returned,
    Overdue,
}

/// One borrowed book, merged with its catalog details, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub isbn: String,
    #[serde(serialize_with = "iso_timestamp::serialize")]
    pub borrow_date: DateTime<Utc>,
    #[serde(serialize_with = "iso_timestamp::serialize")]
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "StoredDate::is_absent")]
    pub returned_date: StoredDate,
    pub fine_amount: u64,
    pub fine_paid: bool,
    pub status: BookStatus,
    pub notes: String,
}
