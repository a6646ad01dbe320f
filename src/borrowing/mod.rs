//! # Borrowing Module
//!
//! Borrowing standing for library members:
//! - pure accounting over borrow records (counts, fines, eligibility, history)
//! - book catalog lookups for history display
//! - a storage-backed service feeding the dashboard

pub mod accounting;
pub mod catalog;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use accounting::{compute_borrow_history, compute_borrow_info, compute_borrow_standing};
pub use catalog::{BookCatalog, BookDetails};
pub use models::{
    BookStatus, BorrowInfo, BorrowPolicy, BorrowRecord, BorrowStanding, BorrowedBook,
    HistoryEntry,
};
pub use services::BorrowService;
