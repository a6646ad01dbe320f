// src/lib.rs
//! Library membership core.
//!
//! Registration, login, password recovery and profile management for a
//! library, persisted through a key-value store, together with the two
//! pieces of real business logic:
//! - field validation rules (`common::rules`, composed by the form
//!   validators in `members::validators`)
//! - borrowing standing and fine accounting (`borrowing::accounting`)

// ============================================================================
// MODULES
// ============================================================================

pub mod auth;
pub mod borrowing;
pub mod common;
pub mod dashboard;
pub mod members;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use auth::{AuthService, AuthUser, PasswordRecovery, RecoveryStage};
pub use borrowing::{
    compute_borrow_history, compute_borrow_info, BookStatus, BorrowInfo, BorrowPolicy,
    BorrowRecord, BorrowService, HistoryEntry,
};
pub use common::{
    init_tracing, Clock, ErrorTag, Field, LibraryConfig, LibraryError, LibraryState, Subject,
    SystemClock, ValidationResult, Validator,
};
pub use dashboard::{DashboardService, UserData};
pub use members::{Member, MemberService};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
