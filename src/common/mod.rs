// Common module - shared types and utilities across all modules

pub mod clock;
pub mod config;
pub mod dates;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod rules;
pub mod state;
pub mod subject;
pub mod validation;

// Re-export commonly used types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{init_tracing, LibraryConfig};
pub use dates::StoredDate;
pub use error::{LibraryError, LibraryResult};
pub use helpers::{emails_match, normalize_email, safe_email_log};
pub use id_generator::*;
pub use state::LibraryState;
pub use subject::{Subject, Subscription};
pub use validation::{ErrorTag, Field, ValidationError, ValidationResult, Validator};
