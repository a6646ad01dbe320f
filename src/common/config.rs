// src/common/config.rs
//! Runtime configuration and logging setup

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::rules::DEFAULT_MIN_AGE;
use crate::borrowing::BorrowPolicy;

pub const DEFAULT_STORAGE_PATH: &str = "library_storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub storage_path: PathBuf,
    pub min_member_age: u32,
    pub borrow_policy: BorrowPolicy,
    /// Serve fixed figures for the two demo accounts when not registered
    pub demo_members: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            min_member_age: DEFAULT_MIN_AGE,
            borrow_policy: BorrowPolicy::default(),
            demo_members: false,
        }
    }
}

impl LibraryConfig {
    /// Load from the environment, reading a `.env` file first if present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let storage_path = env::var("LIBRARY_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let min_member_age = parse_var("LIBRARY_MIN_MEMBER_AGE", defaults.min_member_age);
        let borrow_policy = BorrowPolicy {
            max_books_allowed: parse_var(
                "LIBRARY_MAX_BOOKS_ALLOWED",
                defaults.borrow_policy.max_books_allowed,
            ),
            fine_per_day: parse_var("LIBRARY_FINE_PER_DAY", defaults.borrow_policy.fine_per_day),
        };

        let demo_members = parse_var("LIBRARY_DEMO_MEMBERS", defaults.demo_members);

        let config = Self {
            storage_path,
            min_member_age,
            borrow_policy,
            demo_members,
        };
        info!(
            storage_path = %config.storage_path.display(),
            min_member_age = config.min_member_age,
            max_books_allowed = config.borrow_policy.max_books_allowed,
            fine_per_day = config.borrow_policy.fine_per_day,
            demo_members = config.demo_members,
            "Library configuration loaded"
        );
        config
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, default = %default, "Invalid value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it again is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}
