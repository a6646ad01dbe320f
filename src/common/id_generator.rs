// src/common/id_generator.rs
//! Member ids and session tokens.
//!
//! Member ids are `LIB` followed by six digits, taken from the last six
//! digits of the registration time in milliseconds. Two registrations in
//! the same millisecond (or 1000 seconds apart to the millisecond) would
//! collide, so callers fall back to [`generate_random_member_id`] when the
//! time-derived id is already taken.
//!
//! Format: LIB######  (e.g., LIB482913)

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix shared by every library member id
pub const MEMBER_ID_PREFIX: &str = "LIB";

/// Number of digits after the prefix
const MEMBER_ID_DIGITS: u32 = 6;

/// Prefix of the session token handed out at login
pub const SESSION_TOKEN_PREFIX: &str = "demo-token-";

/// Generate a member id from the registration time
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use library_membership::common::generate_member_id;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
/// assert_eq!(generate_member_id(at), "LIB123456");
/// ```
pub fn generate_member_id(at: DateTime<Utc>) -> String {
    let modulus = 10_i64.pow(MEMBER_ID_DIGITS);
    let suffix = at.timestamp_millis().rem_euclid(modulus);
    format!("{}{:06}", MEMBER_ID_PREFIX, suffix)
}

/// Generate a member id with a random suffix
pub fn generate_random_member_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix = rng.gen_range(0..10_u32.pow(MEMBER_ID_DIGITS));
    format!("{}{:06}", MEMBER_ID_PREFIX, suffix)
}

/// True when `id` has the `LIB######` shape
pub fn is_member_id(id: &str) -> bool {
    id.strip_prefix(MEMBER_ID_PREFIX)
        .map(|digits| {
            digits.len() == MEMBER_ID_DIGITS as usize && digits.bytes().all(|b| b.is_ascii_digit())
        })
        .unwrap_or(false)
}

/// Session token issued at login
pub fn generate_session_token(at: DateTime<Utc>) -> String {
    format!("{}{}", SESSION_TOKEN_PREFIX, at.timestamp_millis())
}
