// src/common/rules.rs
//! Field validation rules.
//!
//! Every rule is a pure predicate returning `Ok(())` or the tag describing
//! the failure. An empty value is "no opinion" for every rule except
//! [`required`], which callers run first.
//!
//! `regex` has no look-around or back-references, so the password strength
//! rule is split into an allowed-alphabet match plus one presence check per
//! character class, and the repeated-digit check is a scan.

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use super::dates::parse_date;
use super::validation::ErrorTag;

/// Minimum age accepted at registration
pub const DEFAULT_MIN_AGE: u32 = 14;

/// Length of a run of identical characters that makes a mobile number suspicious
const REPEATED_RUN_LIMIT: usize = 6;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]{3,}$").expect("valid regex"));

static STRICT_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid regex"));

static MOBILE_ALL_ZEROS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]0{9}$").expect("valid regex"));

static STRONG_PASSWORD_ALPHABET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@$!%*?#&]{8,}$").expect("valid regex"));

static PROFILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid regex"));

static TEN_DIGIT_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

static PROFILE_PASSWORD_ALPHABET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@$!%*?&]{6,}$").expect("valid regex"));

const STRONG_PASSWORD_SPECIALS: &str = "@$!%*?#&";

// ============================================================================
// Generic rules
// ============================================================================

pub fn required(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() {
        Err(ErrorTag::Required)
    } else {
        Ok(())
    }
}

/// Lengths are counted in characters, not bytes
pub fn min_length(value: &str, min: usize) -> Result<(), ErrorTag> {
    let len = value.chars().count();
    if len == 0 || len >= min {
        Ok(())
    } else {
        Err(ErrorTag::MinLength { required: min })
    }
}

pub fn max_length(value: &str, max: usize) -> Result<(), ErrorTag> {
    if value.chars().count() <= max {
        Ok(())
    } else {
        Err(ErrorTag::MaxLength { required: max })
    }
}

fn pattern(value: &str, re: &Regex) -> Result<(), ErrorTag> {
    if value.is_empty() || re.is_match(value) {
        Ok(())
    } else {
        Err(ErrorTag::Pattern)
    }
}

// ============================================================================
// Registration rules
// ============================================================================

/// Letters and spaces only, at least three of them
pub fn name(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() || NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ErrorTag::InvalidName)
    }
}

pub fn strict_email(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() || STRICT_EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ErrorTag::InvalidEmail)
    }
}

/// Indian-style mobile number: ten digits starting 6-9, not a placeholder
/// such as `9000000000`, and without six identical characters in a row.
///
/// A value failing the base shape reports `Pattern`; one that has the
/// right shape but looks fake reports `InvalidMobilePattern`.
pub fn mobile(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() {
        return Ok(());
    }
    if !MOBILE_RE.is_match(value) {
        return Err(ErrorTag::Pattern);
    }
    if MOBILE_ALL_ZEROS_RE.is_match(value) || has_repeated_run(value, REPEATED_RUN_LIMIT) {
        return Err(ErrorTag::InvalidMobilePattern);
    }
    Ok(())
}

/// True when `value` contains `run` identical consecutive characters
fn has_repeated_run(value: &str, run: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut count = 0;
    for c in value.chars() {
        if previous == Some(c) {
            count += 1;
        } else {
            previous = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}

/// The member must be at least `min_age` years old on `today`.
///
/// The cut-off keeps today's month and day and subtracts whole years. A
/// Feb 29 cut-off in a non-leap year rolls over to Mar 1, the way a
/// calendar constructor normalizes an out-of-range day. A date of birth
/// that cannot be parsed never passes.
pub fn age(value: &str, min_age: u32, today: NaiveDate) -> Result<(), ErrorTag> {
    if value.is_empty() {
        return Ok(());
    }
    let too_young = ErrorTag::AgeTooLow { min_age };
    let dob = parse_date(value).ok_or(too_young)?;
    let cutoff = years_before(today, min_age).ok_or(too_young)?;
    if dob <= cutoff {
        Ok(())
    } else {
        Err(too_young)
    }
}

fn years_before(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = today.year().checked_sub(i32::try_from(years).ok()?)?;
    NaiveDate::from_ymd_opt(year, today.month(), 1)?
        .checked_add_days(Days::new(u64::from(today.day() - 1)))
}

/// At least eight characters drawn from letters, digits and `@$!%*?#&`,
/// with one of each: lowercase, uppercase, digit, special.
pub fn password_strength(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() {
        return Ok(());
    }
    let strong = STRONG_PASSWORD_ALPHABET_RE.is_match(value)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| STRONG_PASSWORD_SPECIALS.contains(c));
    if strong {
        Ok(())
    } else {
        Err(ErrorTag::WeakPassword)
    }
}

/// Only compared once both values are filled in
pub fn passwords_match(password: &str, confirm_password: &str) -> Result<(), ErrorTag> {
    if !password.is_empty() && !confirm_password.is_empty() && password != confirm_password {
        Err(ErrorTag::PasswordsMismatch)
    } else {
        Ok(())
    }
}

// ============================================================================
// Profile rules
// ============================================================================

pub fn profile_name(value: &str) -> Result<(), ErrorTag> {
    pattern(value, &PROFILE_NAME_RE)
}

pub fn ten_digit_mobile(value: &str) -> Result<(), ErrorTag> {
    pattern(value, &TEN_DIGIT_MOBILE_RE)
}

/// Six or more characters with a lowercase letter, an uppercase letter and
/// a digit. Special characters are allowed but not required.
pub fn profile_password(value: &str) -> Result<(), ErrorTag> {
    if value.is_empty() {
        return Ok(());
    }
    let ok = PROFILE_PASSWORD_ALPHABET_RE.is_match(value)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ErrorTag::Pattern)
    }
}
