//! Input validation for member records.
//!
//! These are pure functions; the workflow decides what to do with a failed
//! check. Kept deliberately permissive — the email check only requires an
//! `@`, nothing more.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Hangul compatibility jamo (U+3131-U+3163) and syllables (U+AC00-U+D7A3)
    static ref HANGUL: Regex =
        Regex::new("[\u{3131}-\u{3163}\u{AC00}-\u{D7A3}]").unwrap();
}

/// Whether `text` contains any Hangul jamo or syllable character.
///
/// Member names are rejected at registration when this returns true.
/// Total over all input; the empty string contains nothing.
pub fn contains_hangul(text: &str) -> bool {
    HANGUL.is_match(text)
}

/// Whether `value` looks like an email address: non-empty and contains `@`.
pub fn has_valid_email_format(value: &str) -> bool {
    !value.is_empty() && value.contains('@')
}

/// Whether at least `min_duration_ms` have passed between `created_at` and `now`.
///
/// `now` is a parameter so callers can pin the clock in tests.
pub fn min_age_elapsed(created_at: DateTime<Utc>, min_duration_ms: i64, now: DateTime<Utc>) -> bool {
    (now - created_at).num_milliseconds() >= min_duration_ms
}
