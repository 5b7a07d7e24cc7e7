//! Millisecond epoch strings.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};

/// Digits of a millisecond timestamp that carry whole seconds.
const SECONDS_DIGITS: usize = 10;

/// Parse a millisecond epoch string. Digits past the tenth are dropped, not
/// rounded.
pub fn parse_millis(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::MalformedNoteRecord(format!(
            "bad timestamp {:?}",
            text
        )));
    }

    let seconds = &text[..text.len().min(SECONDS_DIGITS)];
    let seconds: i64 = seconds
        .parse()
        .map_err(|e| AppError::MalformedNoteRecord(format!("bad timestamp {:?}: {}", text, e)))?;

    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| AppError::MalformedNoteRecord(format!("timestamp out of range: {}", text)))
}

/// Format as the reader's millisecond string.
pub fn to_millis(time: &DateTime<Utc>) -> String {
    (time.timestamp() * 1000).to_string()
}
