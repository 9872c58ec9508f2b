//! Time utilities: Unix-second rendering, UTC offsets and compact durations.

use crate::errors::{AppError, AppResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// strftime pattern plus the fixed offset timestamps are shown in.
#[derive(Debug, Clone)]
pub struct TimestampFormat {
    pattern: String,
    offset: FixedOffset,
}

impl TimestampFormat {
    pub fn new(pattern: &str, offset: &str) -> AppResult<Self> {
        validate_pattern(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            offset: parse_utc_offset(offset)?,
        })
    }

    /// `None` when the timestamp is outside chrono's representable range.
    pub fn render(&self, ts: i64) -> Option<String> {
        let dt = DateTime::from_timestamp(ts, 0)?;
        Some(
            dt.with_timezone(&self.offset)
                .format(&self.pattern)
                .to_string(),
        )
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            pattern: "%Y-%m-%d %H:%M:%S".to_string(),
            offset: Utc.fix(),
        }
    }
}

/// Reject patterns chrono would fail on at render time.
pub fn validate_pattern(pattern: &str) -> AppResult<()> {
    if pattern.is_empty() || StrftimeItems::new(pattern).any(|it| matches!(it, Item::Error)) {
        return Err(AppError::Config(format!(
            "invalid timestamp format '{}'",
            pattern
        )));
    }
    Ok(())
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(s: &str) -> AppResult<FixedOffset> {
    let bad = || AppError::Config(format!("invalid UTC offset '{}' (use +HH:MM)", s));
    let s = s.trim();

    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match s.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(bad()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| bad())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| bad())?;
    if minutes >= 60 {
        return Err(bad());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(bad)
}

/// Compact duration: `<d>d<h>h<m>m`, or `<h>h<m>m` when under a day.
/// Negative spans get a leading `-`.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let s = seconds.unsigned_abs();

    let days = s / SECONDS_PER_DAY as u64;
    let hours = (s % SECONDS_PER_DAY as u64) / 3600;
    let minutes = (s % 3600) / 60;

    if days > 0 {
        format!("{}{}d{}h{}m", sign, days, hours, minutes)
    } else {
        format!("{}{}h{}m", sign, hours, minutes)
    }
}
