use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an instant given as Unix seconds, RFC 3339, or a naive
/// `YYYY-MM-DD[ T]HH:MM[:SS]` read as UTC.
pub fn parse_timestamp(s: &str) -> AppResult<i64> {
    let s = s.trim();

    if let Ok(ts) = s.parse::<i64>() {
        return Ok(ts);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.and_utc().timestamp());
        }
    }

    Err(AppError::InvalidDate(s.to_string()))
}

/// Like `parse_timestamp`, but a bare `YYYY-MM-DD` closes at 23:59:59 UTC
/// of that day, so the whole day counts as on time.
pub fn parse_deadline(s: &str) -> AppResult<i64> {
    if let Some(day) = parse_date(s.trim()) {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
        return Ok(day.and_time(end_of_day).and_utc().timestamp());
    }
    parse_timestamp(s)
}

/// `2024-Apr-01 Mon 23:59` in UTC, as used by the lab listing.
pub fn format_deadline(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%b-%d %a %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
