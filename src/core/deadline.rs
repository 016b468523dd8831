//! Free-text deadline resolution.
//!
//! AI-extracted tasks carry deadlines as loose text ("tomorrow", "in 3 days",
//! "Sun Apr 20 2025", or nothing at all). This module maps any such string to
//! a concrete timestamp so it can be stored as a todo due date.
//!
//! Resolution order (first match wins):
//! 1. Empty/blank input → the current moment (signals "nothing was supplied")
//! 2. An explicit calendar date → that date at 23:59:59.999 local
//! 3. Relative vocabulary: "tomorrow", "next week", "today", "in N day(s)"
//! 4. Fallback → end of today
//!
//! The vocabulary is checked in exactly the order listed. "tomorrow" and
//! "next week" are deliberately checked before "today": a phrase containing
//! both resolves by the earlier rule, and downstream behavior depends on it.
//! Do not reorder.
//!
//! All vocabulary matching is substring-based, the "in N day(s)" rule
//! included: "within 3 days" resolves to +3 days via the tail of "within".

use std::sync::OnceLock;

use chrono::{
    DateTime, Days, Local, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use regex::Regex;

/// Date-only formats accepted as explicit deadlines.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",      // 2025-04-20
    "%a %b %e %Y",   // Sun Apr 20 2025
    "%b %e %Y",      // Apr 20 2025
    "%b %e, %Y",     // Apr 20, 2025
    "%B %e %Y",      // April 20 2025
    "%B %e, %Y",     // April 20, 2025
    "%m/%d/%Y",      // 04/20/2025
];

/// Datetime formats accepted as explicit deadlines (time-of-day is discarded
/// and replaced with end-of-day).
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn in_n_days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"in\s+(\d+)\s+days?\b").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
    })
}

/// Resolve a free-text deadline to an RFC 3339 timestamp (UTC, millisecond
/// precision). Total: never fails, never returns an unparseable string.
pub fn resolve_deadline(input: &str) -> String {
    resolve_deadline_at(input, Local::now())
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Deterministic core of [`resolve_deadline`] with an injected "now".
///
/// Generic over the timezone so callers (and tests) can pin the reference
/// instant. All day arithmetic is calendar-based, so month and year
/// boundaries roll over correctly.
pub fn resolve_deadline_at<Tz: TimeZone>(input: &str, now: DateTime<Tz>) -> DateTime<Tz> {
    let text = input.trim();

    // Nothing supplied: hand back the current moment, not end-of-day, so the
    // caller can tell "no deadline given" apart from "due today".
    if text.is_empty() {
        return now;
    }

    if let Some(date) = parse_explicit_date(text) {
        return end_of_day(date, now);
    }

    let today = now.date_naive();
    let lowered = text.to_lowercase();

    if lowered.contains("tomorrow") {
        return end_of_day_offset(today, 1, now);
    }
    if lowered.contains("next week") {
        return end_of_day_offset(today, 7, now);
    }
    if lowered.contains("today") {
        return end_of_day(today, now);
    }
    if let Some(days) = parse_in_n_days(&lowered) {
        return end_of_day_offset(today, days, now);
    }

    tracing::debug!(deadline = %text, "Unparseable deadline, defaulting to end of today");
    end_of_day(today, now)
}

/// Try the known explicit-date formats, datetime variants first (a plain
/// date parse would reject the trailing time component anyway, but RFC 3339
/// strings are common in round-tripped data).
fn parse_explicit_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Extract N from "in N day(s)". Out-of-range values are treated as
/// unparseable rather than erroring.
fn parse_in_n_days(lowered: &str) -> Option<u64> {
    let captures = in_n_days_pattern().captures(lowered)?;
    captures.get(1)?.as_str().parse().ok()
}

fn end_of_day_offset<Tz: TimeZone>(today: NaiveDate, days: u64, now: DateTime<Tz>) -> DateTime<Tz> {
    match today.checked_add_days(Days::new(days)) {
        Some(date) => end_of_day(date, now),
        None => {
            tracing::warn!(days, "Day offset overflowed the calendar, defaulting to today");
            end_of_day(today, now)
        }
    }
}

/// 23:59:59.999 on the given date, in the timezone of `now`. Falls back to
/// `now` itself if the wall-clock time does not exist in that zone (DST gap).
fn end_of_day<Tz: TimeZone>(date: NaiveDate, now: DateTime<Tz>) -> DateTime<Tz> {
    let Some(naive) = date.and_hms_milli_opt(23, 59, 59, 999) else {
        return now;
    };
    match now.timezone().from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).single().unwrap()
    }

    fn eod(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 23, 59, 59)
            .single()
            .unwrap()
            .with_nanosecond(999_000_000)
            .unwrap()
    }

    #[test]
    fn empty_input_returns_now() {
        let now = fixed_now();
        assert_eq!(resolve_deadline_at("", now), now);
        assert_eq!(resolve_deadline_at("   ", now), now);
    }

    #[test]
    fn explicit_date_normalizes_to_end_of_day() {
        let now = fixed_now();
        assert_eq!(resolve_deadline_at("Sun Apr 20 2025", now), eod(2025, 4, 20));
        assert_eq!(resolve_deadline_at("2025-04-20", now), eod(2025, 4, 20));
        assert_eq!(resolve_deadline_at("04/20/2025", now), eod(2025, 4, 20));
    }

    #[test]
    fn explicit_datetime_discards_time_of_day() {
        let now = fixed_now();
        assert_eq!(
            resolve_deadline_at("2025-04-20T08:30:00Z", now),
            eod(2025, 4, 20)
        );
        assert_eq!(
            resolve_deadline_at("2025-04-20 08:30:00", now),
            eod(2025, 4, 20)
        );
    }

    #[test]
    fn tomorrow_is_checked_before_today() {
        let now = fixed_now();
        assert_eq!(
            resolve_deadline_at("today or tomorrow", now),
            eod(2025, 4, 16)
        );
    }

    #[test]
    fn next_week_is_checked_before_today() {
        let now = fixed_now();
        assert_eq!(
            resolve_deadline_at("today, or next week at the latest", now),
            eod(2025, 4, 22)
        );
    }

    #[test]
    fn in_n_days_offsets_from_today() {
        let now = fixed_now();
        assert_eq!(resolve_deadline_at("in 3 days", now), eod(2025, 4, 18));
        assert_eq!(resolve_deadline_at("in 1 day", now), eod(2025, 4, 16));
        assert_eq!(resolve_deadline_at("in 0 days", now), eod(2025, 4, 15));
    }

    #[test]
    fn in_n_days_matches_as_a_substring() {
        let now = fixed_now();
        // Substring semantics, like the rest of the vocabulary: the tail
        // of "within" counts as "in".
        assert_eq!(resolve_deadline_at("within 3 days", now), eod(2025, 4, 18));
        assert_eq!(
            resolve_deadline_at("done in 2 days or so", now),
            eod(2025, 4, 17)
        );
    }

    #[test]
    fn month_rollover() {
        let now = Utc.with_ymd_and_hms(2025, 4, 30, 9, 0, 0).single().unwrap();
        assert_eq!(resolve_deadline_at("tomorrow", now), eod(2025, 5, 1));
    }

    #[test]
    fn year_rollover() {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 9, 0, 0).single().unwrap();
        assert_eq!(resolve_deadline_at("tomorrow", now), eod(2026, 1, 1));
        assert_eq!(resolve_deadline_at("in 7 days", now), eod(2026, 1, 7));
    }

    #[test]
    fn gibberish_falls_back_to_end_of_today() {
        let now = fixed_now();
        assert_eq!(resolve_deadline_at("gibberish", now), eod(2025, 4, 15));
    }

    #[test]
    fn huge_day_count_falls_back_safely() {
        let now = fixed_now();
        // Larger than any representable offset; must not panic.
        let resolved = resolve_deadline_at("in 99999999999999999999 days", now);
        assert_eq!(resolved, eod(2025, 4, 15));
    }

    #[test]
    fn public_wrapper_emits_rfc3339() {
        let out = resolve_deadline("tomorrow");
        assert!(DateTime::parse_from_rfc3339(&out).is_ok());
    }
}
