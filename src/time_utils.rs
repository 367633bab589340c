// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Input format of a deadline typed without a timezone.
const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp the way a deadline input field shows it (`YYYY-MM-DDTHH:MM`).
pub fn format_input(date: DateTime<Utc>) -> String {
    date.format(LOCAL_INPUT_FORMAT).to_string()
}

/// Parse a deadline typed by the user.
///
/// Accepts RFC3339 or the `YYYY-MM-DDTHH:MM` input form (read as UTC).
pub fn parse_input(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_INPUT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render a positive remaining duration as `[Nd ]HH:MM:SS`.
pub fn format_countdown(remaining: chrono::Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let hhmmss = format!("{hours:02}:{minutes:02}:{seconds:02}");
    if days > 0 {
        format!("{days}d {hhmmss}")
    } else {
        hhmmss
    }
}
