//! RFC 3339 helpers shared by storage and report rendering.
//!
//! Timestamps are written with microsecond precision and an explicit
//! `+00:00` offset so stored text and report timelines read the same.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn parse_iso(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}
