//! `YYYY-MM` month keys and the fallback chain used when a record has no
//! stored month.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::models::record::Record;

static MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("month key pattern is valid"));

pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// ISO-8601 UTC with milliseconds, e.g. `2025-03-15T10:00:00.000Z`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn is_month_key(candidate: &str) -> bool {
    MONTH_KEY.is_match(candidate)
}

/// Month of a stored `createdAt`, or `None` when it cannot be parsed.
pub fn month_of(created_at: &str) -> Option<String> {
    parse_timestamp(created_at).map(month_key)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|at| at.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|at| at.and_utc())
        })
}

/// Month requested by a listing caller; anything that is not `YYYY-MM` falls back to `now`.
pub fn target_month(requested: Option<&str>, now: DateTime<Utc>) -> String {
    match requested {
        Some(month) if is_month_key(month) => month.to_string(),
        _ => month_key(now),
    }
}

/// One way of finding a record's month. Chains are tried in order, first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSource {
    /// The persisted `month` field.
    Stored,
    /// Derived from the persisted `createdAt`.
    CreatedAt,
    /// The month of a fixed instant, normally the time of the call.
    Clock(DateTime<Utc>),
}

impl MonthSource {
    pub fn resolve(self, record: &Record) -> Option<String> {
        match self {
            MonthSource::Stored => record.month.clone().filter(|month| !month.is_empty()),
            MonthSource::CreatedAt => record.created_at.as_deref().and_then(month_of),
            MonthSource::Clock(now) => Some(month_key(now)),
        }
    }
}

/// Listing never invents a month: a record with neither source stays undecided.
pub const LIST_CHAIN: [MonthSource; 2] = [MonthSource::Stored, MonthSource::CreatedAt];

/// Updating always settles on a month, falling back to the current one.
pub fn update_chain(now: DateTime<Utc>) -> [MonthSource; 3] {
    [
        MonthSource::Stored,
        MonthSource::CreatedAt,
        MonthSource::Clock(now),
    ]
}

pub fn resolve_month(chain: &[MonthSource], record: &Record) -> Option<String> {
    chain.iter().find_map(|source| source.resolve(record))
}
