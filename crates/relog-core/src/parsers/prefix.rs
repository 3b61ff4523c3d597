//! Container runtime timestamp prefix.
//!
//! Docker and Kubernetes prepend `2024-01-02T03:04:05.123456789Z ` to every
//! line they capture. The prefix is cut before any detector runs.

use chrono::{DateTime, Utc};
use regex::bytes::Regex;
use std::sync::LazyLock;

static RE_RUNTIME_TS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})) ").unwrap()
});

/// Split a runtime timestamp off the front of `line`.
///
/// The line is returned untouched when there is no prefix or it does not
/// parse as RFC 3339.
pub fn strip_runtime_timestamp(line: &[u8]) -> (Option<DateTime<Utc>>, &[u8]) {
    let Some(caps) = RE_RUNTIME_TS.captures(line) else {
        return (None, line);
    };
    let parsed = std::str::from_utf8(&caps[1])
        .ok()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok());
    match parsed {
        Some(dt) => (Some(dt.with_timezone(&Utc)), &line[caps[0].len()..]),
        None => (None, line),
    }
}
