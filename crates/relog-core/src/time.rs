//! Fuzzy timestamp parsing against a small ordered list of layouts.
//!
//! [`parse_fuzzy_time`] requires the whole input to be a timestamp.
//! [`parse_prefix_fuzzy_time`] tolerates trailing text and hands it back, and
//! [`cut_prefix_fuzzy_time`] additionally understands a `[...]` wrapped prefix.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// A known timestamp layout.
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// Layout carrying its own UTC offset.
    Zoned(&'static str),
    /// Layout without offset, read as UTC.
    Naive(&'static str),
    /// Layout without offset or year. Read as UTC in the current year.
    Yearless(&'static str),
}

// Tried in order. `%+` accepts RFC 3339 with or without fractional seconds.
const KNOWN_LAYOUTS: &[Layout] = &[
    Layout::Zoned("%+"),
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    Layout::Yearless("%b-%d %H:%M"),
];

impl Layout {
    /// Parse a leading timestamp, returning it and the unconsumed rest.
    fn parse_and_remainder<'a>(&self, s: &'a str) -> Option<(DateTime<Utc>, &'a str)> {
        match self {
            Self::Zoned(fmt) => DateTime::<FixedOffset>::parse_and_remainder(s, fmt)
                .ok()
                .map(|(dt, rest)| (dt.with_timezone(&Utc), rest)),
            Self::Naive(fmt) => NaiveDateTime::parse_and_remainder(s, fmt)
                .ok()
                .map(|(ndt, rest)| (ndt.and_utc(), rest)),
            Self::Yearless(fmt) => {
                let (ndt, rest_len) = parse_yearless(s, fmt)?;
                Some((ndt.and_utc(), &s[s.len() - rest_len..]))
            }
        }
    }

    /// Parse the whole input as a timestamp.
    fn parse_exact(&self, s: &str) -> Option<DateTime<Utc>> {
        match self.parse_and_remainder(s)? {
            (dt, "") => Some(dt),
            _ => None,
        }
    }
}

/// Parse a year-less timestamp by pinning it to the current year.
///
/// Feb 29 outside a leap year falls back to the most recent leap year.
/// Returns the instant and the byte length of the unconsumed suffix.
pub(crate) fn parse_yearless(s: &str, fmt: &str) -> Option<(NaiveDateTime, usize)> {
    let year = Utc::now().year();
    parse_in_year(s, fmt, year).or_else(|| {
        let leap = (year - 8..year)
            .rev()
            .find(|&y| NaiveDate::from_ymd_opt(y, 2, 29).is_some())?;
        parse_in_year(s, fmt, leap)
    })
}

fn parse_in_year(s: &str, fmt: &str, year: i32) -> Option<(NaiveDateTime, usize)> {
    let with_year = format!("{year} {s}");
    let (ndt, rest) = NaiveDateTime::parse_and_remainder(&with_year, &format!("%Y {fmt}")).ok()?;
    Some((ndt, rest.len()))
}

/// Parse a string that must be a timestamp in one of the known layouts.
pub fn parse_fuzzy_time(s: &str) -> Option<DateTime<Utc>> {
    KNOWN_LAYOUTS.iter().find_map(|layout| layout.parse_exact(s))
}

/// Parse a timestamp at the start of `s`, tolerating trailing text.
///
/// When no layout matches the whole input, the layout leaving the shortest
/// unconsumed tail marks where the timestamp ends. The input is truncated
/// there and the full layout list is retried on the truncated text. On
/// success the instant is returned with the tail, minus one separating space.
pub fn parse_prefix_fuzzy_time(s: &str) -> Option<(DateTime<Utc>, &str)> {
    if let Some(dt) = parse_fuzzy_time(s) {
        return Some((dt, ""));
    }

    let rest_len = KNOWN_LAYOUTS
        .iter()
        .filter_map(|layout| layout.parse_and_remainder(s))
        .map(|(_, rest)| rest.len())
        .min()?;

    let split = s.len() - rest_len;
    let dt = parse_fuzzy_time(s[..split].trim_end())?;
    let rest = &s[split..];
    Some((dt, rest.strip_prefix(' ').unwrap_or(rest)))
}

/// Cut a leading timestamp off a line.
///
/// A `[...]` wrapped prefix must parse as a whole. When it does not, the
/// line is left untouched and `None` is returned. Otherwise falls back to
/// [`parse_prefix_fuzzy_time`].
pub fn cut_prefix_fuzzy_time(s: &str) -> Option<(DateTime<Utc>, &str)> {
    if let Some((inside, after)) = cut_brackets(s, '[', ']') {
        return parse_fuzzy_time(inside).map(|dt| (dt, after));
    }
    parse_prefix_fuzzy_time(s)
}

/// Split `"[inside] after"` into `("inside", "after")`.
///
/// One space after the closing delimiter is dropped. Returns `None` when `s`
/// does not start with `open` or the delimiter is never closed.
pub fn cut_brackets(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    let body = s.strip_prefix(open)?;
    let end = body.find(close)?;
    let after = &body[end + close.len_utf8()..];
    Some((&body[..end], after.strip_prefix(' ').unwrap_or(after)))
}
