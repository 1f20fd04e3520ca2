//! Typed sort values.
//!
//! Raw markup strings are converted once at the document boundary into
//! [`SortDirection`], [`FilterKind`] and [`SortKey`], and compared as typed
//! values from then on.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::markup;

/// Sort order of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// `asc` in markup.
    #[default]
    Ascending,
    /// `desc` in markup.
    Descending,
}

impl SortDirection {
    /// Parse a direction attribute value. Matching ignores case and
    /// surrounding whitespace.
    pub fn from_markup(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }

    /// The attribute value for this direction.
    pub fn as_markup(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_markup())
    }
}

/// How a filter's raw values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Values are dates; selected by the reserved filter name `date`.
    Date,
    /// Values are numbers.
    Numeric,
}

impl FilterKind {
    /// Kind for a filter name.
    pub fn from_filter_name(name: &str) -> Self {
        if name == markup::DATE_FILTER {
            Self::Date
        } else {
            Self::Numeric
        }
    }

    /// The order actually produced for a declared direction.
    ///
    /// Date filters are inverted: a declared `asc` yields newest first and
    /// `desc` yields oldest first. Numeric filters follow the declaration.
    pub fn effective_direction(self, declared: SortDirection) -> SortDirection {
        match self {
            Self::Date => declared.toggled(),
            Self::Numeric => declared,
        }
    }
}

/// A parsed sort value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey {
    /// A number, or a date as milliseconds since the Unix epoch (UTC).
    Value(f64),
    /// Missing or unparseable; ordered after every value.
    Unparseable,
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

impl SortKey {
    /// Parse a raw attribute value according to the filter kind.
    pub fn parse(kind: FilterKind, raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::Unparseable;
        };
        let value = match kind {
            FilterKind::Numeric => raw.parse::<f64>().ok(),
            FilterKind::Date => parse_date_millis(raw),
        };
        match value {
            Some(v) if !v.is_nan() => Self::Value(v),
            _ => Self::Unparseable,
        }
    }

    /// Whether the value parsed.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Compare in `direction`; unparseable keys come last either way.
    pub fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => direction.apply(a.total_cmp(b)),
            (Self::Value(_), Self::Unparseable) => Ordering::Less,
            (Self::Unparseable, Self::Value(_)) => Ordering::Greater,
            (Self::Unparseable, Self::Unparseable) => Ordering::Equal,
        }
    }
}

fn parse_date_millis(raw: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis() as f64);
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Some(dt) = NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_markup() {
        assert_eq!(SortDirection::from_markup("asc"), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::from_markup(" DESC "), Some(SortDirection::Descending));
        assert_eq!(SortDirection::from_markup("up"), None);
        assert_eq!(SortDirection::Descending.as_markup(), "desc");
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert_eq!(SortDirection::Ascending.toggled().toggled(), SortDirection::Ascending);
    }

    #[test]
    fn test_filter_kind() {
        assert_eq!(FilterKind::from_filter_name("date"), FilterKind::Date);
        assert_eq!(FilterKind::from_filter_name("price"), FilterKind::Numeric);
        assert_eq!(FilterKind::from_filter_name("Date"), FilterKind::Numeric);
    }

    #[test]
    fn test_date_direction_is_inverted() {
        assert_eq!(
            FilterKind::Date.effective_direction(SortDirection::Ascending),
            SortDirection::Descending
        );
        assert_eq!(
            FilterKind::Numeric.effective_direction(SortDirection::Ascending),
            SortDirection::Ascending
        );
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some("3")), SortKey::Value(3.0));
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some(" -1.5 ")), SortKey::Value(-1.5));
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some("1e3")), SortKey::Value(1000.0));
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some("abc")), SortKey::Unparseable);
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some("")), SortKey::Unparseable);
        assert_eq!(SortKey::parse(FilterKind::Numeric, Some("NaN")), SortKey::Unparseable);
        assert_eq!(SortKey::parse(FilterKind::Numeric, None), SortKey::Unparseable);
    }

    #[test]
    fn test_parse_dates() {
        let day = SortKey::parse(FilterKind::Date, Some("2023-01-01"));
        assert_eq!(day, SortKey::Value(1_672_531_200_000.0));

        let rfc3339 = SortKey::parse(FilterKind::Date, Some("2023-01-01T00:00:00Z"));
        assert_eq!(rfc3339, day);
        let slashes = SortKey::parse(FilterKind::Date, Some("2023/01/01"));
        assert_eq!(slashes, day);
        let us = SortKey::parse(FilterKind::Date, Some("01/01/2023"));
        assert_eq!(us, day);

        let offset = SortKey::parse(FilterKind::Date, Some("2023-01-01T02:00:00+02:00"));
        assert_eq!(offset, day);
        assert!(SortKey::parse(FilterKind::Date, Some("Sun, 01 Jan 2023 00:00:00 +0000")).is_value());
        assert!(SortKey::parse(FilterKind::Date, Some("2023-01-01 12:30")).is_value());
        assert_eq!(SortKey::parse(FilterKind::Date, Some("yesterday")), SortKey::Unparseable);
    }

    #[test]
    fn test_compare_puts_unparseable_last() {
        let one = SortKey::Value(1.0);
        let two = SortKey::Value(2.0);
        let bad = SortKey::Unparseable;

        assert_eq!(one.compare(&two, SortDirection::Ascending), Ordering::Less);
        assert_eq!(one.compare(&two, SortDirection::Descending), Ordering::Greater);
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(bad.compare(&one, direction), Ordering::Greater);
            assert_eq!(two.compare(&bad, direction), Ordering::Less);
            assert_eq!(bad.compare(&bad, direction), Ordering::Equal);
        }
    }
}
