//! Result-size and temporal filters applied by every category fetcher.
//!
//! Raw query parameters are untrusted strings. Parsing never fails the
//! whole request: a bad limit normalizes to unbounded and a bad date drops
//! only the bound it was meant to set. The rejected inputs are reported
//! back so callers can log them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::num::NonZeroUsize;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// Hard cap on the number of records a fetcher returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultLimit {
    #[default]
    Unbounded,
    AtMost(NonZeroUsize),
}

impl ResultLimit {
    /// Creates a limit of `n` records; zero means unbounded.
    pub fn at_most(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(ResultLimit::Unbounded, ResultLimit::AtMost)
    }

    /// Parses the `l` query parameter.
    ///
    /// Absent means unbounded. Anything that is not a positive integer is
    /// rejected and normalized to unbounded.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(ResultLimit::Unbounded);
        };
        raw.parse::<NonZeroUsize>()
            .map(ResultLimit::AtMost)
            .map_err(|_| {
                DomainError::new(
                    ErrorCode::InvalidFilter,
                    format!("Limit must be a positive integer, got '{}'", raw),
                )
                .with_detail("field", "l")
            })
    }

    /// Maximum record count, or `None` if unbounded.
    pub fn cap(&self) -> Option<usize> {
        match self {
            ResultLimit::Unbounded => None,
            ResultLimit::AtMost(n) => Some(n.get()),
        }
    }

    /// Keeps the first `limit` records in source order.
    pub fn truncate<T>(&self, mut records: Vec<T>) -> Vec<T> {
        if let Some(cap) = self.cap() {
            records.truncate(cap);
        }
        records
    }
}

/// Inclusive time range on a record's date or timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemporalWindow {
    from: Option<Timestamp>,
    to: Option<Timestamp>,
}

impl TemporalWindow {
    /// Creates a window; `from` must not be after `to`.
    pub fn new(from: Option<Timestamp>, to: Option<Timestamp>) -> Result<Self, DomainError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f.is_after(&t) {
                return Err(DomainError::new(
                    ErrorCode::InvalidFilter,
                    "fromDate must not be after toDate",
                ));
            }
        }
        Ok(Self { from, to })
    }

    /// Lower bound, inclusive.
    pub fn from(&self) -> Option<Timestamp> {
        self.from
    }

    /// Upper bound, inclusive.
    pub fn to(&self) -> Option<Timestamp> {
        self.to
    }

    /// Returns true if the instant falls inside the window.
    pub fn contains(&self, at: &Timestamp) -> bool {
        self.from.map_or(true, |f| !at.is_before(&f)) && self.to.map_or(true, |t| !at.is_after(&t))
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Parses a date parameter into an instant.
///
/// Calendar dates expand to the start of the day for lower bounds and to
/// the end of the day for upper bounds, so `toDate=2024-01-31` covers the
/// whole of January 31st.
fn parse_bound(field: &str, raw: &str, bound: Bound) -> Result<Timestamp, DomainError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(match bound {
            Bound::Lower => Timestamp::start_of_day(date),
            Bound::Upper => Timestamp::end_of_day(date),
        });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Timestamp::from_datetime(naive.and_utc()));
    }
    Err(DomainError::new(
        ErrorCode::InvalidFilter,
        format!("'{}' is not a valid date", raw),
    )
    .with_detail("field", field))
}

/// Filters shared by every fetcher for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryFilter {
    pub limit: ResultLimit,
    pub window: TemporalWindow,
}

/// A filter built from raw parameters plus the inputs that were dropped.
#[derive(Debug, Clone)]
pub struct ParsedFilter {
    pub filter: QueryFilter,
    pub rejected: Vec<DomainError>,
}

impl QueryFilter {
    /// Filter with no limit and no window.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builder: set the limit.
    pub fn with_limit(mut self, limit: ResultLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Builder: set the window.
    pub fn with_window(mut self, window: TemporalWindow) -> Self {
        self.window = window;
        self
    }

    /// Builds a filter from the raw `l`, `fromDate` and `toDate` parameters.
    pub fn parse(limit: Option<&str>, from: Option<&str>, to: Option<&str>) -> ParsedFilter {
        let mut rejected = Vec::new();

        let limit = ResultLimit::parse(limit).unwrap_or_else(|e| {
            rejected.push(e);
            ResultLimit::Unbounded
        });

        let mut bound = |field: &str, raw: Option<&str>, kind: Bound| {
            raw.filter(|s| !s.trim().is_empty())
                .and_then(|s| match parse_bound(field, s, kind) {
                    Ok(ts) => Some(ts),
                    Err(e) => {
                        rejected.push(e);
                        None
                    }
                })
        };
        let from = bound("fromDate", from, Bound::Lower);
        let to = bound("toDate", to, Bound::Upper);

        let window = TemporalWindow::new(from, to).unwrap_or_else(|e| {
            rejected.push(e);
            TemporalWindow::default()
        });

        ParsedFilter {
            filter: QueryFilter { limit, window },
            rejected,
        }
    }
}
