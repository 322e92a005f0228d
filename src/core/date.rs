// ShipSearch - core/date.rs
//
// Date parsing for the free-form submission-date column and the inclusive
// date range filter built on it.
//
// Unparseable values are "missing": they never contribute to the bounds and
// never satisfy a range comparison, but they do not abort the filter.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Table;
use crate::util::constants;
use crate::util::error::QueryError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Date-time layouts tried first; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts. Slash dates are read month-first; day-first is the
/// fallback when the first field cannot be a month.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
];

/// Parse a cell as a calendar date. Returns `None` for anything unrecognised.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = parse_compact(value) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// `YYYYMMDD` with no separators.
fn parse_compact(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Display form used in presented results, e.g. "05 January 2024".
pub fn format_display(date: NaiveDate) -> String {
    date.format(constants::DATE_DISPLAY_FORMAT).to_string()
}

/// Reformat a raw cell for display; unparseable values render empty.
pub fn display_value(value: &str) -> String {
    parse_date(value).map(format_display).unwrap_or_default()
}

// =============================================================================
// Range filter
// =============================================================================

/// Smallest and largest parseable date in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    /// Bounds over an iterator of dates; `None` when it is empty.
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Option<Self> {
        dates.into_iter().fold(None, |acc, d| match acc {
            None => Some(DateBounds { min: d, max: d }),
            Some(b) => Some(DateBounds {
                min: b.min.min(d),
                max: b.max.max(d),
            }),
        })
    }

    /// True when `[start, end]` shares at least one day with `[min, max]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.max && self.min <= end
    }
}

/// What the date filter did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateOutcome {
    /// Rows were restricted to `[start, end]`.
    Applied {
        bounds: DateBounds,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// No row held a parseable date; rows are returned unfiltered.
    EmptyDateRange,
    /// The requested start is after the requested end; rows are returned
    /// unfiltered.
    InvalidRange {
        bounds: DateBounds,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl DateOutcome {
    /// Bounds of the parseable dates, when any exist.
    pub fn bounds(&self) -> Option<DateBounds> {
        match self {
            DateOutcome::Applied { bounds, .. } | DateOutcome::InvalidRange { bounds, .. } => {
                Some(*bounds)
            }
            DateOutcome::EmptyDateRange => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, DateOutcome::Applied { .. })
    }
}

/// Restrict `rows` to dates in the inclusive interval `[start, end]`.
///
/// Missing bounds default to the column's min/max date. Supplied bounds are
/// used as given, so a window lying outside the data matches no rows.
pub fn filter_by_date(
    rows: &Table,
    column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Table, DateOutcome), QueryError> {
    let idx = rows
        .column_index(column)
        .ok_or_else(|| QueryError::InvalidColumn {
            column: column.to_string(),
        })?;

    let parsed: Vec<Option<NaiveDate>> = rows.column_values(idx).map(parse_date).collect();

    let Some(bounds) = DateBounds::from_dates(parsed.iter().flatten().copied()) else {
        tracing::warn!(column, rows = rows.len(), "No parseable dates; range filter skipped");
        return Ok((rows.dedup(), DateOutcome::EmptyDateRange));
    };

    let start = start.unwrap_or(bounds.min);
    let end = end.unwrap_or(bounds.max);

    if start > end {
        tracing::warn!(
            %start,
            %end,
            "Start date after end date; range filter skipped"
        );
        return Ok((rows.dedup(), DateOutcome::InvalidRange { bounds, start, end }));
    }

    if !bounds.overlaps(start, end) {
        tracing::info!(
            %start,
            %end,
            min = %bounds.min,
            max = %bounds.max,
            "Requested window lies outside the available dates"
        );
    }

    let result = rows.filter_rows(|i, _| matches!(parsed[i], Some(d) if start <= d && d <= end));

    tracing::debug!(
        %start,
        %end,
        matched = result.len(),
        total = rows.len(),
        "Date range filter applied"
    );

    Ok((result, DateOutcome::Applied { bounds, start, end }))
}
