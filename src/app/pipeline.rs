// ShipSearch - app/pipeline.rs
//
// Query interface consumed by the front end: column listing, keyword search,
// date range filtering, pagination and export, plus `execute()` which runs
// Query -> [Date range] -> Present for one request.
//
// Every stage takes its inputs explicitly and returns new values; the loaded
// table is never modified.

use crate::core::date::{self, DateBounds, DateOutcome};
use crate::core::export::{self as exporter, ExportFormat};
use crate::core::model::Table;
use crate::core::policy::ColumnPolicy;
use crate::core::present::{self, PageInfo};
use crate::core::query::{self, ColumnSelector};
use crate::util::error::{ExportError, QueryError};
use chrono::NaiveDate;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

// =============================================================================
// Request / response
// =============================================================================

/// One user interaction: selected column, typed keyword and date bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub column: ColumnSelector,
    pub keyword: String,
    /// Ignored unless the date column is selected.
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl QueryRequest {
    /// True when the keyword takes part in the search.
    pub fn has_keyword(&self, policy: &ColumnPolicy) -> bool {
        !self.keyword.is_empty() && self.column.accepts_keyword(policy)
    }
}

/// Non-fatal condition reported alongside a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    /// The date column held no parseable date; rows shown unfiltered.
    EmptyDateRange,
    /// Start date after end date; rows shown unfiltered.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// The requested window shares no day with the available dates; the
    /// result is empty.
    OutsideAvailableDates { bounds: DateBounds },
}

impl fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDateRange => write!(f, "Data tanggal tidak valid atau kosong."),
            Self::InvalidRange { .. } => {
                write!(f, "Tanggal Mulai tidak boleh lebih besar dari Tanggal Akhir!")
            }
            Self::OutsideAvailableDates { bounds } => write!(
                f,
                "Rentang tanggal di luar data yang tersedia ({} - {}).",
                date::format_display(bounds.min),
                date::format_display(bounds.max)
            ),
        }
    }
}

/// Outcome of `execute()`.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// Full presented result set (all pages).
    pub results: Table,
    /// Rows of the requested page.
    pub page: Table,
    pub info: PageInfo,
    /// Span of parseable dates, when the date column was selected.
    pub date_bounds: Option<DateBounds>,
    pub warnings: Vec<QueryWarning>,
    /// Whether the result set may be exported.
    pub export_allowed: bool,
}

// =============================================================================
// Stages
// =============================================================================

/// Column picker entries, starting with the "Pilih Kolom" sentinel.
pub fn list_searchable_columns(table: &Table, policy: &ColumnPolicy) -> Vec<ColumnSelector> {
    query::searchable_columns(table, policy)
}

/// Keyword search over the loaded table.
pub fn run_query(
    table: &Table,
    column: &ColumnSelector,
    keyword: &str,
    policy: &ColumnPolicy,
) -> Result<Table, QueryError> {
    query::search(table, column, keyword, policy)
}

/// Restrict `rows` to the inclusive date interval. A table without the date
/// column is reported as having no parseable dates.
pub fn run_date_filter(
    rows: &Table,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    policy: &ColumnPolicy,
) -> (Table, DateOutcome) {
    match date::filter_by_date(rows, policy.date_column(), start, end) {
        Ok(filtered) => filtered,
        Err(e) => {
            tracing::warn!(error = %e, "Date range filter skipped");
            (rows.dedup(), DateOutcome::EmptyDateRange)
        }
    }
}

/// Present `rows` and slice out one page.
pub fn paginate(
    rows: &Table,
    page_number: usize,
    policy: &ColumnPolicy,
    page_size: usize,
) -> (Table, PageInfo) {
    present::present(rows, page_number, policy, page_size)
}

/// Write the presented form of `rows` to `path`, overwriting any previous
/// file. The format follows the extension (.xlsx, .csv, .json).
pub fn export(
    rows: &Table,
    path: &Path,
    policy: &ColumnPolicy,
    max_rows: usize,
) -> Result<PathBuf, ExportError> {
    let format = ExportFormat::from_path(path)?;
    let prepared = present::prepare(rows, policy);

    // Check the limit before truncating an existing file.
    if prepared.len() > max_rows {
        return Err(ExportError::TooManyRows {
            count: prepared.len(),
            max: max_rows,
        });
    }

    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let count = exporter::export_table(&prepared, format, BufWriter::new(file), path, max_rows)?;

    tracing::info!(rows = count, path = %path.display(), "Export complete");
    Ok(path.to_path_buf())
}

/// Run one request against the loaded table.
pub fn execute(
    table: &Table,
    request: &QueryRequest,
    page_number: usize,
    policy: &ColumnPolicy,
    page_size: usize,
) -> Result<QueryResponse, QueryError> {
    let mut rows = run_query(table, &request.column, &request.keyword, policy)?;
    let mut warnings = Vec::new();
    let mut date_bounds = None;

    let date_selected = request.column.is_date_column(policy);
    if date_selected {
        let (filtered, outcome) = run_date_filter(&rows, request.start, request.end, policy);
        date_bounds = outcome.bounds();
        match outcome {
            DateOutcome::Applied { bounds, start, end } => {
                if !bounds.overlaps(start, end) {
                    warnings.push(QueryWarning::OutsideAvailableDates { bounds });
                }
            }
            DateOutcome::EmptyDateRange => warnings.push(QueryWarning::EmptyDateRange),
            DateOutcome::InvalidRange { start, end, .. } => {
                warnings.push(QueryWarning::InvalidRange { start, end })
            }
        }
        rows = filtered;
    }

    let results = present::prepare(&rows, policy);
    let (page, info) = present::paginate(&results, page_number, page_size);
    let export_allowed =
        (request.has_keyword(policy) || date_selected) && !results.is_empty();

    tracing::info!(
        column = %request.column,
        matched = results.len(),
        page = info.page_number,
        warnings = warnings.len(),
        "Query executed"
    );

    Ok(QueryResponse {
        results,
        page,
        info,
        date_bounds,
        warnings,
        export_allowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Record;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(values: &[&str]) -> Record {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// HS, DOKUMEN, TANGGAL PENGAJUAN, URAIAN BARANG, SERI BARANG
    fn table() -> Table {
        Table::new(
            ["HS", "DOKUMEN", "TANGGAL PENGAJUAN", "URAIAN BARANG", "SERI BARANG"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                row(&["8471.30", "E-COO", "2024-01-05 00:00:00", "Laptop", "1"]),
                row(&["8471.30", "E-COO", "2024-01-05 00:00:00", "Laptop", "2"]),
                row(&["3926.90", "COO", "2024-01-31 00:00:00", "Plastic", "1"]),
                row(&["8517.12", "", "2024-02-01 00:00:00", "Phone", "1"]),
                row(&["0901.11", "", "", "Coffee", "1"]),
            ],
        )
    }

    fn date_request(start: Option<NaiveDate>, end: Option<NaiveDate>) -> QueryRequest {
        QueryRequest {
            column: ColumnSelector::Named("TANGGAL PENGAJUAN".into()),
            keyword: String::new(),
            start,
            end,
        }
    }

    #[test]
    fn test_column_list_starts_with_sentinel() {
        let columns = list_searchable_columns(&table(), &ColumnPolicy::default());
        assert_eq!(columns[0], ColumnSelector::Unselected);
        assert_eq!(columns[0].label(), "Pilih Kolom");
        assert!(!columns.contains(&ColumnSelector::Named("SERI BARANG".into())));
        assert!(columns.contains(&ColumnSelector::Named("HS".into())));
    }

    #[test]
    fn test_unselected_request_shows_everything_without_export() {
        let response = execute(
            &table(),
            &QueryRequest::default(),
            1,
            &ColumnPolicy::default(),
            100,
        )
        .unwrap();
        // SERI BARANG is stripped, which collapses the two laptop rows.
        assert_eq!(response.results.len(), 4);
        assert!(!response.export_allowed);
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn test_hs_prefix_search_is_exportable() {
        let request = QueryRequest {
            column: ColumnSelector::Named("HS".into()),
            keyword: "8471".into(),
            ..QueryRequest::default()
        };
        let response = execute(&table(), &request, 1, &ColumnPolicy::default(), 100).unwrap();
        assert_eq!(response.results.len(), 1);
        assert!(response.export_allowed);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let request = QueryRequest {
            column: ColumnSelector::Named("NAMA IMPORTIR".into()),
            keyword: "x".into(),
            ..QueryRequest::default()
        };
        let err = execute(&table(), &request, 1, &ColumnPolicy::default(), 100).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidColumn {
                column: "NAMA IMPORTIR".into()
            }
        );
    }

    #[test]
    fn test_january_range_is_inclusive() {
        let request = date_request(Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 31)));
        let response = execute(&table(), &request, 1, &ColumnPolicy::default(), 100).unwrap();
        let dates: Vec<&str> = response.results.column_values(2).collect();
        assert_eq!(dates, vec!["31 January 2024", "05 January 2024"]);
        assert!(response.warnings.is_empty());
        assert!(response.export_allowed);
        let bounds = response.date_bounds.unwrap();
        assert_eq!(bounds.min, ymd(2024, 1, 5));
        assert_eq!(bounds.max, ymd(2024, 2, 1));
    }

    #[test]
    fn test_inverted_range_warns_and_shows_all() {
        let request = date_request(Some(ymd(2024, 2, 1)), Some(ymd(2024, 1, 1)));
        let response = execute(&table(), &request, 1, &ColumnPolicy::default(), 100).unwrap();
        assert_eq!(response.results.len(), 4);
        assert_eq!(
            response.warnings,
            vec![QueryWarning::InvalidRange {
                start: ymd(2024, 2, 1),
                end: ymd(2024, 1, 1)
            }]
        );
        assert_eq!(
            response.warnings[0].to_string(),
            "Tanggal Mulai tidak boleh lebih besar dari Tanggal Akhir!"
        );
    }

    #[test]
    fn test_window_after_data_is_empty_with_warning() {
        let request = date_request(Some(ymd(2025, 1, 1)), Some(ymd(2025, 12, 31)));
        let response = execute(&table(), &request, 1, &ColumnPolicy::default(), 100).unwrap();
        assert!(response.results.is_empty());
        assert!(!response.export_allowed);
        assert_eq!(
            response.warnings,
            vec![QueryWarning::OutsideAvailableDates {
                bounds: DateBounds {
                    min: ymd(2024, 1, 5),
                    max: ymd(2024, 2, 1),
                }
            }]
        );
        assert_eq!(
            response.warnings[0].to_string(),
            "Rentang tanggal di luar data yang tersedia (05 January 2024 - 01 February 2024)."
        );
    }

    #[test]
    fn test_no_parseable_dates_warns() {
        let table = Table::new(
            vec!["HS".into(), "TANGGAL PENGAJUAN".into()],
            vec![row(&["8471", "n/a"]), row(&["3926", ""])],
        );
        let response = execute(
            &table,
            &date_request(None, None),
            1,
            &ColumnPolicy::default(),
            100,
        )
        .unwrap();
        assert_eq!(response.warnings, vec![QueryWarning::EmptyDateRange]);
        assert_eq!(response.results.len(), 2);
        assert!(response.date_bounds.is_none());
    }

    #[test]
    fn test_date_filter_without_date_column() {
        let table = Table::new(vec!["HS".into()], vec![row(&["8471"])]);
        let (rows, outcome) = run_date_filter(&table, None, None, &ColumnPolicy::default());
        assert_eq!(outcome, DateOutcome::EmptyDateRange);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let (page, info) = paginate(&table(), 9, &ColumnPolicy::default(), 3);
        assert_eq!(info.total_pages, 2);
        assert_eq!(info.page_number, 2);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_export_writes_presented_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hasil.csv");
        std::fs::write(&path, "stale").unwrap();

        let written = export(&table(), &path, &ColumnPolicy::default(), 100).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("HS,DOKUMEN,TANGGAL PENGAJUAN,URAIAN BARANG"));
        assert_eq!(lines.count(), 4);
        assert!(content.contains("05 January 2024"));
    }

    #[test]
    fn test_export_limit_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hasil.csv");
        std::fs::write(&path, "previous").unwrap();

        let err = export(&table(), &path, &ColumnPolicy::default(), 2).unwrap_err();
        assert!(matches!(err, ExportError::TooManyRows { count: 4, max: 2 }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_export_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let err = export(
            &table(),
            &dir.path().join("hasil.pdf"),
            &ColumnPolicy::default(),
            100,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat { .. }));
    }
}
