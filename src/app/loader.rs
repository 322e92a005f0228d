// ShipSearch - app/loader.rs
//
// Dataset loading: spreadsheet or CSV bytes -> normalised, deduplicated
// Table with every cell held as text.
//
// Load-time normalisation, run once per load:
// 1. `.0` artifacts stripped from numeric-looking text columns.
// 2. `DOKUMEN` derived from `KODE DOKUMEN`, taking its position.
// 3. Duplicate rows collapsed.

use crate::core::model::{Record, Table};
use crate::core::policy::{ColumnPolicy, DocumentKind, NumericSuffixMode};
use crate::util::constants;
use crate::util::error::LoadError;
use calamine::{Data, DataType, Reader, Xls, Xlsx};
use std::collections::HashSet;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Supported input containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    /// Format for a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            "csv" => Ok(SourceFormat::Csv),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }
}

/// Read the raw bytes of a dataset file.
pub fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Load and normalise a dataset from disk.
pub fn load_dataset(path: &Path, policy: &ColumnPolicy) -> Result<Table, LoadError> {
    let bytes = read_source(path)?;
    load_from_bytes(path, &bytes, policy)
}

/// Decode and normalise dataset bytes; `path` selects the format and labels
/// errors.
pub fn load_from_bytes(
    path: &Path,
    bytes: &[u8],
    policy: &ColumnPolicy,
) -> Result<Table, LoadError> {
    let raw = parse_source(path, bytes)?;
    let raw_rows = raw.len();
    let table = normalize(raw, policy.numeric_suffix_mode);
    tracing::info!(
        path = %path.display(),
        columns = table.columns().len(),
        raw_rows,
        rows = table.len(),
        "Dataset loaded"
    );
    Ok(table)
}

/// Decode a source into a raw table: first worksheet (or the CSV), first row
/// as header, all cells as text. Fully blank rows are skipped.
pub fn parse_source(path: &Path, bytes: &[u8]) -> Result<Table, LoadError> {
    let grid = match SourceFormat::from_path(path)? {
        SourceFormat::Xlsx => {
            let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(|e| {
                LoadError::Workbook {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            read_first_sheet(workbook, path)?
        }
        SourceFormat::Xls => {
            let workbook: Xls<_> = Xls::new(Cursor::new(bytes)).map_err(|e| {
                LoadError::Workbook {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            read_first_sheet(workbook, path)?
        }
        SourceFormat::Csv => read_csv(bytes, path)?,
    };

    build_table(grid, path)
}

fn read_first_sheet<RS, R>(mut workbook: R, path: &Path) -> Result<Vec<Vec<String>>, LoadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!(sheet = %sheet, height = range.height(), width = range.width(), "Worksheet read");

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn read_csv(bytes: &[u8], path: &Path) -> Result<Vec<Vec<String>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| LoadError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                })
        })
        .collect()
}

/// Text form of one spreadsheet cell.
///
/// Whole-number floats drop the fraction, so a numeric `KODE DOKUMEN` of 860
/// reads as "860"; native dates use `YYYY-MM-DD HH:MM:SS`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format(constants::CELL_DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| cell.to_string()),
    }
}

fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn build_table(grid: Vec<Vec<String>>, path: &Path) -> Result<Table, LoadError> {
    let mut rows = grid.into_iter();
    let header = rows.next().ok_or_else(|| LoadError::MissingHeader {
        path: path.to_path_buf(),
    })?;

    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len());
    for (idx, name) in header.iter().enumerate() {
        let name = match name.trim() {
            "" => format!("Unnamed: {idx}"),
            trimmed => trimmed.to_string(),
        };
        if !seen.insert(name.clone()) {
            return Err(LoadError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name,
            });
        }
        columns.push(name);
    }

    let records: Vec<Record> = rows
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect();

    Ok(Table::new(columns, records))
}

/// Apply load-time normalisation and deduplicate.
pub fn normalize(mut table: Table, mode: NumericSuffixMode) -> Table {
    for column in constants::NUMERIC_TEXT_COLUMNS {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        if mode == NumericSuffixMode::Literal {
            let ambiguous = table
                .column_values(idx)
                .filter(|v| NumericSuffixMode::modes_disagree(v))
                .count();
            if ambiguous > 0 {
                tracing::warn!(
                    column,
                    values = ambiguous,
                    "Literal '.0' stripping removed more than a trailing '.0' suffix; \
                     set [data] numeric_suffix_mode = \"suffix\" to keep those digits"
                );
            }
        }
        table.map_column(idx, |v| mode.apply(v).to_string());
    }

    derive_document_column(&mut table);

    table.dedup()
}

/// Replace `KODE DOKUMEN` by the derived `DOKUMEN` label at the same position.
fn derive_document_column(table: &mut Table) {
    let Some(code_idx) = table.column_index(constants::COL_KODE_DOKUMEN) else {
        return;
    };

    if table.has_column(constants::COL_DOKUMEN) {
        tracing::warn!(
            "Dataset already has a DOKUMEN column; replacing it with the label derived from KODE DOKUMEN"
        );
        *table = table.without_columns(&[constants::COL_DOKUMEN]);
        return derive_document_column(table);
    }

    table.map_column(code_idx, |code| DocumentKind::from_code(code).label().to_string());
    table.rename_column(code_idx, constants::COL_DOKUMEN);
}
