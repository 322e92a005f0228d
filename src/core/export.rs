// ShipSearch - core/export.rs
//
// XLSX, CSV and JSON export of a presented result set.
// Core layer: writes to any Write trait object; the caller owns the file.

use crate::core::model::Table;
use crate::util::constants;
use crate::util::error::ExportError;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output format, chosen from the export file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Format for a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Export `table` in `format`. Returns the number of data rows written.
pub fn export_table<W: Write>(
    table: &Table,
    format: ExportFormat,
    writer: W,
    export_path: &Path,
    max_rows: usize,
) -> Result<usize, ExportError> {
    if table.len() > max_rows {
        return Err(ExportError::TooManyRows {
            count: table.len(),
            max: max_rows,
        });
    }
    match format {
        ExportFormat::Xlsx => export_xlsx(table, writer, export_path),
        ExportFormat::Csv => export_csv(table, writer, export_path),
        ExportFormat::Json => export_json(table, writer, export_path),
    }
}

/// Export to a single-sheet workbook named "Hasil Pencarian": one header row
/// with the column names, then one row per record, every cell as text.
pub fn export_xlsx<W: Write>(
    table: &Table,
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let xlsx_err = |source| ExportError::Xlsx {
        path: export_path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(constants::EXPORT_SHEET_NAME)
        .map_err(xlsx_err)?;

    for (col, name) in table.columns().iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, name, &header)
            .map_err(xlsx_err)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let xl_row = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            // Missing cells stay blank so they re-load as missing.
            if value.is_empty() {
                continue;
            }
            sheet
                .write_string(xl_row, col as u16, value)
                .map_err(xlsx_err)?;
        }
    }

    let bytes = workbook.save_to_buffer().map_err(xlsx_err)?;
    writer.write_all(&bytes).map_err(|e| io_err(export_path, e))?;
    writer.flush().map_err(|e| io_err(export_path, e))?;

    Ok(table.len())
}

/// Export to CSV with a header row.
pub fn export_csv<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns()).map_err(csv_err)?;

    let mut count = 0;
    for row in table.rows() {
        csv_writer.write_record(row).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| io_err(export_path, e))?;

    Ok(count)
}

/// Export to JSON: an array of objects keyed by column name.
pub fn export_json<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, table).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(table.len())
}

fn io_err(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: PathBuf::from(path),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    fn sample() -> Table {
        Table::new(
            vec!["HS".into(), "DOKUMEN".into(), "URAIAN BARANG".into()],
            vec![
                vec!["8471.30".into(), "E-COO".into(), "Laptop, 14 inch".into()],
                vec!["3926.90".into(), "".into(), "Plastic parts".into()],
            ],
        )
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.XLSX")).unwrap(),
            ExportFormat::Xlsx
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.csv")).unwrap(),
            ExportFormat::Csv
        );
        assert!(ExportFormat::from_path(Path::new("out.txt")).is_err());
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = export_csv(&sample(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("HS,DOKUMEN,URAIAN BARANG"));
        assert!(output.contains("\"Laptop, 14 inch\""));
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = export_json(&sample(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["DOKUMEN"], "E-COO");
        assert_eq!(value[1]["HS"], "3926.90");
    }

    #[test]
    fn test_xlsx_export_uses_result_sheet_name() {
        let mut buf = Vec::new();
        let count = export_xlsx(&sample(), &mut buf, Path::new("out.xlsx")).unwrap();
        assert_eq!(count, 2);

        let mut workbook = Xlsx::new(Cursor::new(buf)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Hasil Pencarian".to_string()]);
        let range = workbook.worksheet_range("Hasil Pencarian").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), 3);
    }

    #[test]
    fn test_row_limit_is_enforced() {
        let mut buf = Vec::new();
        let err = export_table(
            &sample(),
            ExportFormat::Csv,
            &mut buf,
            Path::new("out.csv"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::TooManyRows { count: 2, max: 1 }));
        assert!(buf.is_empty());
    }
}
