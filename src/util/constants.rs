// ShipSearch - util/constants.rs
//
// Single source of truth for named constants, limits, column names and
// defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ShipSearch";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ShipSearch";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Title printed above query results.
pub const APP_TITLE: &str = "Database Import Shipment 2024 - EDII";

// =============================================================================
// Column names
// =============================================================================

/// Harmonized-system tariff code. Matched by prefix only.
pub const COL_HS: &str = "HS";

/// Derived document classification label.
pub const COL_DOKUMEN: &str = "DOKUMEN";

/// Raw document code the `DOKUMEN` label is derived from. Dropped at load.
pub const COL_KODE_DOKUMEN: &str = "KODE DOKUMEN";

/// Submission date. Parsed, range-filtered and reformatted, never substring-matched.
pub const COL_TANGGAL_PENGAJUAN: &str = "TANGGAL PENGAJUAN";

/// Item sequence number, stored as text.
pub const COL_SERI_BARANG: &str = "SERI BARANG";

/// Facility code, stored as text.
pub const COL_KODE_FASILITAS: &str = "KODE FASILITAS";

/// Text columns that carry a `.0` artifact from numeric-to-text coercion.
pub const NUMERIC_TEXT_COLUMNS: &[&str] = &[COL_SERI_BARANG, COL_KODE_FASILITAS];

/// Columns never shown and never exported.
pub const DEFAULT_REMOVED_COLUMNS: &[&str] = &[
    "KODE SATUAN",
    "JUMLAH SATUAN",
    "KODE KEMASAN",
    "JUMLAH KEMASAN",
    "Jumlah Nilai CIF",
    COL_SERI_BARANG,
];

/// Columns excluded from the searchable-column list and the all-columns scan.
pub const DEFAULT_UNSEARCHABLE_COLUMNS: &[&str] = &["BM", "PPN", "PPH", "MEREK", "KODE NEGARA ASAL"];

// =============================================================================
// Document codes
// =============================================================================

/// Raw `KODE DOKUMEN` value for an electronic certificate of origin.
pub const DOC_CODE_E_COO: &str = "860";

/// Raw `KODE DOKUMEN` value for a paper certificate of origin.
pub const DOC_CODE_COO: &str = "861";

// =============================================================================
// Selector labels
// =============================================================================

/// Label of the "no column chosen" selector.
pub const LABEL_UNSELECTED: &str = "Pilih Kolom";

/// Label of the "search every searchable column" selector.
pub const LABEL_ALL_COLUMNS: &str = "Semua Kolom";

// =============================================================================
// Presentation
// =============================================================================

/// Rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Smallest configurable page size.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest configurable page size.
pub const MAX_PAGE_SIZE: usize = 10_000;

/// chrono format for the date column in presented results ("05 January 2024").
pub const DATE_DISPLAY_FORMAT: &str = "%d %B %Y";

/// chrono format used when a spreadsheet cell holds a native date value.
pub const CELL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Widest cell rendered by the text table before truncation (characters).
pub const MAX_CELL_DISPLAY_WIDTH: usize = 40;

// =============================================================================
// Export
// =============================================================================

/// Worksheet name of exported spreadsheets ("Search Results").
pub const EXPORT_SHEET_NAME: &str = "Hasil Pencarian";

/// Default export file, overwritten on every export.
pub const DEFAULT_EXPORT_FILE: &str = "search_results.xlsx";

/// XLSX row limit minus the header row.
pub const MAX_EXPORT_ROWS: usize = 1_048_575;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
