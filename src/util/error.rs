// ShipSearch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Only load failures stop the pipeline; query-time conditions that degrade
// gracefully are modelled as warnings in app::pipeline, not as errors here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ShipSearch operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ShipSearchError {
    /// Dataset loading failed. Terminal for the request.
    Load(LoadError),

    /// A query precondition failed.
    Query(QueryError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for ShipSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Query(e) => write!(f, "Query error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for ShipSearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Query(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors reading the input dataset.
#[derive(Debug)]
pub enum LoadError {
    /// The dataset file does not exist.
    NotFound { path: PathBuf },

    /// The dataset file exists but could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The file extension is not a supported spreadsheet format.
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The workbook container could not be decoded.
    Workbook { path: PathBuf, reason: String },

    /// A CSV record could not be decoded.
    Csv { path: PathBuf, source: csv::Error },

    /// The workbook contains no worksheet.
    NoWorksheet { path: PathBuf },

    /// The first worksheet has no header row.
    MissingHeader { path: PathBuf },

    /// Two header cells carry the same column name.
    DuplicateColumn { path: PathBuf, column: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "File '{}' tidak ditemukan.", path.display()),
            Self::Io { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::UnsupportedFormat { path, extension } => write!(
                f,
                "'{}': unsupported file type '{extension}' (expected .xlsx, .xls or .csv)",
                path.display()
            ),
            Self::Workbook { path, reason } => {
                write!(f, "'{}': cannot decode workbook: {reason}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "'{}': cannot decode CSV: {source}", path.display())
            }
            Self::NoWorksheet { path } => {
                write!(f, "'{}': workbook contains no worksheet", path.display())
            }
            Self::MissingHeader { path } => {
                write!(f, "'{}': first worksheet has no header row", path.display())
            }
            Self::DuplicateColumn { path, column } => write!(
                f,
                "'{}': column '{column}' appears more than once in the header",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LoadError> for ShipSearchError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Precondition failures of the query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The selected column is not part of the table schema.
    InvalidColumn { column: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColumn { column } => {
                write!(f, "Column '{column}' does not exist in the dataset")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for ShipSearchError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// XLSX serialisation error.
    Xlsx {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    /// The file extension does not name a supported export format.
    UnsupportedFormat { path: PathBuf },

    /// Export would exceed the maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::Xlsx { path, source } => {
                write!(f, "XLSX export error '{}': {source}", path.display())
            }
            Self::UnsupportedFormat { path } => write!(
                f,
                "'{}': unsupported export type (expected .xlsx, .csv or .json)",
                path.display()
            ),
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Narrow the search to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Xlsx { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for ShipSearchError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for ShipSearchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for ShipSearch results.
pub type Result<T> = std::result::Result<T, ShipSearchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_load_error_preserves_io_source() {
        let err = ShipSearchError::from(LoadError::Io {
            path: PathBuf::from("database_2024.xlsx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(err.to_string().contains("database_2024.xlsx"));
        let load = err.source().expect("top-level error must chain to LoadError");
        assert!(load.source().is_some(), "LoadError::Io must chain to io::Error");
    }

    #[test]
    fn test_invalid_column_message_names_column() {
        let err = QueryError::InvalidColumn {
            column: "NAMA IMPORTIR".to_string(),
        };
        assert!(err.to_string().contains("NAMA IMPORTIR"));
    }
}
