// ShipSearch - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::policy::{ColumnPolicy, NumericSuffixMode};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ShipSearch configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/shipsearch/ or %APPDATA%\ShipSearch\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[data]` section.
    pub data: DataSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[columns]` section.
    pub columns: ColumnsSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[data]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Dataset spreadsheet path.
    pub file: Option<String>,
    /// "literal" or "suffix".
    pub numeric_suffix_mode: Option<String>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Rows per page.
    pub page_size: Option<usize>,
}

/// `[columns]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ColumnsSection {
    /// Replaces the default hidden-column list.
    pub removed: Option<Vec<String>>,
    /// Replaces the default unsearchable-column list.
    pub unsearchable: Option<Vec<String>>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Output file; the extension picks the format.
    pub file: Option<String>,
    /// Refuse exports larger than this.
    pub max_rows: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset path, if configured.
    pub data_file: Option<PathBuf>,
    /// Column visibility/searchability and load-time normalisation.
    pub policy: ColumnPolicy,
    /// Rows per page.
    pub page_size: usize,
    /// Export destination.
    pub export_file: PathBuf,
    /// Maximum rows per export.
    pub max_export_rows: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            policy: ColumnPolicy::default(),
            page_size: constants::DEFAULT_PAGE_SIZE,
            export_file: PathBuf::from(constants::DEFAULT_EXPORT_FILE),
            max_export_rows: constants::MAX_EXPORT_ROWS,
            log_level: None,
        }
    }
}

/// Read and parse a config file without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field, accumulating every problem rather than stopping at
/// the first.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Data: file --
    if let Some(file) = raw.data.file.filter(|f| !f.is_empty()) {
        config.data_file = Some(PathBuf::from(file));
    }

    // -- Data: numeric_suffix_mode --
    if let Some(ref mode) = raw.data.numeric_suffix_mode {
        match mode.to_lowercase().as_str() {
            "literal" => config.policy.numeric_suffix_mode = NumericSuffixMode::Literal,
            "suffix" => config.policy.numeric_suffix_mode = NumericSuffixMode::Suffix,
            other => warnings.push(format!(
                "[data] numeric_suffix_mode = \"{other}\" is not recognised. \
                 Expected \"literal\" or \"suffix\". Using default (literal).",
            )),
        }
    }

    // -- View: page_size --
    if let Some(size) = raw.view.page_size {
        if (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(&size) {
            config.page_size = size;
        } else {
            warnings.push(format!(
                "[view] page_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_PAGE_SIZE,
                constants::MAX_PAGE_SIZE,
                constants::DEFAULT_PAGE_SIZE,
            ));
        }
    }

    // -- Columns --
    if let Some(removed) = raw.columns.removed {
        config.policy.removed_columns = removed;
    }
    if let Some(unsearchable) = raw.columns.unsearchable {
        config.policy.unsearchable_columns = unsearchable;
    }

    // -- Export: file --
    if let Some(file) = raw.export.file.filter(|f| !f.is_empty()) {
        let path = PathBuf::from(&file);
        if crate::core::export::ExportFormat::from_path(&path).is_ok() {
            config.export_file = path;
        } else {
            warnings.push(format!(
                "[export] file = \"{file}\" must end in .xlsx, .csv or .json. Using default ({}).",
                constants::DEFAULT_EXPORT_FILE,
            ));
        }
    }

    // -- Export: max_rows --
    if let Some(max) = raw.export.max_rows {
        if (1..=constants::MAX_EXPORT_ROWS).contains(&max) {
            config.max_export_rows = max;
        } else {
            warnings.push(format!(
                "[export] max_rows = {max} is out of range (1-{}). Using default ({}).",
                constants::MAX_EXPORT_ROWS,
                constants::MAX_EXPORT_ROWS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}
