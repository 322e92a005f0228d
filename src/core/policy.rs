// ShipSearch - core/policy.rs
//
// Column policy: which columns are hidden, which are searchable, and how
// each column is matched. Matching rules dispatch on `ColumnKind` rather
// than on scattered column-name comparisons; the name-to-kind bindings live
// here and nowhere else.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::util::constants;
use serde::Deserialize;

// =============================================================================
// Column kind
// =============================================================================

/// How values of a column are matched and presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Case-insensitive substring match.
    Text,
    /// Case-insensitive prefix match (`HS`).
    PrefixText,
    /// Enumerated labels matched by exact equality (`DOKUMEN`).
    EnumCode,
    /// Calendar dates: range-filtered and reformatted, never text-matched
    /// (`TANGGAL PENGAJUAN`).
    Date,
}

// =============================================================================
// Document classification
// =============================================================================

/// Classification derived from the raw `KODE DOKUMEN` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Electronic certificate of origin (code 860).
    ECoo,
    /// Certificate of origin (code 861).
    Coo,
    /// Any other code: shipped without a preferential facility.
    Unclassified,
}

impl DocumentKind {
    /// Keyword choices offered for the `DOKUMEN` column, in display order.
    pub fn choices() -> &'static [&'static str] {
        &["E-COO", "COO", "TANPA FASILITAS"]
    }

    /// Classify a raw document code. Codes are compared exactly.
    pub fn from_code(code: &str) -> Self {
        match code {
            constants::DOC_CODE_E_COO => DocumentKind::ECoo,
            constants::DOC_CODE_COO => DocumentKind::Coo,
            _ => DocumentKind::Unclassified,
        }
    }

    /// Interpret a lower-cased search keyword. `None` for anything that is
    /// not one of the enumerated labels.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "e-coo" => Some(DocumentKind::ECoo),
            "coo" => Some(DocumentKind::Coo),
            "tanpa fasilitas" | "no facility" => Some(DocumentKind::Unclassified),
            _ => None,
        }
    }

    /// Stored value of the derived `DOKUMEN` column.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::ECoo => "E-COO",
            DocumentKind::Coo => "COO",
            DocumentKind::Unclassified => "",
        }
    }
}

// =============================================================================
// Numeric-text normalisation
// =============================================================================

/// How the trailing `.0` left by numeric-to-text coercion is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericSuffixMode {
    /// Strip every trailing '.' and '0' character, as the live dataset
    /// tooling does: "12.0" -> "12", but also "100.0" -> "1" and "10" -> "1".
    #[default]
    Literal,
    /// Strip exactly one trailing ".0": "100.0" -> "100", "10" unchanged.
    Suffix,
}

impl NumericSuffixMode {
    /// Apply the normalisation to one value.
    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            NumericSuffixMode::Literal => value.trim_end_matches(['.', '0']),
            NumericSuffixMode::Suffix => value.strip_suffix(".0").unwrap_or(value),
        }
    }

    /// True when literal and suffix stripping disagree on `value`.
    pub fn modes_disagree(value: &str) -> bool {
        NumericSuffixMode::Literal.apply(value) != NumericSuffixMode::Suffix.apply(value)
    }
}

// =============================================================================
// Column policy
// =============================================================================

/// Static, read-only column rules shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPolicy {
    /// Columns never shown and never exported.
    pub removed_columns: Vec<String>,

    /// Columns excluded from the searchable list and the all-columns scan.
    pub unsearchable_columns: Vec<String>,

    /// Normalisation applied to numeric-looking text columns at load.
    pub numeric_suffix_mode: NumericSuffixMode,
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self {
            removed_columns: to_owned_list(constants::DEFAULT_REMOVED_COLUMNS),
            unsearchable_columns: to_owned_list(constants::DEFAULT_UNSEARCHABLE_COLUMNS),
            numeric_suffix_mode: NumericSuffixMode::default(),
        }
    }
}

impl ColumnPolicy {
    /// Matching semantics bound to a column name.
    pub fn kind_of(&self, column: &str) -> ColumnKind {
        match column {
            constants::COL_HS => ColumnKind::PrefixText,
            constants::COL_DOKUMEN => ColumnKind::EnumCode,
            constants::COL_TANGGAL_PENGAJUAN => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    /// Name of the date-bearing column.
    pub fn date_column(&self) -> &'static str {
        constants::COL_TANGGAL_PENGAJUAN
    }

    pub fn is_removed(&self, column: &str) -> bool {
        self.removed_columns.iter().any(|c| c == column)
    }

    pub fn is_unsearchable(&self, column: &str) -> bool {
        self.unsearchable_columns.iter().any(|c| c == column)
    }

    /// Columns a user may pick for a search: everything except removed,
    /// unsearchable and the raw document code.
    pub fn is_searchable(&self, column: &str) -> bool {
        !self.is_removed(column)
            && !self.is_unsearchable(column)
            && column != constants::COL_KODE_DOKUMEN
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
