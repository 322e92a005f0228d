// ShipSearch - core/query.rs
//
// Query engine: (table, column selector, keyword) -> deduplicated result set.
// Pure function of its inputs; the loaded table is never mutated.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::Table;
use crate::core::policy::{ColumnKind, ColumnPolicy, DocumentKind};
use crate::util::constants;
use crate::util::error::QueryError;
use std::fmt;

/// Which column a keyword applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ColumnSelector {
    /// No column chosen yet: the full table is returned and any keyword is
    /// ignored.
    #[default]
    Unselected,
    /// Scan every searchable column for the keyword.
    AllColumns,
    /// A concrete column, matched according to its `ColumnKind`.
    Named(String),
}

impl ColumnSelector {
    /// Interpret a user-facing label. The sentinel labels map back to their
    /// variants; anything else names a column.
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | constants::LABEL_UNSELECTED => ColumnSelector::Unselected,
            constants::LABEL_ALL_COLUMNS => ColumnSelector::AllColumns,
            name => ColumnSelector::Named(name.to_string()),
        }
    }

    /// Label shown in a column picker.
    pub fn label(&self) -> &str {
        match self {
            ColumnSelector::Unselected => constants::LABEL_UNSELECTED,
            ColumnSelector::AllColumns => constants::LABEL_ALL_COLUMNS,
            ColumnSelector::Named(name) => name,
        }
    }

    /// True when the selector names the date column. Keyword search does not
    /// apply to it; the date range filter does.
    pub fn is_date_column(&self, policy: &ColumnPolicy) -> bool {
        matches!(self, ColumnSelector::Named(name) if policy.kind_of(name) == ColumnKind::Date)
    }

    /// True when a keyword typed alongside this selector is used at all.
    pub fn accepts_keyword(&self, policy: &ColumnPolicy) -> bool {
        !matches!(self, ColumnSelector::Unselected) && !self.is_date_column(policy)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Searchable column list for a column picker, prefixed with the
/// "no column chosen" sentinel.
pub fn searchable_columns(table: &Table, policy: &ColumnPolicy) -> Vec<ColumnSelector> {
    std::iter::once(ColumnSelector::Unselected)
        .chain(
            table
                .columns()
                .iter()
                .filter(|c| policy.is_searchable(c))
                .map(|c| ColumnSelector::Named(c.clone())),
        )
        .collect()
}

/// Filter `table` by `keyword` in the selected column.
///
/// Matching is case-insensitive. The result is always deduplicated, whichever
/// rule fired. A named column missing from the schema is an error rather than
/// a silent fallback to scanning all columns.
pub fn search(
    table: &Table,
    selector: &ColumnSelector,
    keyword: &str,
    policy: &ColumnPolicy,
) -> Result<Table, QueryError> {
    let named_index = match selector {
        ColumnSelector::Named(name) => Some(table.column_index(name).ok_or_else(|| {
            QueryError::InvalidColumn {
                column: name.clone(),
            }
        })?),
        _ => None,
    };

    if keyword.is_empty() || !selector.accepts_keyword(policy) {
        return Ok(table.dedup());
    }

    let keyword = keyword.to_lowercase();

    let (ColumnSelector::Named(name), Some(idx)) = (selector, named_index) else {
        return Ok(search_all_columns(table, &keyword, policy));
    };

    let result = match policy.kind_of(name) {
        ColumnKind::PrefixText => {
            table.filter_rows(|_, row| row[idx].to_lowercase().starts_with(&keyword))
        }
        ColumnKind::EnumCode => match DocumentKind::from_keyword(&keyword) {
            Some(kind) => table.filter_rows(|_, row| row[idx] == kind.label()),
            None => {
                tracing::debug!(column = %name, "Unrecognised document keyword; returning all rows");
                table.dedup()
            }
        },
        ColumnKind::Text => table.filter_rows(|_, row| contains_folded(&row[idx], &keyword)),
        // accepts_keyword() already routed the date column to the full table.
        ColumnKind::Date => table.dedup(),
    };

    tracing::debug!(
        column = %name,
        matched = result.len(),
        total = table.len(),
        "Column search complete"
    );
    Ok(result)
}

/// Rows where any searchable field contains the keyword.
fn search_all_columns(table: &Table, keyword: &str, policy: &ColumnPolicy) -> Table {
    let scan: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !policy.is_unsearchable(c))
        .map(|(idx, _)| idx)
        .collect();

    let result = table.filter_rows(|_, row| scan.iter().any(|&i| contains_folded(&row[i], keyword)));

    tracing::debug!(
        columns = scan.len(),
        matched = result.len(),
        total = table.len(),
        "All-columns search complete"
    );
    result
}

/// Case-insensitive substring test. Missing (empty) values never match.
fn contains_folded(value: &str, keyword_lower: &str) -> bool {
    !value.is_empty() && value.to_lowercase().contains(keyword_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Record;

    fn row(values: &[&str]) -> Record {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// HS, DOKUMEN, TANGGAL PENGAJUAN, URAIAN BARANG, MEREK
    fn sample_table() -> Table {
        let columns = ["HS", "DOKUMEN", "TANGGAL PENGAJUAN", "URAIAN BARANG", "MEREK"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Table::new(
            columns,
            vec![
                row(&["8471.30", "E-COO", "2024-01-05", "Laptop Computer", "Acme"]),
                row(&["8471.41", "COO", "2024-01-20", "Desktop computer", "Zeta"]),
                row(&["3926.90", "", "2024-02-01", "Plastic Parts", "Acme"]),
                row(&["18471.00", "", "2024-02-10", "Cocoa", ""]),
                row(&["8471.30", "E-COO", "2024-01-05", "Laptop Computer", "Acme"]),
            ],
        )
    }

    fn named(name: &str) -> ColumnSelector {
        ColumnSelector::Named(name.to_string())
    }

    #[test]
    fn test_unselected_returns_full_deduplicated_table() {
        let table = sample_table();
        let policy = ColumnPolicy::default();
        let result = search(&table, &ColumnSelector::Unselected, "laptop", &policy).unwrap();
        assert_eq!(result, table.dedup());
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_empty_keyword_returns_full_table() {
        let table = sample_table();
        let result = search(&table, &named("URAIAN BARANG"), "", &ColumnPolicy::default()).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_date_column_ignores_keyword() {
        let table = sample_table();
        let result =
            search(&table, &named("TANGGAL PENGAJUAN"), "2024-02", &ColumnPolicy::default())
                .unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_hs_matches_prefix_only() {
        let table = sample_table();
        let result = search(&table, &named("HS"), "8471", &ColumnPolicy::default()).unwrap();
        assert_eq!(result.len(), 2);
        // "18471.00" contains the keyword but does not start with it.
        assert!(result.rows().iter().all(|r| r[0].starts_with("8471")));
    }

    #[test]
    fn test_hs_prefix_law_holds_for_every_row() {
        let table = sample_table();
        let policy = ColumnPolicy::default();
        for keyword in ["8", "84", "8471.3", "3926", "1", "x"] {
            let result = search(&table, &named("HS"), keyword, &policy).unwrap();
            for r in table.dedup().rows() {
                let expected = r[0].to_lowercase().starts_with(&keyword.to_lowercase());
                assert_eq!(result.rows().contains(r), expected, "keyword {keyword}, row {r:?}");
            }
        }
    }

    #[test]
    fn test_text_column_is_case_insensitive_substring() {
        let table = sample_table();
        let result =
            search(&table, &named("URAIAN BARANG"), "COMPUTER", &ColumnPolicy::default()).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_keyword_is_literal_not_a_pattern() {
        let table = sample_table();
        let result = search(&table, &named("HS"), "8471.", &ColumnPolicy::default()).unwrap();
        assert_eq!(result.len(), 2);
        let result =
            search(&table, &named("URAIAN BARANG"), "l.*", &ColumnPolicy::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_values_never_match() {
        let table = sample_table();
        let result = search(&table, &named("MEREK"), "a", &ColumnPolicy::default()).unwrap();
        // The row with an empty MEREK is excluded; Acme and Zeta rows remain.
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_document_enum_matches_exact_label() {
        let table = sample_table();
        let policy = ColumnPolicy::default();
        let ecoo = search(&table, &named("DOKUMEN"), "E-COO", &policy).unwrap();
        assert_eq!(ecoo.len(), 1);
        assert!(ecoo.rows().iter().all(|r| r[1] == "E-COO"));

        let coo = search(&table, &named("DOKUMEN"), "coo", &policy).unwrap();
        assert_eq!(coo.len(), 1);
        assert_eq!(coo.rows()[0][1], "COO");

        let none = search(&table, &named("DOKUMEN"), "TANPA FASILITAS", &policy).unwrap();
        assert_eq!(none.len(), 2);
        assert!(none.rows().iter().all(|r| r[1].is_empty()));
    }

    #[test]
    fn test_unrecognised_document_keyword_is_a_no_op() {
        let table = sample_table();
        let result = search(&table, &named("DOKUMEN"), "form d", &ColumnPolicy::default()).unwrap();
        assert_eq!(result, table.dedup());
    }

    #[test]
    fn test_all_columns_scans_searchable_fields() {
        let table = sample_table();
        let policy = ColumnPolicy::default();
        let result = search(&table, &ColumnSelector::AllColumns, "plastic", &policy).unwrap();
        assert_eq!(result.len(), 1);

        // MEREK is unsearchable, so "zeta" only appears in an excluded column.
        let result = search(&table, &ColumnSelector::AllColumns, "zeta", &policy).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_column_is_invalid() {
        let table = sample_table();
        let err = search(&table, &named("NAMA KAPAL"), "x", &ColumnPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidColumn {
                column: "NAMA KAPAL".to_string()
            }
        );
    }

    #[test]
    fn test_searchable_columns_prefixed_with_sentinel() {
        let table = sample_table();
        let columns = searchable_columns(&table, &ColumnPolicy::default());
        assert_eq!(columns[0], ColumnSelector::Unselected);
        let labels: Vec<&str> = columns.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Pilih Kolom", "HS", "DOKUMEN", "TANGGAL PENGAJUAN", "URAIAN BARANG"]
        );
    }

    #[test]
    fn test_selector_labels_round_trip() {
        assert_eq!(ColumnSelector::from_label("Pilih Kolom"), ColumnSelector::Unselected);
        assert_eq!(ColumnSelector::from_label("Semua Kolom"), ColumnSelector::AllColumns);
        assert_eq!(ColumnSelector::from_label("HS"), named("HS"));
    }
}
