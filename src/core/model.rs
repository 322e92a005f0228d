// ShipSearch - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// A `Table` is both the loaded dataset and every result set derived from it:
// stages never mutate their input, they return a new `Table`.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::HashSet;

/// One row of the dataset. All fields are text; an empty string is a
/// missing cell.
pub type Record = Vec<String>;

// =============================================================================
// Table
// =============================================================================

/// An ordered sequence of records sharing one column schema.
///
/// Invariant: every record has exactly `columns.len()` fields, in column
/// order. Constructors pad short rows with empty cells and truncate long ones
/// so the invariant holds for any input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Build a table, normalising every row to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// An empty table with the given schema.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in table order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Consume the table, yielding its records.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// Collapse rows with identical content in every column, keeping the
    /// first occurrence and the original relative order.
    pub fn dedup(&self) -> Table {
        self.filter_rows(|_, _| true)
    }

    /// Keep rows for which `keep(index, row)` holds, deduplicated.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(usize, &[String]) -> bool,
    {
        let mut seen: HashSet<&[String]> = HashSet::with_capacity(self.rows.len());
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|&(idx, row)| keep(idx, row.as_slice()))
            .filter(|&(_, row)| seen.insert(row.as_slice()))
            .map(|(_, row)| row.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// True when no two rows are equal.
    pub fn is_deduplicated(&self) -> bool {
        let mut seen: HashSet<&[String]> = HashSet::with_capacity(self.rows.len());
        self.rows.iter().all(|row| seen.insert(row.as_slice()))
    }

    /// A copy without the named columns. Names not in the schema are ignored.
    pub fn without_columns<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !names.iter().any(|n| n.as_ref() == c.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        if keep.len() == self.columns.len() {
            return self.clone();
        }
        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    /// Rewrite every value of one column in place.
    pub fn map_column<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
    }

    /// Rename the column at `index`.
    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) {
        self.columns[index] = name.into();
    }

    /// Reorder rows with a stable sort.
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Record, &Record) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Rows `[start, end)` as a new table; bounds are clamped to the row count.
    pub fn slice(&self, start: usize, end: usize) -> Table {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

// =============================================================================
// Serialisation
// =============================================================================

/// Serialises as an array of objects, one per row, with keys in column order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowObject {
                columns: &self.columns,
                values: row,
            })?;
        }
        seq.end()
    }
}

struct RowObject<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> Record {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_pads_and_truncates_rows() {
        let table = Table::new(cols(&["A", "B"]), vec![row(&["1"]), row(&["1", "2", "3"])]);
        assert_eq!(table.rows()[0], row(&["1", ""]));
        assert_eq!(table.rows()[1], row(&["1", "2"]));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let table = Table::new(
            cols(&["A", "B"]),
            vec![
                row(&["x", "1"]),
                row(&["y", "2"]),
                row(&["x", "1"]),
                row(&["z", "3"]),
                row(&["y", "2"]),
            ],
        );
        let deduped = table.dedup();
        assert_eq!(
            deduped.rows(),
            &[row(&["x", "1"]), row(&["y", "2"]), row(&["z", "3"])]
        );
        assert!(deduped.is_deduplicated());
        assert!(!table.is_deduplicated());
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let table = Table::new(
            cols(&["A"]),
            vec![row(&["a"]), row(&["b"]), row(&["a"]), row(&[""]), row(&[""])],
        );
        let once = table.dedup();
        assert_eq!(once.dedup(), once);
    }

    #[test]
    fn test_rows_differing_in_one_column_are_not_duplicates() {
        let table = Table::new(cols(&["A", "B"]), vec![row(&["x", "1"]), row(&["x", "2"])]);
        assert_eq!(table.dedup().len(), 2);
    }

    #[test]
    fn test_without_columns_ignores_absent_names() {
        let table = Table::new(cols(&["A", "B", "C"]), vec![row(&["1", "2", "3"])]);
        let stripped = table.without_columns(&["B", "NOT THERE"]);
        assert_eq!(stripped.columns(), &cols(&["A", "C"])[..]);
        assert_eq!(stripped.rows()[0], row(&["1", "3"]));
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let table = Table::new(cols(&["A"]), vec![row(&["1"]), row(&["2"]), row(&["3"])]);
        assert_eq!(table.slice(1, 10).len(), 2);
        assert!(table.slice(5, 10).is_empty());
    }

    #[test]
    fn test_json_keeps_column_order() {
        let table = Table::new(cols(&["Z", "A"]), vec![row(&["last", "first"])]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"Z":"last","A":"first"}]"#);
    }
}
