// ShipSearch - core/present.rs
//
// Presentation of a result set: date formatting, removal of hidden columns,
// a final deduplication, stable ordering and fixed-size pagination.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::date;
use crate::core::model::{Record, Table};
use crate::core::policy::ColumnPolicy;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Page info
// =============================================================================

/// Position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number, clamped into `[1, total_pages]`.
    pub page_number: usize,

    /// `max(1, ceil(total_items / page_size))`.
    pub total_pages: usize,

    /// 0-based index of the first row on this page.
    pub start_index: usize,

    /// 0-based exclusive end; never past `total_items`.
    pub end_index: usize,

    /// Rows in the whole result set.
    pub total_items: usize,
}

impl PageInfo {
    /// Page geometry for `total_items` rows. A zero page size is treated as 1.
    pub fn new(total_items: usize, requested_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page_number = requested_page.clamp(1, total_pages);
        let start_index = (page_number - 1) * page_size;
        let end_index = (start_index + page_size).min(total_items);
        Self {
            page_number,
            total_pages,
            start_index: start_index.min(end_index),
            end_index,
            total_items,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Rows on this page.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// "Menampilkan data X - Y dari total Z" (showing rows X-Y of Z), with a
    /// 1-based inclusive range.
    pub fn summary(&self) -> String {
        let first = if self.is_empty() { 0 } else { self.start_index + 1 };
        format!(
            "Menampilkan data {first} - {} dari total {}",
            self.end_index, self.total_items
        )
    }

    /// "Halaman P dari T" (page P of T).
    pub fn page_label(&self) -> String {
        format!("Halaman {} dari {}", self.page_number, self.total_pages)
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.summary(), self.page_label())
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Turn a result set into its displayed form: hidden columns stripped, the
/// date column reformatted, duplicates collapsed, rows sorted ascending by the
/// first remaining column.
///
/// Stripping columns can make distinct rows identical, hence the second
/// deduplication. The sort is stable and places empty values last.
pub fn prepare(rows: &Table, policy: &ColumnPolicy) -> Table {
    let mut shown = rows.without_columns(&policy.removed_columns);

    if let Some(idx) = shown.column_index(policy.date_column()) {
        shown.map_column(idx, date::display_value);
    }

    let mut shown = shown.dedup();
    if !shown.columns().is_empty() {
        shown.sort_rows_by(compare_first_column);
    }
    shown
}

fn compare_first_column(a: &Record, b: &Record) -> Ordering {
    match (a[0].is_empty(), b[0].is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a[0].cmp(&b[0]),
    }
}

/// Slice an already prepared table into one page.
pub fn paginate(prepared: &Table, page_number: usize, page_size: usize) -> (Table, PageInfo) {
    let info = PageInfo::new(prepared.len(), page_number, page_size);
    let page = prepared.slice(info.start_index, info.end_index);
    tracing::debug!(
        page = info.page_number,
        total_pages = info.total_pages,
        rows = page.len(),
        "Page selected"
    );
    (page, info)
}

/// Prepare and paginate in one step.
pub fn present(
    rows: &Table,
    page_number: usize,
    policy: &ColumnPolicy,
    page_size: usize,
) -> (Table, PageInfo) {
    paginate(&prepare(rows, policy), page_number, page_size)
}
