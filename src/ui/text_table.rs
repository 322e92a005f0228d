// ShipSearch - ui/text_table.rs
//
// Plain-text rendering of a result page for the terminal: a header row, a
// rule, then one aligned line per record. Long cells are cut to
// MAX_CELL_DISPLAY_WIDTH characters with a trailing ellipsis.

use crate::app::pipeline::QueryResponse;
use crate::core::model::Table;
use crate::core::policy::DocumentKind;
use crate::core::query::ColumnSelector;
use crate::util::constants;
use std::fmt::Write;

const SEPARATOR: &str = " | ";

/// Render `table` as aligned columns. An empty table renders its header only.
pub fn render_table(table: &Table) -> String {
    let header: Vec<String> = table
        .columns()
        .iter()
        .map(|c| fit_cell(c, constants::MAX_CELL_DISPLAY_WIDTH))
        .collect();
    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| fit_cell(v, constants::MAX_CELL_DISPLAY_WIDTH))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

/// Render a pipeline response: warnings first, then the page, then the
/// position summary.
pub fn render_response(response: &QueryResponse) -> String {
    let mut out = String::new();
    for warning in &response.warnings {
        let _ = writeln!(out, "Peringatan: {warning}");
    }
    if let Some(bounds) = response.date_bounds {
        let _ = writeln!(
            out,
            "Rentang tanggal tersedia: {} - {}",
            crate::core::date::format_display(bounds.min),
            crate::core::date::format_display(bounds.max)
        );
    }
    if response.results.is_empty() {
        out.push_str("Tidak ada data yang ditemukan.\n");
    } else {
        out.push_str(&render_table(&response.page));
    }
    let _ = writeln!(out, "{}", response.info.summary());
    let _ = writeln!(out, "{}", response.info.page_label());
    out
}

/// Column picker listing, with the fixed DOKUMEN keyword choices.
pub fn render_columns(columns: &[ColumnSelector]) -> String {
    let mut out = String::new();
    for column in columns {
        let _ = writeln!(out, "  {column}");
        if column.label() == constants::COL_DOKUMEN {
            let _ = writeln!(out, "      pilihan: {}", DocumentKind::choices().join(", "));
        }
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(padded.join(SEPARATOR).trim_end());
    out.push('\n');
}

/// Cut `s` to at most `max` characters, marking the cut with "…".
fn fit_cell(s: &str, max: usize) -> String {
    // Line breaks inside a cell would wreck the alignment.
    let flat = s.replace(['\r', '\n'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
