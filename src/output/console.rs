//! Console rendering of result tables

use crate::columns::ResultTable;
use crate::error::Result;
use serde::Serialize;

/// Render a table as left-aligned text columns separated by two spaces
pub fn render_table(table: &ResultTable) -> String {
    let records: Vec<[String; 9]> = table.iter().map(|row| row.to_record()).collect();

    let mut widths = ResultTable::HEADERS.map(|h| h.chars().count());
    for record in &records {
        for (width, cell) in widths.iter_mut().zip(record) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &ResultTable::HEADERS, &widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, &rule, &widths);
    for record in &records {
        push_line(&mut out, record, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Pretty-printed JSON of any serializable report
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
