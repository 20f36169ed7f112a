//! Comma-delimited catalog import/export.
//!
//! Column order is `name,code,hex,category` with a header row. Malformed
//! rows are never rejected: a bad hex falls back to a placeholder color and
//! a blank name to a placeholder name, so a partially broken spreadsheet
//! still imports.

use super::model::{Paint, parse_hex};

const HEADER: &str = "name,code,hex,category";
const PLACEHOLDER_NAME: &str = "Sem nome";
const PLACEHOLDER_HEX: &str = "#CCCCCC";

/// Parses catalog rows from CSV text, skipping the header row.
///
/// Empty lines are ignored. Missing trailing columns default to empty
/// strings.
pub fn import_catalog_csv(input: &str) -> Vec<Paint> {
    input
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_row)
        .collect()
}

/// Regenerates CSV text from catalog state, same column order as import.
pub fn export_catalog_csv(paints: &[Paint]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for paint in paints {
        out.push_str(&format!(
            "{},{},{},{}\n",
            paint.name, paint.code, paint.hex, paint.category
        ));
    }
    out
}

fn parse_row(line: &str) -> Paint {
    let mut fields = line.split(',').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let code = fields.next().unwrap_or_default();
    let hex = fields.next().unwrap_or_default();
    let category = fields.next().unwrap_or_default();

    let name = if name.is_empty() {
        PLACEHOLDER_NAME
    } else {
        name
    };
    let hex = if parse_hex(hex).is_some() {
        hex
    } else {
        PLACEHOLDER_HEX
    };

    Paint::new(name, code, hex, category)
}
